//! Classroom-rs server entry point.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::middleware;
use classroom_api::{AppState, auth_middleware, router as api_router};
use classroom_common::{Config, LocalCourseStorage, TokenIssuer};
use classroom_core::{
    AnnouncementService, AssignmentService, AuthService, CommentService, CourseService,
    NotificationService, SubmissionService, UserService,
};
use classroom_db::repositories::{
    AnnouncementRepository, AssignmentRepository, CommentRepository, CourseRepository,
    EnrollmentRepository, FolderRepository, NotificationRepository, SubmissionRepository,
    UserRepository,
};
use tokio::signal;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Waits for a shutdown signal (SIGINT or SIGTERM).
///
/// On Unix systems, this listens for both SIGINT (Ctrl+C) and SIGTERM.
/// On Windows, this only listens for Ctrl+C.
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received SIGINT, initiating graceful shutdown...");
        },
        () = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown...");
        },
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "classroom=debug,tower_http=debug".into()),
        )
        .init();

    info!("Starting classroom-rs server...");

    // Load configuration
    let config = Config::load()?;

    // Connect to database
    let db = classroom_db::init(&config).await?;
    info!("Connected to database");

    // Run migrations
    info!("Running database migrations...");
    classroom_db::migrate(&db).await?;
    info!("Migrations completed");

    // Initialize repositories
    let db = Arc::new(db);
    let user_repo = UserRepository::new(Arc::clone(&db));
    let folder_repo = FolderRepository::new(Arc::clone(&db));
    let course_repo = CourseRepository::new(Arc::clone(&db));
    let enrollment_repo = EnrollmentRepository::new(Arc::clone(&db));
    let assignment_repo = AssignmentRepository::new(Arc::clone(&db));
    let submission_repo = SubmissionRepository::new(Arc::clone(&db));
    let announcement_repo = AnnouncementRepository::new(Arc::clone(&db));
    let comment_repo = CommentRepository::new(Arc::clone(&db));
    let notification_repo = NotificationRepository::new(Arc::clone(&db));

    // Course folder storage
    let storage = Arc::new(LocalCourseStorage::new(PathBuf::from(
        &config.storage.base_path,
    )));

    // Initialize services
    let user_service = UserService::new(user_repo.clone());
    let token_issuer = TokenIssuer::new(&config.auth);
    let auth_service = AuthService::new(user_service.clone(), token_issuer);
    let course_service = CourseService::new(
        course_repo.clone(),
        folder_repo,
        enrollment_repo.clone(),
        user_repo.clone(),
        storage,
    );
    let assignment_service = AssignmentService::new(assignment_repo.clone(), course_repo.clone());
    let submission_service = SubmissionService::new(
        submission_repo.clone(),
        assignment_repo.clone(),
        user_repo.clone(),
    );
    let comment_service = CommentService::new(
        comment_repo,
        assignment_repo,
        submission_repo,
        user_repo.clone(),
        notification_repo.clone(),
    );
    let announcement_service = AnnouncementService::new(
        announcement_repo,
        course_repo,
        enrollment_repo,
        user_repo.clone(),
        notification_repo.clone(),
    );
    let notification_service = NotificationService::new(notification_repo, user_repo);

    // Create app state
    let state = AppState {
        auth_service,
        user_service,
        course_service,
        assignment_service,
        submission_service,
        comment_service,
        announcement_service,
        notification_service,
    };

    // Build router
    let app = api_router()
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state);

    // Start server with graceful shutdown
    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}
