//! API middleware.

#![allow(missing_docs)]

use axum::{
    body::Body, extract::State, http::Request, middleware::Next, response::IntoResponse,
    response::Response,
};
use classroom_common::AppError;
use classroom_core::{
    AnnouncementService, AssignmentService, AuthService, CommentService, CourseService,
    NotificationService, SubmissionService, UserService,
};
use classroom_db::entities::user;

/// Application state.
#[derive(Clone)]
pub struct AppState {
    pub auth_service: AuthService,
    pub user_service: UserService,
    pub course_service: CourseService,
    pub assignment_service: AssignmentService,
    pub submission_service: SubmissionService,
    pub comment_service: CommentService,
    pub announcement_service: AnnouncementService,
    pub notification_service: NotificationService,
}

/// Authentication middleware.
///
/// Verifies a `Bearer` token when one is present and stores the loaded
/// user in request extensions. Rejection of unauthenticated requests is
/// left to [`require_auth`] and the extractors.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    if let Some(auth_header) = req.headers().get("Authorization")
        && let Ok(auth_str) = auth_header.to_str()
        && let Some(token) = auth_str.strip_prefix("Bearer ")
        && let Ok(user) = state.auth_service.authenticate(token).await
    {
        req.extensions_mut().insert(user);
    }

    next.run(req).await
}

/// Rejects requests whose extensions carry no authenticated user.
pub async fn require_auth(req: Request<Body>, next: Next) -> Response {
    if req.extensions().get::<user::Model>().is_none() {
        return AppError::Unauthorized.into_response();
    }

    next.run(req).await
}
