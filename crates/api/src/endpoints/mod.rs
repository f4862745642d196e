//! API endpoints.

mod announcements;
mod assignments;
mod auth;
mod courses;
mod folders;
mod notifications;
mod submissions;
mod users;

use axum::{Json, Router, middleware as axum_middleware, routing::get};

use crate::middleware::{AppState, require_auth};

/// Liveness probe.
async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "healthy" }))
}

/// Create the API router.
pub fn router() -> Router<AppState> {
    let protected = Router::new()
        .nest("/Users", users::router())
        .nest("/Courses", courses::router())
        .nest("/Folders", folders::router())
        .nest("/Assignments", assignments::router())
        .nest("/Submissions", submissions::router())
        .nest("/Announcements", announcements::router())
        .nest("/Notifications", notifications::router())
        .route_layer(axum_middleware::from_fn(require_auth));

    Router::new()
        .route("/health", get(health))
        .nest("/api/Auth", auth::router())
        .nest("/api", protected)
}
