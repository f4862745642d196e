//! HTTP API layer for classroom-rs.
//!
//! - **Endpoints**: the REST surface (auth, users, courses, folders,
//!   assignments, submissions, announcements, notifications)
//! - **Extractors**: authenticated-user extraction
//! - **Middleware**: bearer-token authentication
//!
//! Built on Axum 0.8 with Tower middleware stack.

pub mod endpoints;
pub mod extractors;
pub mod middleware;
pub mod response;

pub use endpoints::router;
pub use middleware::{AppState, auth_middleware};
