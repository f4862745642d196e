//! Authentication endpoints.

use axum::{Json, Router, extract::State, routing::post};
use classroom_common::AppResult;
use classroom_core::{AuthResponse, LoginInput, RegisterInput};
use classroom_db::entities::user::UserRole;
use serde::Deserialize;

use crate::{middleware::AppState, response::Created};

/// Registration request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub role: UserRole,
}

/// Login request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Register a new account.
async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> AppResult<Created<AuthResponse>> {
    let response = state
        .auth_service
        .register(RegisterInput {
            email: req.email,
            password: req.password,
            first_name: req.first_name,
            last_name: req.last_name,
            role: req.role,
        })
        .await?;

    Ok(Created(response))
}

/// Log in with email and password.
async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    let response = state
        .auth_service
        .login(LoginInput {
            email: req.email,
            password: req.password,
        })
        .await?;

    Ok(Json(response))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
}
