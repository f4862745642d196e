//! User endpoints.

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::get,
};
use classroom_common::AppResult;
use classroom_core::{CreateUserInput, UpdateUserInput, UserSummary};
use classroom_db::entities::user::{self, UserRole};
use serde::{Deserialize, Serialize};

use crate::{
    endpoints::{courses::EnrollmentResponse, folders::FolderResponse},
    extractors::AuthUser,
    middleware::AppState,
    response::{Created, no_content},
};

use super::courses::CourseResponse;

/// User response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: UserRole,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    pub created_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl From<user::Model> for UserResponse {
    fn from(u: user::Model) -> Self {
        Self {
            id: u.id,
            email: u.email,
            first_name: u.first_name,
            last_name: u.last_name,
            role: u.role,
            avatar_url: u.avatar_url,
            created_at: u.created_at.to_rfc3339(),
            updated_at: u.updated_at.map(|d| d.to_rfc3339()),
        }
    }
}

/// Create user request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub role: UserRole,
}

/// Update user request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub avatar_url: Option<String>,
    pub password: Option<String>,
}

/// A user's workspace: their folders, then their courses.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceResponse {
    pub folders: Vec<FolderResponse>,
    pub courses: Vec<CourseResponse>,
}

/// List all users.
async fn list_users(State(state): State<AppState>) -> AppResult<Json<Vec<UserResponse>>> {
    let users = state.user_service.list().await?;
    Ok(Json(users.into_iter().map(Into::into).collect()))
}

/// Create a user.
async fn create_user(
    State(state): State<AppState>,
    Json(req): Json<CreateUserRequest>,
) -> AppResult<Created<UserResponse>> {
    let user = state
        .user_service
        .create(CreateUserInput {
            email: req.email,
            password: req.password,
            first_name: req.first_name,
            last_name: req.last_name,
            role: req.role,
        })
        .await?;

    Ok(Created(user.into()))
}

/// The authenticated user, from the bearer token.
async fn current_user(AuthUser(user): AuthUser) -> Json<UserResponse> {
    Json(user.into())
}

/// Get a user by ID.
async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<UserResponse>> {
    let user = state.user_service.get(&id).await?;
    Ok(Json(user.into()))
}

/// Update a user.
async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<UpdateUserRequest>,
) -> AppResult<Json<UserResponse>> {
    let user = state
        .user_service
        .update(
            &id,
            UpdateUserInput {
                first_name: req.first_name,
                last_name: req.last_name,
                email: req.email,
                avatar_url: req.avatar_url,
                password: req.password,
            },
        )
        .await?;

    Ok(Json(user.into()))
}

/// Delete a user.
async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<impl axum::response::IntoResponse> {
    state.user_service.delete(&id).await?;
    Ok(no_content())
}

/// A user's workspace, folders first. Teachers see the courses they own,
/// students the courses they are enrolled in.
async fn user_courses(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<WorkspaceResponse>> {
    let user = state.user_service.get(&id).await?;

    let workspace = if user.role.can_teach() {
        state.course_service.workspace_for_teacher(&user.id).await?
    } else {
        state.course_service.workspace_for_student(&user.id).await?
    };

    let owner_summary = UserSummary::from(user);

    let mut courses = Vec::with_capacity(workspace.courses.len());
    for course in workspace.courses {
        let teacher = if course.teacher_id == owner_summary.id {
            owner_summary.clone()
        } else {
            state.user_service.get(&course.teacher_id).await?.into()
        };
        courses.push(CourseResponse::from(course).with_teacher(teacher));
    }

    Ok(Json(WorkspaceResponse {
        folders: workspace.folders.into_iter().map(Into::into).collect(),
        courses,
    }))
}

/// A student's enrollments.
async fn user_enrollments(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Vec<EnrollmentResponse>>> {
    state.user_service.get(&id).await?;
    let enrollments = state.course_service.enrollments_for_student(&id).await?;
    Ok(Json(enrollments.into_iter().map(Into::into).collect()))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_users).post(create_user))
        .route("/current", get(current_user))
        .route("/{id}", get(get_user).put(update_user).delete(delete_user))
        .route("/{id}/Courses", get(user_courses))
        .route("/{id}/Enrollments", get(user_enrollments))
}
