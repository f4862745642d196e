//! Announcement endpoints.

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::get,
};
use classroom_common::AppResult;
use classroom_core::{CreateAnnouncementInput, UpdateAnnouncementInput};
use classroom_db::entities::announcement;
use serde::{Deserialize, Serialize};

use crate::{
    extractors::AuthUser,
    middleware::AppState,
    response::{Created, no_content},
};

/// Announcement response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnouncementResponse {
    pub id: String,
    pub course_id: String,
    pub teacher_id: String,
    pub title: String,
    pub content: String,
    pub created_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl From<announcement::Model> for AnnouncementResponse {
    fn from(a: announcement::Model) -> Self {
        Self {
            id: a.id,
            course_id: a.course_id,
            teacher_id: a.teacher_id,
            title: a.title,
            content: a.content,
            created_at: a.created_at.to_rfc3339(),
            updated_at: a.updated_at.map(|d| d.to_rfc3339()),
        }
    }
}

/// Create announcement request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAnnouncementRequest {
    pub course_id: String,
    /// Defaults to the authenticated user.
    pub teacher_id: Option<String>,
    pub title: String,
    pub content: String,
}

/// Update announcement request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAnnouncementRequest {
    pub title: Option<String>,
    pub content: Option<String>,
}

/// List all announcements.
async fn list_announcements(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<AnnouncementResponse>>> {
    let announcements = state.announcement_service.list().await?;
    Ok(Json(announcements.into_iter().map(Into::into).collect()))
}

/// Post an announcement. Every actively enrolled student is notified.
async fn create_announcement(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<CreateAnnouncementRequest>,
) -> AppResult<Created<AnnouncementResponse>> {
    let announcement = state
        .announcement_service
        .create(CreateAnnouncementInput {
            course_id: req.course_id,
            teacher_id: req.teacher_id.unwrap_or(user.id),
            title: req.title,
            content: req.content,
        })
        .await?;

    Ok(Created(announcement.into()))
}

/// Get an announcement by ID.
async fn get_announcement(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<AnnouncementResponse>> {
    let announcement = state.announcement_service.get(&id).await?;
    Ok(Json(announcement.into()))
}

/// Update an announcement.
async fn update_announcement(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<UpdateAnnouncementRequest>,
) -> AppResult<Json<AnnouncementResponse>> {
    let announcement = state
        .announcement_service
        .update(
            &id,
            UpdateAnnouncementInput {
                title: req.title,
                content: req.content,
            },
        )
        .await?;

    Ok(Json(announcement.into()))
}

/// Delete an announcement.
async fn delete_announcement(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<impl axum::response::IntoResponse> {
    state.announcement_service.delete(&id).await?;
    Ok(no_content())
}

/// Announcements of a course, newest first.
async fn by_course(
    State(state): State<AppState>,
    Path(course_id): Path<String>,
) -> AppResult<Json<Vec<AnnouncementResponse>>> {
    let announcements = state.announcement_service.list_for_course(&course_id).await?;
    Ok(Json(announcements.into_iter().map(Into::into).collect()))
}

/// Announcements posted by a teacher, newest first.
async fn by_teacher(
    State(state): State<AppState>,
    Path(teacher_id): Path<String>,
) -> AppResult<Json<Vec<AnnouncementResponse>>> {
    let announcements = state
        .announcement_service
        .list_for_teacher(&teacher_id)
        .await?;
    Ok(Json(announcements.into_iter().map(Into::into).collect()))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_announcements).post(create_announcement))
        .route(
            "/{id}",
            get(get_announcement)
                .put(update_announcement)
                .delete(delete_announcement),
        )
        .route("/Course/{courseId}", get(by_course))
        .route("/Teacher/{teacherId}", get(by_teacher))
}
