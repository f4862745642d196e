//! Folder endpoints.

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::get,
};
use classroom_common::AppResult;
use classroom_core::{CreateFolderInput, UpdateFolderInput};
use classroom_db::entities::folder;
use serde::{Deserialize, Serialize};

use crate::{
    endpoints::courses::CourseResponse,
    extractors::AuthUser,
    middleware::AppState,
    response::{Created, no_content},
};

/// Folder response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FolderResponse {
    pub id: String,
    pub name: String,
    pub owner_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    pub created_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl From<folder::Model> for FolderResponse {
    fn from(f: folder::Model) -> Self {
        Self {
            id: f.id,
            name: f.name,
            owner_id: f.owner_id,
            parent_id: f.parent_id,
            created_at: f.created_at.to_rfc3339(),
            updated_at: f.updated_at.map(|d| d.to_rfc3339()),
        }
    }
}

/// Create folder request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateFolderRequest {
    pub name: String,
    /// Defaults to the authenticated user.
    pub owner_id: Option<String>,
    pub parent_id: Option<String>,
}

/// Update folder request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateFolderRequest {
    pub name: Option<String>,
    pub parent_id: Option<String>,
}

/// Direct contents of a folder, child folders first.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FolderContentsResponse {
    pub folders: Vec<FolderResponse>,
    pub courses: Vec<CourseResponse>,
}

/// The authenticated user's folders.
async fn list_folders(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<Vec<FolderResponse>>> {
    let folders = state.course_service.folders_for_owner(&user.id).await?;
    Ok(Json(folders.into_iter().map(Into::into).collect()))
}

/// Create a folder.
async fn create_folder(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<CreateFolderRequest>,
) -> AppResult<Created<FolderResponse>> {
    let folder = state
        .course_service
        .create_folder(CreateFolderInput {
            name: req.name,
            owner_id: req.owner_id.unwrap_or(user.id),
            parent_id: req.parent_id,
        })
        .await?;

    Ok(Created(folder.into()))
}

/// Get a folder by ID.
async fn get_folder(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<FolderResponse>> {
    let folder = state.course_service.get_folder(&id).await?;
    Ok(Json(folder.into()))
}

/// Update a folder.
async fn update_folder(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<UpdateFolderRequest>,
) -> AppResult<Json<FolderResponse>> {
    let folder = state
        .course_service
        .update_folder(
            &id,
            UpdateFolderInput {
                name: req.name,
                parent_id: req.parent_id.map(Some),
            },
        )
        .await?;

    Ok(Json(folder.into()))
}

/// Delete a folder. Children cascade.
async fn delete_folder(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<impl axum::response::IntoResponse> {
    state.course_service.delete_folder(&id).await?;
    Ok(no_content())
}

/// Direct children of a folder.
async fn folder_children(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<FolderContentsResponse>> {
    let contents = state.course_service.folder_contents(&id).await?;

    Ok(Json(FolderContentsResponse {
        folders: contents.folders.into_iter().map(Into::into).collect(),
        courses: contents.courses.into_iter().map(Into::into).collect(),
    }))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_folders).post(create_folder))
        .route(
            "/{id}",
            get(get_folder).put(update_folder).delete(delete_folder),
        )
        .route("/{id}/Children", get(folder_children))
}
