//! Submission endpoints.

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::get,
};
use classroom_common::AppResult;
use classroom_core::{AddSubmissionFileInput, CreateCommentInput, UpdateSubmissionInput};
use classroom_db::entities::{comment, submission, submission::SubmissionStatus, submission_file};
use serde::{Deserialize, Serialize};

use crate::{
    extractors::AuthUser,
    middleware::AppState,
    response::{Created, no_content},
};

/// Submission response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionResponse {
    pub id: String,
    pub assignment_id: String,
    pub student_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grade: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feedback: Option<String>,
    pub status: SubmissionStatus,
    pub submitted_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub graded_at: Option<String>,
}

impl From<submission::Model> for SubmissionResponse {
    fn from(s: submission::Model) -> Self {
        Self {
            id: s.id,
            assignment_id: s.assignment_id,
            student_id: s.student_id,
            text: s.text,
            grade: s.grade,
            feedback: s.feedback,
            status: s.status,
            submitted_at: s.submitted_at.to_rfc3339(),
            graded_at: s.graded_at.map(|d| d.to_rfc3339()),
        }
    }
}

/// Submission file response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionFileResponse {
    pub id: String,
    pub submission_id: String,
    pub file_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_type: Option<String>,
    pub file_url: String,
    pub created_at: String,
}

impl From<submission_file::Model> for SubmissionFileResponse {
    fn from(f: submission_file::Model) -> Self {
        Self {
            id: f.id,
            submission_id: f.submission_id,
            file_name: f.file_name,
            file_type: f.file_type,
            file_url: f.file_url,
            created_at: f.created_at.to_rfc3339(),
        }
    }
}

/// Comment response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentResponse {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignment_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub submission_id: Option<String>,
    pub user_id: String,
    pub content: String,
    pub created_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl From<comment::Model> for CommentResponse {
    fn from(c: comment::Model) -> Self {
        Self {
            id: c.id,
            assignment_id: c.assignment_id,
            submission_id: c.submission_id,
            user_id: c.user_id,
            content: c.content,
            created_at: c.created_at.to_rfc3339(),
            updated_at: c.updated_at.map(|d| d.to_rfc3339()),
        }
    }
}

/// Update submission request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSubmissionRequest {
    pub text: Option<String>,
    pub status: Option<SubmissionStatus>,
}

/// Add file request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddFileRequest {
    pub file_name: String,
    pub file_type: Option<String>,
    pub file_url: String,
}

/// Create comment request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCommentRequest {
    pub content: String,
}

/// List all submissions.
async fn list_submissions(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<SubmissionResponse>>> {
    let submissions = state.submission_service.list().await?;
    Ok(Json(submissions.into_iter().map(Into::into).collect()))
}

/// Get a submission by ID.
async fn get_submission(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<SubmissionResponse>> {
    let submission = state.submission_service.get(&id).await?;
    Ok(Json(submission.into()))
}

/// Update a submission.
async fn update_submission(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<UpdateSubmissionRequest>,
) -> AppResult<Json<SubmissionResponse>> {
    let submission = state
        .submission_service
        .update(
            &id,
            UpdateSubmissionInput {
                text: req.text,
                status: req.status,
            },
        )
        .await?;

    Ok(Json(submission.into()))
}

/// Delete a submission.
async fn delete_submission(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<impl axum::response::IntoResponse> {
    state.submission_service.delete(&id).await?;
    Ok(no_content())
}

/// Files of a submission.
async fn list_files(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Vec<SubmissionFileResponse>>> {
    let files = state.submission_service.files(&id).await?;
    Ok(Json(files.into_iter().map(Into::into).collect()))
}

/// Attach a file to a submission.
async fn add_file(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<AddFileRequest>,
) -> AppResult<Created<SubmissionFileResponse>> {
    let file = state
        .submission_service
        .add_file(
            &id,
            AddSubmissionFileInput {
                file_name: req.file_name,
                file_type: req.file_type,
                file_url: req.file_url,
            },
        )
        .await?;

    Ok(Created(file.into()))
}

/// Get a submission file by ID.
async fn get_file(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<SubmissionFileResponse>> {
    let file = state.submission_service.file(&id).await?;
    Ok(Json(file.into()))
}

/// Comments on a submission, oldest first.
async fn list_comments(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Vec<CommentResponse>>> {
    let comments = state.comment_service.list_for_submission(&id).await?;
    Ok(Json(comments.into_iter().map(Into::into).collect()))
}

/// Comment on a submission. A teacher commenting on another student's
/// work notifies that student.
async fn add_comment(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<CreateCommentRequest>,
) -> AppResult<Created<CommentResponse>> {
    let comment = state
        .comment_service
        .create(CreateCommentInput {
            assignment_id: None,
            submission_id: Some(id),
            user_id: user.id,
            content: req.content,
        })
        .await?;

    Ok(Created(comment.into()))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_submissions))
        .route(
            "/{id}",
            get(get_submission)
                .put(update_submission)
                .delete(delete_submission),
        )
        .route("/{id}/Files", get(list_files).post(add_file))
        .route("/Files/{id}", get(get_file))
        .route("/{id}/Comments", get(list_comments).post(add_comment))
}
