//! Assignment endpoints.
//!
//! Also hosts the submission workflow routes that hang off an assignment
//! (submit, per-student lookup, grading) and assignment comments.

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post},
};
use chrono::{DateTime, FixedOffset};
use classroom_common::{AppError, AppResult};
use classroom_core::{
    AddMaterialInput, CreateAssignmentInput, CreateCommentInput, GradeInput, SubmitInput,
    UpdateAssignmentInput,
};
use classroom_db::entities::{
    assignment, assignment::AssignmentType, assignment_material, submission::SubmissionStatus,
};
use serde::{Deserialize, Serialize};

use crate::{
    endpoints::submissions::{CommentResponse, SubmissionResponse},
    extractors::AuthUser,
    middleware::AppState,
    response::{Created, CreatedOrOk, no_content},
};

/// Assignment response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentResponse {
    pub id: String,
    pub course_id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub points_possible: Option<f64>,
    pub assignment_type: AssignmentType,
    pub created_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl From<assignment::Model> for AssignmentResponse {
    fn from(a: assignment::Model) -> Self {
        Self {
            id: a.id,
            course_id: a.course_id,
            title: a.title,
            description: a.description,
            due_date: a.due_date.map(|d| d.to_rfc3339()),
            points_possible: a.points_possible,
            assignment_type: a.assignment_type,
            created_at: a.created_at.to_rfc3339(),
            updated_at: a.updated_at.map(|d| d.to_rfc3339()),
        }
    }
}

/// Material response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MaterialResponse {
    pub id: String,
    pub assignment_id: String,
    pub file_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_type: Option<String>,
    pub file_url: String,
    pub created_at: String,
}

impl From<assignment_material::Model> for MaterialResponse {
    fn from(m: assignment_material::Model) -> Self {
        Self {
            id: m.id,
            assignment_id: m.assignment_id,
            file_name: m.file_name,
            file_type: m.file_type,
            file_url: m.file_url,
            created_at: m.created_at.to_rfc3339(),
        }
    }
}

/// Create assignment request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAssignmentRequest {
    pub course_id: String,
    pub title: String,
    pub description: Option<String>,
    pub due_date: Option<DateTime<FixedOffset>>,
    pub points_possible: Option<f64>,
    pub assignment_type: Option<AssignmentType>,
}

/// Update assignment request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAssignmentRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub due_date: Option<DateTime<FixedOffset>>,
    pub points_possible: Option<f64>,
    pub assignment_type: Option<AssignmentType>,
}

/// Add material request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddMaterialRequest {
    pub file_name: String,
    pub file_type: Option<String>,
    pub file_url: String,
}

/// Submit request.
#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct SubmitRequest {
    pub text: Option<String>,
    pub status: Option<SubmissionStatus>,
}

/// Grade request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GradeRequest {
    pub grade: f64,
    pub feedback: Option<String>,
}

/// Create comment request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCommentRequest {
    pub content: String,
}

/// List all assignments.
async fn list_assignments(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<AssignmentResponse>>> {
    let assignments = state.assignment_service.list().await?;
    Ok(Json(assignments.into_iter().map(Into::into).collect()))
}

/// Create an assignment.
async fn create_assignment(
    State(state): State<AppState>,
    Json(req): Json<CreateAssignmentRequest>,
) -> AppResult<Created<AssignmentResponse>> {
    let assignment = state
        .assignment_service
        .create(CreateAssignmentInput {
            course_id: req.course_id,
            title: req.title,
            description: req.description,
            due_date: req.due_date,
            points_possible: req.points_possible,
            assignment_type: req.assignment_type,
        })
        .await?;

    Ok(Created(assignment.into()))
}

/// Get an assignment by ID.
async fn get_assignment(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<AssignmentResponse>> {
    let assignment = state.assignment_service.get(&id).await?;
    Ok(Json(assignment.into()))
}

/// Update an assignment.
async fn update_assignment(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<UpdateAssignmentRequest>,
) -> AppResult<Json<AssignmentResponse>> {
    let assignment = state
        .assignment_service
        .update(
            &id,
            UpdateAssignmentInput {
                title: req.title,
                description: req.description,
                due_date: req.due_date.map(Some),
                points_possible: req.points_possible.map(Some),
                assignment_type: req.assignment_type,
            },
        )
        .await?;

    Ok(Json(assignment.into()))
}

/// Delete an assignment.
async fn delete_assignment(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<impl axum::response::IntoResponse> {
    state.assignment_service.delete(&id).await?;
    Ok(no_content())
}

/// Materials of an assignment.
async fn list_materials(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Vec<MaterialResponse>>> {
    let materials = state.assignment_service.materials(&id).await?;
    Ok(Json(materials.into_iter().map(Into::into).collect()))
}

/// Attach a material to an assignment.
async fn add_material(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<AddMaterialRequest>,
) -> AppResult<Created<MaterialResponse>> {
    let material = state
        .assignment_service
        .add_material(
            &id,
            AddMaterialInput {
                file_name: req.file_name,
                file_type: req.file_type,
                file_url: req.file_url,
            },
        )
        .await?;

    Ok(Created(material.into()))
}

/// Get a material by ID.
async fn get_material(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<MaterialResponse>> {
    let material = state.assignment_service.material(&id).await?;
    Ok(Json(material.into()))
}

/// Submissions for an assignment.
async fn list_submissions(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Vec<SubmissionResponse>>> {
    let submissions = state.submission_service.list_for_assignment(&id).await?;
    Ok(Json(submissions.into_iter().map(Into::into).collect()))
}

/// A specific student's submission for an assignment.
async fn student_submission(
    State(state): State<AppState>,
    Path((id, student_id)): Path<(String, String)>,
) -> AppResult<Json<SubmissionResponse>> {
    let submission = state
        .submission_service
        .find_for_pair(&id, &student_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Submission for assignment {id} not found")))?;

    Ok(Json(submission.into()))
}

/// Submit work. 201 for a fresh submission, 200 when an existing one was
/// overwritten.
async fn submit(
    State(state): State<AppState>,
    Path((id, student_id)): Path<(String, String)>,
    Json(req): Json<SubmitRequest>,
) -> AppResult<CreatedOrOk<SubmissionResponse>> {
    let outcome = state
        .submission_service
        .submit(SubmitInput {
            assignment_id: id,
            student_id,
            text: req.text,
            status: req.status,
        })
        .await?;

    Ok(CreatedOrOk {
        body: outcome.submission.into(),
        created: outcome.created,
    })
}

/// Grade a submission.
async fn grade_submission(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<GradeRequest>,
) -> AppResult<Json<SubmissionResponse>> {
    let submission = state
        .submission_service
        .grade(
            &id,
            GradeInput {
                grade: req.grade,
                feedback: req.feedback,
            },
        )
        .await?;

    Ok(Json(submission.into()))
}

/// Comments on an assignment, oldest first.
async fn list_comments(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Vec<CommentResponse>>> {
    let comments = state.comment_service.list_for_assignment(&id).await?;
    Ok(Json(comments.into_iter().map(Into::into).collect()))
}

/// Comment on an assignment.
async fn add_comment(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<CreateCommentRequest>,
) -> AppResult<Created<CommentResponse>> {
    let comment = state
        .comment_service
        .create(CreateCommentInput {
            assignment_id: Some(id),
            submission_id: None,
            user_id: user.id,
            content: req.content,
        })
        .await?;

    Ok(Created(comment.into()))
}

/// Get a comment by ID.
async fn get_comment(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<CommentResponse>> {
    let comment = state.comment_service.get(&id).await?;
    Ok(Json(comment.into()))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_assignments).post(create_assignment))
        .route(
            "/{id}",
            get(get_assignment)
                .put(update_assignment)
                .delete(delete_assignment),
        )
        .route("/{id}/Materials", get(list_materials).post(add_material))
        .route("/Materials/{id}", get(get_material))
        .route("/{id}/Submissions", get(list_submissions))
        .route("/{id}/Student/{studentId}/Submission", get(student_submission))
        .route("/{id}/Student/{studentId}/Submit", post(submit))
        .route("/Submissions/{id}/Grade", post(grade_submission))
        .route("/{id}/Comments", get(list_comments).post(add_comment))
        .route("/Comments/{id}", get(get_comment))
}
