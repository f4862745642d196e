//! Course and enrollment endpoints.

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post},
};
use classroom_common::AppResult;
use classroom_core::{CreateCourseInput, UpdateCourseInput, UserSummary};
use classroom_db::entities::{course, enrollment, enrollment::EnrollmentStatus};
use serde::{Deserialize, Serialize};

use crate::{
    endpoints::{
        announcements::AnnouncementResponse, assignments::AssignmentResponse, users::UserResponse,
    },
    extractors::AuthUser,
    middleware::AppState,
    response::{Created, CreatedOrOk, no_content},
};

/// Course response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseResponse {
    pub id: String,
    pub name: String,
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub section: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub room: Option<String>,
    pub teacher_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub teacher: Option<UserSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub folder_id: Option<String>,
    pub is_archived: bool,
    pub created_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl From<course::Model> for CourseResponse {
    fn from(c: course::Model) -> Self {
        Self {
            id: c.id,
            name: c.name,
            code: c.code,
            description: c.description,
            section: c.section,
            subject: c.subject,
            room: c.room,
            teacher_id: c.teacher_id,
            teacher: None,
            folder_id: c.folder_id,
            is_archived: c.is_archived,
            created_at: c.created_at.to_rfc3339(),
            updated_at: c.updated_at.map(|d| d.to_rfc3339()),
        }
    }
}

impl CourseResponse {
    /// Attach the owning teacher's summary.
    pub(crate) fn with_teacher(mut self, teacher: UserSummary) -> Self {
        self.teacher = Some(teacher);
        self
    }
}

/// Enrollment response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrollmentResponse {
    pub id: String,
    pub course_id: String,
    pub student_id: String,
    pub status: EnrollmentStatus,
    pub created_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl From<enrollment::Model> for EnrollmentResponse {
    fn from(e: enrollment::Model) -> Self {
        Self {
            id: e.id,
            course_id: e.course_id,
            student_id: e.student_id,
            status: e.status,
            created_at: e.created_at.to_rfc3339(),
            updated_at: e.updated_at.map(|d| d.to_rfc3339()),
        }
    }
}

/// Create course request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCourseRequest {
    pub name: String,
    pub description: Option<String>,
    pub section: Option<String>,
    pub subject: Option<String>,
    pub room: Option<String>,
    /// Defaults to the authenticated user.
    pub teacher_id: Option<String>,
    pub folder_id: Option<String>,
    pub code: Option<String>,
}

/// Update course request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCourseRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub section: Option<String>,
    pub subject: Option<String>,
    pub room: Option<String>,
    pub folder_id: Option<String>,
    pub is_archived: Option<bool>,
}

/// Enroll request.
#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct EnrollRequest {
    /// Defaults to the authenticated user.
    pub student_id: Option<String>,
    pub status: Option<EnrollmentStatus>,
}

/// Join-by-code response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinByCodeResponse {
    pub course_id: String,
    pub enrollment: EnrollmentResponse,
}

/// List all courses.
async fn list_courses(State(state): State<AppState>) -> AppResult<Json<Vec<CourseResponse>>> {
    let courses = state.course_service.list().await?;
    Ok(Json(courses.into_iter().map(Into::into).collect()))
}

/// Create a course.
async fn create_course(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<CreateCourseRequest>,
) -> AppResult<Created<CourseResponse>> {
    let course = state
        .course_service
        .create(CreateCourseInput {
            name: req.name,
            description: req.description,
            section: req.section,
            subject: req.subject,
            room: req.room,
            teacher_id: req.teacher_id.unwrap_or(user.id),
            folder_id: req.folder_id,
            code: req.code,
        })
        .await?;

    Ok(Created(course.into()))
}

/// Get a course by ID.
async fn get_course(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<CourseResponse>> {
    let course = state.course_service.get(&id).await?;
    let teacher = state.user_service.get(&course.teacher_id).await?;
    Ok(Json(CourseResponse::from(course).with_teacher(teacher.into())))
}

/// Update a course.
async fn update_course(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<UpdateCourseRequest>,
) -> AppResult<Json<CourseResponse>> {
    let course = state
        .course_service
        .update(
            &id,
            UpdateCourseInput {
                name: req.name,
                description: req.description,
                section: req.section,
                subject: req.subject,
                room: req.room,
                folder_id: req.folder_id.map(Some),
                is_archived: req.is_archived,
            },
        )
        .await?;

    Ok(Json(course.into()))
}

/// Delete a course.
async fn delete_course(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<impl axum::response::IntoResponse> {
    state.course_service.delete(&id).await?;
    Ok(no_content())
}

/// Enroll a student. 201 for a fresh enrollment, 200 when an existing one
/// had its status updated.
async fn enroll(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<EnrollRequest>,
) -> AppResult<CreatedOrOk<EnrollmentResponse>> {
    let student_id = req.student_id.unwrap_or(user.id);
    let outcome = state
        .course_service
        .enroll(&id, &student_id, req.status)
        .await?;

    Ok(CreatedOrOk {
        body: outcome.enrollment.into(),
        created: outcome.created,
    })
}

/// Join a course by its code.
async fn join_by_code(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> AppResult<CreatedOrOk<JoinByCodeResponse>> {
    let (course, outcome) = state
        .course_service
        .join_by_code(&code, &user.id, None)
        .await?;

    Ok(CreatedOrOk {
        body: JoinByCodeResponse {
            course_id: course.id,
            enrollment: outcome.enrollment.into(),
        },
        created: outcome.created,
    })
}

/// Students of a course.
async fn course_students(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Vec<UserResponse>>> {
    let students = state.course_service.students(&id).await?;
    Ok(Json(students.into_iter().map(Into::into).collect()))
}

/// Assignments of a course, soonest due first.
async fn course_assignments(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Vec<AssignmentResponse>>> {
    let assignments = state.assignment_service.list_for_course(&id).await?;
    Ok(Json(assignments.into_iter().map(Into::into).collect()))
}

/// Announcements of a course, newest first.
async fn course_announcements(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Vec<AnnouncementResponse>>> {
    let announcements = state.announcement_service.list_for_course(&id).await?;
    Ok(Json(announcements.into_iter().map(Into::into).collect()))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_courses).post(create_course))
        .route(
            "/{id}",
            get(get_course).put(update_course).delete(delete_course),
        )
        .route("/{id}/Enroll", post(enroll))
        .route("/{id}/Students", get(course_students))
        .route("/{id}/Assignments", get(course_assignments))
        .route("/{id}/Announcements", get(course_announcements))
        .route("/JoinByCode/{code}", post(join_by_code))
}
