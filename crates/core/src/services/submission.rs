//! Submission service.
//!
//! A student has at most one submission per assignment; the unique
//! (assignment, student) pair arbitrates. Re-submitting overwrites the
//! existing row, and callers learn whether a row was created or replaced.

use classroom_common::{AppError, AppResult, IdGenerator};
use classroom_db::{
    entities::{submission, submission::SubmissionStatus, submission_file},
    repositories::{AssignmentRepository, SubmissionRepository, UserRepository},
};
use sea_orm::Set;
use serde::Deserialize;
use validator::Validate;

/// Submission service for business logic.
#[derive(Clone)]
pub struct SubmissionService {
    submission_repo: SubmissionRepository,
    assignment_repo: AssignmentRepository,
    user_repo: UserRepository,
    id_gen: IdGenerator,
}

/// Input for submitting work to an assignment.
#[derive(Debug, Deserialize, Validate)]
pub struct SubmitInput {
    pub assignment_id: String,

    pub student_id: String,

    #[validate(length(max = 65536))]
    pub text: Option<String>,

    pub status: Option<SubmissionStatus>,
}

/// Input for updating a submission.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateSubmissionInput {
    #[validate(length(max = 65536))]
    pub text: Option<String>,

    pub status: Option<SubmissionStatus>,
}

/// Input for grading a submission.
#[derive(Debug, Deserialize, Validate)]
pub struct GradeInput {
    pub grade: f64,

    #[validate(length(max = 8192))]
    pub feedback: Option<String>,
}

/// Input for attaching a file to a submission.
#[derive(Debug, Deserialize, Validate)]
pub struct AddSubmissionFileInput {
    #[validate(length(min = 1, max = 512))]
    pub file_name: String,

    #[validate(length(max = 128))]
    pub file_type: Option<String>,

    #[validate(length(min = 1, max = 2048))]
    pub file_url: String,
}

/// Result of a submit operation.
#[derive(Debug)]
pub struct SubmitOutcome {
    pub submission: submission::Model,
    /// True when a new row was created, false when an existing submission
    /// was overwritten.
    pub created: bool,
}

impl SubmissionService {
    /// Create a new submission service.
    #[must_use]
    pub fn new(
        submission_repo: SubmissionRepository,
        assignment_repo: AssignmentRepository,
        user_repo: UserRepository,
    ) -> Self {
        Self {
            submission_repo,
            assignment_repo,
            user_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Submit work to an assignment.
    ///
    /// Tries a fresh insert first; a conflict on the (assignment, student)
    /// pair means the student already submitted, and the existing row is
    /// overwritten with the new content and a fresh submitted_at.
    pub async fn submit(&self, input: SubmitInput) -> AppResult<SubmitOutcome> {
        input.validate()?;

        let assignment = self.assignment_repo.get_by_id(&input.assignment_id).await?;
        let student = self.user_repo.get_by_id(&input.student_id).await?;
        let status = input.status.unwrap_or_default();

        let model = submission::ActiveModel {
            id: Set(self.id_gen.generate()),
            assignment_id: Set(assignment.id.clone()),
            student_id: Set(student.id.clone()),
            text: Set(input.text.clone()),
            status: Set(status),
            submitted_at: Set(chrono::Utc::now().into()),
            ..Default::default()
        };

        match self.submission_repo.create(model).await {
            Ok(submission) => Ok(SubmitOutcome {
                submission,
                created: true,
            }),
            Err(AppError::Conflict(_)) => {
                let existing = self
                    .submission_repo
                    .find_by_pair(&assignment.id, &student.id)
                    .await?
                    .ok_or_else(|| {
                        AppError::Database("Submission conflict with no existing row".to_string())
                    })?;

                let mut active: submission::ActiveModel = existing.into();
                active.text = Set(input.text);
                active.status = Set(status);
                active.submitted_at = Set(chrono::Utc::now().into());

                let submission = self.submission_repo.update(active).await?;
                Ok(SubmitOutcome {
                    submission,
                    created: false,
                })
            }
            Err(e) => Err(e),
        }
    }

    /// Get a submission by ID.
    pub async fn get(&self, id: &str) -> AppResult<submission::Model> {
        self.submission_repo.get_by_id(id).await
    }

    /// List all submissions.
    pub async fn list(&self) -> AppResult<Vec<submission::Model>> {
        self.submission_repo.find_all().await
    }

    /// List submissions for an assignment.
    pub async fn list_for_assignment(
        &self,
        assignment_id: &str,
    ) -> AppResult<Vec<submission::Model>> {
        self.assignment_repo.get_by_id(assignment_id).await?;
        self.submission_repo.find_by_assignment(assignment_id).await
    }

    /// List submissions by a student.
    pub async fn list_for_student(&self, student_id: &str) -> AppResult<Vec<submission::Model>> {
        self.submission_repo.find_by_student(student_id).await
    }

    /// A student's submission for an assignment, if any.
    pub async fn find_for_pair(
        &self,
        assignment_id: &str,
        student_id: &str,
    ) -> AppResult<Option<submission::Model>> {
        self.submission_repo
            .find_by_pair(assignment_id, student_id)
            .await
    }

    /// Update a submission's content or status.
    pub async fn update(&self, id: &str, input: UpdateSubmissionInput) -> AppResult<submission::Model> {
        input.validate()?;

        let submission = self.submission_repo.get_by_id(id).await?;
        let mut active: submission::ActiveModel = submission.into();

        if let Some(text) = input.text {
            active.text = Set(Some(text));
        }
        if let Some(status) = input.status {
            active.status = Set(status);
        }

        self.submission_repo.update(active).await
    }

    /// Grade a submission.
    ///
    /// Always forces status to Graded and stamps graded_at, whatever the
    /// previous state. The grade value is not clamped.
    pub async fn grade(&self, id: &str, input: GradeInput) -> AppResult<submission::Model> {
        input.validate()?;

        let submission = self.submission_repo.get_by_id(id).await?;
        let mut active: submission::ActiveModel = submission.into();

        active.grade = Set(Some(input.grade));
        active.feedback = Set(input.feedback);
        active.status = Set(SubmissionStatus::Graded);
        active.graded_at = Set(Some(chrono::Utc::now().into()));

        self.submission_repo.update(active).await
    }

    /// Delete a submission.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        self.submission_repo.delete(id).await
    }

    /// Attach a file to a submission.
    pub async fn add_file(
        &self,
        submission_id: &str,
        input: AddSubmissionFileInput,
    ) -> AppResult<submission_file::Model> {
        input.validate()?;

        let submission = self.submission_repo.get_by_id(submission_id).await?;

        let model = submission_file::ActiveModel {
            id: Set(self.id_gen.generate()),
            submission_id: Set(submission.id),
            file_name: Set(input.file_name),
            file_type: Set(input.file_type),
            file_url: Set(input.file_url),
            created_at: Set(chrono::Utc::now().into()),
        };

        self.submission_repo.add_file(model).await
    }

    /// Get a submission file by ID.
    pub async fn file(&self, id: &str) -> AppResult<submission_file::Model> {
        self.submission_repo
            .find_file_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("File {id} not found")))
    }

    /// List files of a submission.
    pub async fn files(&self, submission_id: &str) -> AppResult<Vec<submission_file::Model>> {
        self.submission_repo.get_by_id(submission_id).await?;
        self.submission_repo.find_files(submission_id).await
    }
}
