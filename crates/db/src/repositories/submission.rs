//! Submission repository.
//!
//! Also owns the submission-file sub-resource.

use std::sync::Arc;

use crate::entities::{Submission, SubmissionFile, submission, submission_file};
use classroom_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, QueryFilter,
    QueryOrder,
};

use super::{map_insert_err, map_update_err};

/// Submission repository for database operations.
#[derive(Clone)]
pub struct SubmissionRepository {
    db: Arc<DatabaseConnection>,
}

impl SubmissionRepository {
    /// Create a new submission repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a submission by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<submission::Model>> {
        Submission::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a submission by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<submission::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Submission {id} not found")))
    }

    /// Find a submission by its (assignment, student) pair.
    pub async fn find_by_pair(
        &self,
        assignment_id: &str,
        student_id: &str,
    ) -> AppResult<Option<submission::Model>> {
        Submission::find()
            .filter(submission::Column::AssignmentId.eq(assignment_id))
            .filter(submission::Column::StudentId.eq(student_id))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new submission. A duplicate (assignment, student) pair
    /// surfaces as Conflict; the service turns it into an overwrite.
    pub async fn create(&self, model: submission::ActiveModel) -> AppResult<submission::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| map_insert_err(e, "submission"))
    }

    /// Update a submission.
    pub async fn update(&self, model: submission::ActiveModel) -> AppResult<submission::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| map_update_err(e, "submission"))
    }

    /// Delete a submission. Files cascade.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        let submission = self.get_by_id(id).await?;
        submission
            .delete(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// List all submissions, newest first.
    pub async fn find_all(&self) -> AppResult<Vec<submission::Model>> {
        Submission::find()
            .order_by_desc(submission::Column::SubmittedAt)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List submissions for an assignment.
    pub async fn find_by_assignment(
        &self,
        assignment_id: &str,
    ) -> AppResult<Vec<submission::Model>> {
        Submission::find()
            .filter(submission::Column::AssignmentId.eq(assignment_id))
            .order_by_desc(submission::Column::SubmittedAt)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List submissions by a student.
    pub async fn find_by_student(&self, student_id: &str) -> AppResult<Vec<submission::Model>> {
        Submission::find()
            .filter(submission::Column::StudentId.eq(student_id))
            .order_by_desc(submission::Column::SubmittedAt)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Attach a file to a submission.
    pub async fn add_file(
        &self,
        model: submission_file::ActiveModel,
    ) -> AppResult<submission_file::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a submission file by ID.
    pub async fn find_file_by_id(&self, id: &str) -> AppResult<Option<submission_file::Model>> {
        SubmissionFile::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List files of a submission.
    pub async fn find_files(&self, submission_id: &str) -> AppResult<Vec<submission_file::Model>> {
        SubmissionFile::find()
            .filter(submission_file::Column::SubmissionId.eq(submission_id))
            .order_by_asc(submission_file::Column::CreatedAt)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::entities::submission::SubmissionStatus;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult, Set};

    fn create_test_submission(id: &str, assignment_id: &str, student_id: &str) -> submission::Model {
        submission::Model {
            id: id.to_string(),
            assignment_id: assignment_id.to_string(),
            student_id: student_id.to_string(),
            text: Some("My answer".to_string()),
            grade: None,
            feedback: None,
            status: SubmissionStatus::Submitted,
            submitted_at: Utc::now().into(),
            graded_at: None,
        }
    }

    #[tokio::test]
    async fn test_find_by_pair_found() {
        let submission = create_test_submission("sub1", "asg1", "student1");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[submission.clone()]])
                .into_connection(),
        );

        let repo = SubmissionRepository::new(db);
        let result = repo.find_by_pair("asg1", "student1").await.unwrap();

        assert!(result.is_some());
        assert_eq!(result.unwrap().status, SubmissionStatus::Submitted);
    }

    #[tokio::test]
    async fn test_find_by_pair_not_found() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<submission::Model>::new()])
                .into_connection(),
        );

        let repo = SubmissionRepository::new(db);
        let result = repo.find_by_pair("asg1", "student2").await.unwrap();

        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_create_submission() {
        let submission = create_test_submission("sub1", "asg1", "student1");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[submission.clone()]])
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .into_connection(),
        );

        let repo = SubmissionRepository::new(db);

        let active = submission::ActiveModel {
            id: Set("sub1".to_string()),
            assignment_id: Set("asg1".to_string()),
            student_id: Set("student1".to_string()),
            text: Set(Some("My answer".to_string())),
            status: Set(SubmissionStatus::Submitted),
            submitted_at: Set(Utc::now().into()),
            ..Default::default()
        };

        let result = repo.create(active).await.unwrap();
        assert_eq!(result.assignment_id, "asg1");
    }

    #[tokio::test]
    async fn test_find_by_assignment() {
        let s1 = create_test_submission("sub1", "asg1", "student1");
        let s2 = create_test_submission("sub2", "asg1", "student2");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[s1, s2]])
                .into_connection(),
        );

        let repo = SubmissionRepository::new(db);
        let result = repo.find_by_assignment("asg1").await.unwrap();

        assert_eq!(result.len(), 2);
    }
}
