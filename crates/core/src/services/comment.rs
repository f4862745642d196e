//! Comment service.
//!
//! Comments attach to an assignment or to a submission. A teacher
//! commenting on a student's submission notifies the student.

use classroom_common::{AppError, AppResult, IdGenerator};
use classroom_db::{
    entities::{comment, notification, notification::NotificationType, user::UserRole},
    repositories::{
        AssignmentRepository, CommentRepository, NotificationRepository, SubmissionRepository,
        UserRepository,
    },
};
use sea_orm::Set;
use serde::Deserialize;
use validator::Validate;

/// Comment service for business logic.
#[derive(Clone)]
pub struct CommentService {
    comment_repo: CommentRepository,
    assignment_repo: AssignmentRepository,
    submission_repo: SubmissionRepository,
    user_repo: UserRepository,
    notification_repo: NotificationRepository,
    id_gen: IdGenerator,
}

/// Input for creating a comment.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateCommentInput {
    /// At least one target is required.
    pub assignment_id: Option<String>,

    pub submission_id: Option<String>,

    pub user_id: String,

    #[validate(length(min = 1, max = 8192))]
    pub content: String,
}

impl CommentService {
    /// Create a new comment service.
    #[must_use]
    pub fn new(
        comment_repo: CommentRepository,
        assignment_repo: AssignmentRepository,
        submission_repo: SubmissionRepository,
        user_repo: UserRepository,
        notification_repo: NotificationRepository,
    ) -> Self {
        Self {
            comment_repo,
            assignment_repo,
            submission_repo,
            user_repo,
            notification_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Create a comment on an assignment or a submission.
    ///
    /// When a teacher comments on another user's submission, the submitting
    /// student gets a notification. The notification is best-effort:
    /// its failure never fails the comment.
    pub async fn create(&self, input: CreateCommentInput) -> AppResult<comment::Model> {
        input.validate()?;

        if input.assignment_id.is_none() && input.submission_id.is_none() {
            return Err(AppError::BadRequest(
                "A comment needs an assignment or a submission target".to_string(),
            ));
        }

        let author = self.user_repo.get_by_id(&input.user_id).await?;

        if let Some(assignment_id) = &input.assignment_id {
            self.assignment_repo.get_by_id(assignment_id).await?;
        }

        let submission = match &input.submission_id {
            Some(submission_id) => Some(self.submission_repo.get_by_id(submission_id).await?),
            None => None,
        };

        let model = comment::ActiveModel {
            id: Set(self.id_gen.generate()),
            assignment_id: Set(input.assignment_id),
            submission_id: Set(input.submission_id),
            user_id: Set(author.id.clone()),
            content: Set(input.content),
            created_at: Set(chrono::Utc::now().into()),
            ..Default::default()
        };

        let comment = self.comment_repo.create(model).await?;

        if let Some(submission) = submission {
            if author.role == UserRole::Teacher && author.id != submission.student_id {
                let notification = notification::ActiveModel {
                    id: Set(self.id_gen.generate()),
                    user_id: Set(submission.student_id.clone()),
                    title: Set("New Comment on Submission".to_string()),
                    message: Set(format!(
                        "Your submission has received a new comment from {} {}",
                        author.first_name, author.last_name
                    )),
                    notification_type: Set(NotificationType::Comment),
                    reference_id: Set(Some(comment.id.clone())),
                    is_read: Set(false),
                    created_at: Set(chrono::Utc::now().into()),
                };

                if let Err(e) = self.notification_repo.create(notification).await {
                    tracing::warn!(
                        comment_id = %comment.id,
                        student_id = %submission.student_id,
                        error = %e,
                        "Comment notification failed"
                    );
                }
            }
        }

        Ok(comment)
    }

    /// Get a comment by ID.
    pub async fn get(&self, id: &str) -> AppResult<comment::Model> {
        self.comment_repo.get_by_id(id).await
    }

    /// List comments on an assignment, oldest first.
    pub async fn list_for_assignment(&self, assignment_id: &str) -> AppResult<Vec<comment::Model>> {
        self.assignment_repo.get_by_id(assignment_id).await?;
        self.comment_repo.find_by_assignment(assignment_id).await
    }

    /// List comments on a submission, oldest first.
    pub async fn list_for_submission(&self, submission_id: &str) -> AppResult<Vec<comment::Model>> {
        self.submission_repo.get_by_id(submission_id).await?;
        self.comment_repo.find_by_submission(submission_id).await
    }

    /// Update a comment's content.
    pub async fn update(&self, id: &str, content: String) -> AppResult<comment::Model> {
        if content.is_empty() {
            return Err(AppError::Validation("Comment content is required".to_string()));
        }

        let comment = self.comment_repo.get_by_id(id).await?;
        let mut active: comment::ActiveModel = comment.into();

        active.content = Set(content);
        active.updated_at = Set(Some(chrono::Utc::now().into()));

        self.comment_repo.update(active).await
    }

    /// Delete a comment.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        self.comment_repo.delete(id).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use classroom_db::entities::{submission, submission::SubmissionStatus, user};
    use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase, MockExecResult};
    use std::sync::Arc;

    fn create_test_user(id: &str, role: UserRole) -> user::Model {
        user::Model {
            id: id.to_string(),
            email: format!("{id}@example.com"),
            password_hash: "$argon2id$test".to_string(),
            first_name: "Jane".to_string(),
            last_name: "Doe".to_string(),
            role,
            avatar_url: None,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    fn create_test_submission(id: &str, student_id: &str) -> submission::Model {
        submission::Model {
            id: id.to_string(),
            assignment_id: "asg1".to_string(),
            student_id: student_id.to_string(),
            text: Some("My answer".to_string()),
            grade: None,
            feedback: None,
            status: SubmissionStatus::Submitted,
            submitted_at: Utc::now().into(),
            graded_at: None,
        }
    }

    fn create_test_comment(id: &str, user_id: &str) -> comment::Model {
        comment::Model {
            id: id.to_string(),
            assignment_id: None,
            submission_id: Some("sub1".to_string()),
            user_id: user_id.to_string(),
            content: "Good work".to_string(),
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    fn empty_db() -> Arc<DatabaseConnection> {
        Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection())
    }

    fn service_with(
        comment_db: Arc<DatabaseConnection>,
        submission_db: Arc<DatabaseConnection>,
        user_db: Arc<DatabaseConnection>,
        notification_db: Arc<DatabaseConnection>,
    ) -> CommentService {
        CommentService::new(
            CommentRepository::new(comment_db),
            AssignmentRepository::new(empty_db()),
            SubmissionRepository::new(submission_db),
            UserRepository::new(user_db),
            NotificationRepository::new(notification_db),
        )
    }

    #[tokio::test]
    async fn test_create_rejects_missing_target() {
        let service = service_with(empty_db(), empty_db(), empty_db(), empty_db());

        let result = service
            .create(CreateCommentInput {
                assignment_id: None,
                submission_id: None,
                user_id: "teacher1".to_string(),
                content: "Good work".to_string(),
            })
            .await;

        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_teacher_comment_notifies_student() {
        let teacher = create_test_user("teacher1", UserRole::Teacher);
        let submission = create_test_submission("sub1", "student1");
        let comment = create_test_comment("com1", "teacher1");
        let notification = notification::Model {
            id: "not1".to_string(),
            user_id: "student1".to_string(),
            title: "New Comment on Submission".to_string(),
            message: "Your submission has received a new comment from Jane Doe".to_string(),
            notification_type: NotificationType::Comment,
            reference_id: Some("com1".to_string()),
            is_read: false,
            created_at: Utc::now().into(),
        };

        let user_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[teacher]])
                .into_connection(),
        );
        let submission_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[submission]])
                .into_connection(),
        );
        let comment_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[comment.clone()]])
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .into_connection(),
        );
        // The notification insert consumes mock results too; their presence
        // is what the assertion below relies on.
        let notification_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[notification]])
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .into_connection(),
        );

        let service = service_with(comment_db, submission_db, user_db, notification_db);

        let result = service
            .create(CreateCommentInput {
                assignment_id: None,
                submission_id: Some("sub1".to_string()),
                user_id: "teacher1".to_string(),
                content: "Good work".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(result.id, "com1");
    }

    #[tokio::test]
    async fn test_student_comment_on_own_submission_skips_notification() {
        let student = create_test_user("student1", UserRole::Student);
        let submission = create_test_submission("sub1", "student1");
        let comment = create_test_comment("com1", "student1");

        let user_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[student]])
                .into_connection(),
        );
        let submission_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[submission]])
                .into_connection(),
        );
        let comment_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[comment.clone()]])
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .into_connection(),
        );
        // No results appended: an unexpected notification insert would fail.
        let notification_db = empty_db();

        let service = service_with(comment_db, submission_db, user_db, notification_db);

        let result = service
            .create(CreateCommentInput {
                assignment_id: None,
                submission_id: Some("sub1".to_string()),
                user_id: "student1".to_string(),
                content: "Forgot one part".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(result.user_id, "student1");
    }

    #[tokio::test]
    async fn test_admin_comment_does_not_notify() {
        let admin = create_test_user("admin1", UserRole::Admin);
        let submission = create_test_submission("sub1", "student1");
        let comment = create_test_comment("com1", "admin1");

        let user_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[admin]])
                .into_connection(),
        );
        let submission_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[submission]])
                .into_connection(),
        );
        let comment_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[comment.clone()]])
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .into_connection(),
        );
        // An insert here would succeed, so the transaction log tells the
        // truth about whether one happened.
        let notification_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[notification::Model {
                    id: "not1".to_string(),
                    user_id: "student1".to_string(),
                    title: "New Comment on Submission".to_string(),
                    message: "Your submission has received a new comment".to_string(),
                    notification_type: NotificationType::Comment,
                    reference_id: Some("com1".to_string()),
                    is_read: false,
                    created_at: Utc::now().into(),
                }]])
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .into_connection(),
        );

        let service = service_with(
            comment_db,
            submission_db,
            user_db,
            Arc::clone(&notification_db),
        );

        let result = service
            .create(CreateCommentInput {
                assignment_id: None,
                submission_id: Some("sub1".to_string()),
                user_id: "admin1".to_string(),
                content: "Flagged for review".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(result.id, "com1");

        drop(service);
        let log = Arc::try_unwrap(notification_db)
            .ok()
            .unwrap()
            .into_transaction_log();
        assert!(log.is_empty());
    }

    #[tokio::test]
    async fn test_notification_failure_does_not_fail_comment() {
        let teacher = create_test_user("teacher1", UserRole::Teacher);
        let submission = create_test_submission("sub1", "student1");
        let comment = create_test_comment("com1", "teacher1");

        let user_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[teacher]])
                .into_connection(),
        );
        let submission_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[submission]])
                .into_connection(),
        );
        let comment_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[comment.clone()]])
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .into_connection(),
        );
        // Notification insert hits an exhausted mock and errors; the comment
        // must still come back.
        let notification_db = empty_db();

        let service = service_with(comment_db, submission_db, user_db, notification_db);

        let result = service
            .create(CreateCommentInput {
                assignment_id: None,
                submission_id: Some("sub1".to_string()),
                user_id: "teacher1".to_string(),
                content: "Good work".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(result.id, "com1");
    }
}
