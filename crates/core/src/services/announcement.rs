//! Announcement service.
//!
//! Posting an announcement fans a notification out to every actively
//! enrolled student. The fan-out is a second, independent write: its
//! failure is logged and the announcement stands.

use classroom_common::{AppError, AppResult, IdGenerator};
use classroom_db::{
    entities::{announcement, notification, notification::NotificationType, user::UserRole},
    repositories::{
        AnnouncementRepository, CourseRepository, EnrollmentRepository, NotificationRepository,
        UserRepository,
    },
};
use sea_orm::Set;
use serde::Deserialize;
use validator::Validate;

/// Announcement service for business logic.
#[derive(Clone)]
pub struct AnnouncementService {
    announcement_repo: AnnouncementRepository,
    course_repo: CourseRepository,
    enrollment_repo: EnrollmentRepository,
    user_repo: UserRepository,
    notification_repo: NotificationRepository,
    id_gen: IdGenerator,
}

/// Input for posting an announcement.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateAnnouncementInput {
    pub course_id: String,

    pub teacher_id: String,

    #[validate(length(min = 1, max = 256))]
    pub title: String,

    #[validate(length(min = 1, max = 16384))]
    pub content: String,
}

/// Input for updating an announcement.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateAnnouncementInput {
    #[validate(length(min = 1, max = 256))]
    pub title: Option<String>,

    #[validate(length(min = 1, max = 16384))]
    pub content: Option<String>,
}

impl AnnouncementService {
    /// Create a new announcement service.
    #[must_use]
    pub fn new(
        announcement_repo: AnnouncementRepository,
        course_repo: CourseRepository,
        enrollment_repo: EnrollmentRepository,
        user_repo: UserRepository,
        notification_repo: NotificationRepository,
    ) -> Self {
        Self {
            announcement_repo,
            course_repo,
            enrollment_repo,
            user_repo,
            notification_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Post an announcement to a course.
    ///
    /// The poster's role must be Teacher; anything else is rejected as an
    /// invalid teacher id. After the announcement lands, one notification
    /// per actively enrolled student is batch-inserted.
    pub async fn create(&self, input: CreateAnnouncementInput) -> AppResult<announcement::Model> {
        input.validate()?;

        let course = self.course_repo.get_by_id(&input.course_id).await?;
        let teacher = self.user_repo.get_by_id(&input.teacher_id).await?;

        if teacher.role != UserRole::Teacher {
            return Err(AppError::BadRequest("Invalid teacher ID".to_string()));
        }

        let model = announcement::ActiveModel {
            id: Set(self.id_gen.generate()),
            course_id: Set(course.id.clone()),
            teacher_id: Set(teacher.id.clone()),
            title: Set(input.title.clone()),
            content: Set(input.content),
            created_at: Set(chrono::Utc::now().into()),
            ..Default::default()
        };

        let announcement = self.announcement_repo.create(model).await?;

        if let Err(e) = self.notify_students(&announcement, &course.name).await {
            tracing::warn!(
                announcement_id = %announcement.id,
                course_id = %course.id,
                error = %e,
                "Announcement notification fan-out failed"
            );
        }

        Ok(announcement)
    }

    /// One notification per actively enrolled student, in a single batch.
    async fn notify_students(
        &self,
        announcement: &announcement::Model,
        course_name: &str,
    ) -> AppResult<u64> {
        let student_ids = self
            .enrollment_repo
            .find_active_student_ids(&announcement.course_id)
            .await?;

        let message = format!(
            "A new announcement has been posted in {}: {}",
            course_name, announcement.title
        );
        let now = chrono::Utc::now();

        let models: Vec<notification::ActiveModel> = student_ids
            .into_iter()
            .map(|student_id| notification::ActiveModel {
                id: Set(self.id_gen.generate()),
                user_id: Set(student_id),
                title: Set("New Announcement".to_string()),
                message: Set(message.clone()),
                notification_type: Set(NotificationType::Announcement),
                reference_id: Set(Some(announcement.id.clone())),
                is_read: Set(false),
                created_at: Set(now.into()),
            })
            .collect();

        self.notification_repo.insert_many(models).await
    }

    /// Get an announcement by ID.
    pub async fn get(&self, id: &str) -> AppResult<announcement::Model> {
        self.announcement_repo.get_by_id(id).await
    }

    /// List all announcements, newest first.
    pub async fn list(&self) -> AppResult<Vec<announcement::Model>> {
        self.announcement_repo.find_all().await
    }

    /// List announcements of a course, newest first.
    pub async fn list_for_course(&self, course_id: &str) -> AppResult<Vec<announcement::Model>> {
        self.course_repo.get_by_id(course_id).await?;
        self.announcement_repo.find_by_course(course_id).await
    }

    /// List announcements posted by a teacher, newest first.
    pub async fn list_for_teacher(&self, teacher_id: &str) -> AppResult<Vec<announcement::Model>> {
        self.announcement_repo.find_by_teacher(teacher_id).await
    }

    /// Update an announcement. No re-notification on edit.
    pub async fn update(
        &self,
        id: &str,
        input: UpdateAnnouncementInput,
    ) -> AppResult<announcement::Model> {
        input.validate()?;

        let announcement = self.announcement_repo.get_by_id(id).await?;
        let mut active: announcement::ActiveModel = announcement.into();

        if let Some(title) = input.title {
            active.title = Set(title);
        }
        if let Some(content) = input.content {
            active.content = Set(content);
        }
        active.updated_at = Set(Some(chrono::Utc::now().into()));

        self.announcement_repo.update(active).await
    }

    /// Delete an announcement.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        self.announcement_repo.delete(id).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use classroom_db::entities::{course, user, user::UserRole};
    use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase, MockExecResult, Value};
    use std::sync::Arc;

    fn create_test_user(id: &str, role: UserRole) -> user::Model {
        user::Model {
            id: id.to_string(),
            email: format!("{id}@example.com"),
            password_hash: "$argon2id$test".to_string(),
            first_name: "Test".to_string(),
            last_name: "Teacher".to_string(),
            role,
            avatar_url: None,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    fn create_test_course(id: &str) -> course::Model {
        course::Model {
            id: id.to_string(),
            name: "Math 101".to_string(),
            code: "ABC123".to_string(),
            description: None,
            section: None,
            subject: None,
            room: None,
            teacher_id: "teacher1".to_string(),
            folder_id: None,
            is_archived: false,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    fn create_test_announcement(id: &str) -> announcement::Model {
        announcement::Model {
            id: id.to_string(),
            course_id: "course1".to_string(),
            teacher_id: "teacher1".to_string(),
            title: "Exam moved".to_string(),
            content: "The exam is now on Friday.".to_string(),
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    fn empty_db() -> Arc<DatabaseConnection> {
        Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection())
    }

    fn service_with(
        announcement_db: Arc<DatabaseConnection>,
        course_db: Arc<DatabaseConnection>,
        enrollment_db: Arc<DatabaseConnection>,
        user_db: Arc<DatabaseConnection>,
        notification_db: Arc<DatabaseConnection>,
    ) -> AnnouncementService {
        AnnouncementService::new(
            AnnouncementRepository::new(announcement_db),
            CourseRepository::new(course_db),
            EnrollmentRepository::new(enrollment_db),
            UserRepository::new(user_db),
            NotificationRepository::new(notification_db),
        )
    }

    #[tokio::test]
    async fn test_student_cannot_post() {
        let course_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_course("course1")]])
                .into_connection(),
        );
        let user_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_user("student1", UserRole::Student)]])
                .into_connection(),
        );

        let service = service_with(empty_db(), course_db, empty_db(), user_db, empty_db());

        let result = service
            .create(CreateAnnouncementInput {
                course_id: "course1".to_string(),
                teacher_id: "student1".to_string(),
                title: "Hi".to_string(),
                content: "Hello".to_string(),
            })
            .await;

        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_admin_cannot_post() {
        let course_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_course("course1")]])
                .into_connection(),
        );
        let user_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_user("admin1", UserRole::Admin)]])
                .into_connection(),
        );

        let service = service_with(empty_db(), course_db, empty_db(), user_db, empty_db());

        let result = service
            .create(CreateAnnouncementInput {
                course_id: "course1".to_string(),
                teacher_id: "admin1".to_string(),
                title: "Hi".to_string(),
                content: "Hello".to_string(),
            })
            .await;

        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_create_fans_out_to_enrolled_students() {
        let course_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_course("course1")]])
                .into_connection(),
        );
        let user_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_user("teacher1", UserRole::Teacher)]])
                .into_connection(),
        );
        let announcement_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_announcement("ann1")]])
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .into_connection(),
        );
        let enrollment_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[
                    maplit::btreemap! { "student_id" => Value::from("student1") },
                    maplit::btreemap! { "student_id" => Value::from("student2") },
                ]])
                .into_connection(),
        );
        let notification_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 2,
                }])
                .into_connection(),
        );

        let service = service_with(
            announcement_db,
            course_db,
            enrollment_db,
            user_db,
            Arc::clone(&notification_db),
        );

        let result = service
            .create(CreateAnnouncementInput {
                course_id: "course1".to_string(),
                teacher_id: "teacher1".to_string(),
                title: "Exam moved".to_string(),
                content: "The exam is now on Friday.".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(result.id, "ann1");

        // One batch statement, one row per active enrollment, each
        // referencing the announcement.
        drop(service);
        let log = Arc::try_unwrap(notification_db)
            .ok()
            .unwrap()
            .into_transaction_log();
        assert_eq!(log.len(), 1);
        let batch = format!("{:?}", log[0]);
        assert!(batch.contains("student1"));
        assert!(batch.contains("student2"));
        assert_eq!(batch.matches("ann1").count(), 2);
    }

    #[tokio::test]
    async fn test_fan_out_failure_does_not_fail_announcement() {
        let course_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_course("course1")]])
                .into_connection(),
        );
        let user_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_user("teacher1", UserRole::Teacher)]])
                .into_connection(),
        );
        let announcement_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_announcement("ann1")]])
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .into_connection(),
        );
        // Exhausted enrollment mock makes the fan-out error out.
        let service = service_with(
            announcement_db,
            course_db,
            empty_db(),
            user_db,
            empty_db(),
        );

        let result = service
            .create(CreateAnnouncementInput {
                course_id: "course1".to_string(),
                teacher_id: "teacher1".to_string(),
                title: "Exam moved".to_string(),
                content: "The exam is now on Friday.".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(result.id, "ann1");
    }

    #[tokio::test]
    async fn test_unknown_course_is_not_found() {
        let course_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<course::Model>::new()])
                .into_connection(),
        );

        let service = service_with(empty_db(), course_db, empty_db(), empty_db(), empty_db());

        let result = service
            .create(CreateAnnouncementInput {
                course_id: "ghost".to_string(),
                teacher_id: "teacher1".to_string(),
                title: "Hi".to_string(),
                content: "Hello".to_string(),
            })
            .await;

        assert!(matches!(result, Err(AppError::CourseNotFound(_))));
    }
}
