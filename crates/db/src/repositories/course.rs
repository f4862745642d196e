//! Course repository.

use std::sync::Arc;

use crate::entities::{Course, course, enrollment, user};
use classroom_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, JoinType, ModelTrait,
    QueryFilter, QueryOrder, QuerySelect, RelationTrait,
};

use super::{map_insert_err, map_update_err};

/// Course repository for database operations.
#[derive(Clone)]
pub struct CourseRepository {
    db: Arc<DatabaseConnection>,
}

impl CourseRepository {
    /// Create a new course repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a course by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<course::Model>> {
        Course::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a course by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<course::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::CourseNotFound(id.to_string()))
    }

    /// Find a course by its join code (exact match, codes are stored
    /// uppercase).
    pub async fn find_by_code(&self, code: &str) -> AppResult<Option<course::Model>> {
        Course::find()
            .filter(course::Column::Code.eq(code))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new course. A join-code collision surfaces as Conflict,
    /// which the service's code generation loop retries on.
    pub async fn create(&self, model: course::ActiveModel) -> AppResult<course::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| map_insert_err(e, "course"))
    }

    /// Update a course.
    pub async fn update(&self, model: course::ActiveModel) -> AppResult<course::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| map_update_err(e, "course"))
    }

    /// Delete a course. Enrollments, assignments and announcements cascade.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        let course = self.get_by_id(id).await?;
        course
            .delete(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// List all courses, newest first.
    pub async fn find_all(&self) -> AppResult<Vec<course::Model>> {
        Course::find()
            .order_by_desc(course::Column::CreatedAt)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List courses owned by a teacher.
    pub async fn find_by_teacher(&self, teacher_id: &str) -> AppResult<Vec<course::Model>> {
        Course::find()
            .filter(course::Column::TeacherId.eq(teacher_id))
            .order_by_desc(course::Column::CreatedAt)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List courses a student is enrolled in, joined through enrollments.
    pub async fn find_by_student(&self, student_id: &str) -> AppResult<Vec<course::Model>> {
        Course::find()
            .join(JoinType::InnerJoin, course::Relation::Enrollments.def())
            .filter(enrollment::Column::StudentId.eq(student_id))
            .order_by_desc(course::Column::CreatedAt)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List courses filed under a folder.
    pub async fn find_by_folder(&self, folder_id: &str) -> AppResult<Vec<course::Model>> {
        Course::find()
            .filter(course::Column::FolderId.eq(folder_id))
            .order_by_asc(course::Column::Name)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List the students of a course, joined through enrollments of any
    /// status.
    pub async fn find_students(&self, course_id: &str) -> AppResult<Vec<user::Model>> {
        use crate::entities::User;

        User::find()
            .join(JoinType::InnerJoin, user::Relation::Enrollments.def())
            .filter(enrollment::Column::CourseId.eq(course_id))
            .order_by_asc(user::Column::LastName)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult, Set};

    fn create_test_course(id: &str, code: &str, teacher_id: &str) -> course::Model {
        course::Model {
            id: id.to_string(),
            name: "Math 101".to_string(),
            code: code.to_string(),
            description: None,
            section: None,
            subject: Some("Mathematics".to_string()),
            room: None,
            teacher_id: teacher_id.to_string(),
            folder_id: None,
            is_archived: false,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    #[tokio::test]
    async fn test_find_by_code_found() {
        let course = create_test_course("course1", "ABC123", "teacher1");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[course.clone()]])
                .into_connection(),
        );

        let repo = CourseRepository::new(db);
        let result = repo.find_by_code("ABC123").await.unwrap();

        assert!(result.is_some());
        assert_eq!(result.unwrap().id, "course1");
    }

    #[tokio::test]
    async fn test_find_by_code_not_found() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<course::Model>::new()])
                .into_connection(),
        );

        let repo = CourseRepository::new(db);
        let result = repo.find_by_code("ZZZZZZ").await.unwrap();

        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_get_by_id_not_found_returns_error() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<course::Model>::new()])
                .into_connection(),
        );

        let repo = CourseRepository::new(db);
        let result = repo.get_by_id("nonexistent").await;

        match result {
            Err(AppError::CourseNotFound(id)) => assert_eq!(id, "nonexistent"),
            _ => panic!("Expected CourseNotFound error"),
        }
    }

    #[tokio::test]
    async fn test_create_course() {
        let course = create_test_course("course1", "XYZ789", "teacher1");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[course.clone()]])
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .into_connection(),
        );

        let repo = CourseRepository::new(db);

        let active = course::ActiveModel {
            id: Set("course1".to_string()),
            name: Set("Math 101".to_string()),
            code: Set("XYZ789".to_string()),
            teacher_id: Set("teacher1".to_string()),
            is_archived: Set(false),
            created_at: Set(Utc::now().into()),
            ..Default::default()
        };

        let result = repo.create(active).await.unwrap();
        assert_eq!(result.code, "XYZ789");
    }

    #[tokio::test]
    async fn test_find_by_teacher() {
        let c1 = create_test_course("course1", "AAA111", "teacher1");
        let c2 = create_test_course("course2", "BBB222", "teacher1");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[c1, c2]])
                .into_connection(),
        );

        let repo = CourseRepository::new(db);
        let result = repo.find_by_teacher("teacher1").await.unwrap();

        assert_eq!(result.len(), 2);
    }
}
