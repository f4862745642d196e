//! Enrollment repository.

use std::sync::Arc;

use crate::entities::{Enrollment, enrollment};
use classroom_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, QueryFilter,
    QueryOrder, QuerySelect,
};

use super::{map_insert_err, map_update_err};

/// Enrollment repository for database operations.
#[derive(Clone)]
pub struct EnrollmentRepository {
    db: Arc<DatabaseConnection>,
}

impl EnrollmentRepository {
    /// Create a new enrollment repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find an enrollment by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<enrollment::Model>> {
        Enrollment::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find an enrollment by its (course, student) pair.
    pub async fn find_by_pair(
        &self,
        course_id: &str,
        student_id: &str,
    ) -> AppResult<Option<enrollment::Model>> {
        Enrollment::find()
            .filter(enrollment::Column::CourseId.eq(course_id))
            .filter(enrollment::Column::StudentId.eq(student_id))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new enrollment. A duplicate (course, student) pair
    /// surfaces as Conflict; the service turns it into a status update.
    pub async fn create(&self, model: enrollment::ActiveModel) -> AppResult<enrollment::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| map_insert_err(e, "enrollment"))
    }

    /// Update an enrollment.
    pub async fn update(&self, model: enrollment::ActiveModel) -> AppResult<enrollment::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| map_update_err(e, "enrollment"))
    }

    /// Delete an enrollment.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        let enrollment = self.find_by_id(id).await?;
        if let Some(e) = enrollment {
            e.delete(self.db.as_ref())
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;
        }
        Ok(())
    }

    /// List enrollments of a course.
    pub async fn find_by_course(&self, course_id: &str) -> AppResult<Vec<enrollment::Model>> {
        Enrollment::find()
            .filter(enrollment::Column::CourseId.eq(course_id))
            .order_by_asc(enrollment::Column::CreatedAt)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List enrollments of a student.
    pub async fn find_by_student(&self, student_id: &str) -> AppResult<Vec<enrollment::Model>> {
        Enrollment::find()
            .filter(enrollment::Column::StudentId.eq(student_id))
            .order_by_desc(enrollment::Column::CreatedAt)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Student IDs of a course's active enrollments, for notification
    /// fan-out.
    pub async fn find_active_student_ids(&self, course_id: &str) -> AppResult<Vec<String>> {
        Enrollment::find()
            .filter(enrollment::Column::CourseId.eq(course_id))
            .filter(enrollment::Column::Status.eq(enrollment::EnrollmentStatus::Active))
            .select_only()
            .column(enrollment::Column::StudentId)
            .into_tuple::<String>()
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::entities::enrollment::EnrollmentStatus;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult, Set};

    fn create_test_enrollment(id: &str, course_id: &str, student_id: &str) -> enrollment::Model {
        enrollment::Model {
            id: id.to_string(),
            course_id: course_id.to_string(),
            student_id: student_id.to_string(),
            status: EnrollmentStatus::Active,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    #[tokio::test]
    async fn test_find_by_pair_found() {
        let enrollment = create_test_enrollment("enr1", "course1", "student1");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[enrollment.clone()]])
                .into_connection(),
        );

        let repo = EnrollmentRepository::new(db);
        let result = repo.find_by_pair("course1", "student1").await.unwrap();

        assert!(result.is_some());
        assert_eq!(result.unwrap().status, EnrollmentStatus::Active);
    }

    #[tokio::test]
    async fn test_find_by_pair_not_found() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<enrollment::Model>::new()])
                .into_connection(),
        );

        let repo = EnrollmentRepository::new(db);
        let result = repo.find_by_pair("course1", "student2").await.unwrap();

        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_create_enrollment() {
        let enrollment = create_test_enrollment("enr1", "course1", "student1");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[enrollment.clone()]])
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .into_connection(),
        );

        let repo = EnrollmentRepository::new(db);

        let active = enrollment::ActiveModel {
            id: Set("enr1".to_string()),
            course_id: Set("course1".to_string()),
            student_id: Set("student1".to_string()),
            status: Set(EnrollmentStatus::Active),
            created_at: Set(Utc::now().into()),
            ..Default::default()
        };

        let result = repo.create(active).await.unwrap();
        assert_eq!(result.course_id, "course1");
    }

    #[tokio::test]
    async fn test_find_active_student_ids() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[
                    maplit::btreemap! {
                        "student_id" => sea_orm::Value::from("student1"),
                    },
                    maplit::btreemap! {
                        "student_id" => sea_orm::Value::from("student2"),
                    },
                ]])
                .into_connection(),
        );

        let repo = EnrollmentRepository::new(db);
        let result = repo.find_active_student_ids("course1").await.unwrap();

        assert_eq!(result, vec!["student1".to_string(), "student2".to_string()]);
    }
}
