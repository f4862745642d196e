//! Assignment service.

use classroom_common::{AppError, AppResult, IdGenerator};
use classroom_db::{
    entities::{assignment, assignment::AssignmentType, assignment_material},
    repositories::{AssignmentRepository, CourseRepository},
};
use chrono::{DateTime, FixedOffset};
use sea_orm::Set;
use serde::Deserialize;
use validator::Validate;

/// Assignment service for business logic.
#[derive(Clone)]
pub struct AssignmentService {
    assignment_repo: AssignmentRepository,
    course_repo: CourseRepository,
    id_gen: IdGenerator,
}

/// Input for creating an assignment.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateAssignmentInput {
    pub course_id: String,

    #[validate(length(min = 1, max = 256))]
    pub title: String,

    #[validate(length(max = 8192))]
    pub description: Option<String>,

    pub due_date: Option<DateTime<FixedOffset>>,

    pub points_possible: Option<f64>,

    pub assignment_type: Option<AssignmentType>,
}

/// Input for updating an assignment.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateAssignmentInput {
    #[validate(length(min = 1, max = 256))]
    pub title: Option<String>,

    #[validate(length(max = 8192))]
    pub description: Option<String>,

    pub due_date: Option<Option<DateTime<FixedOffset>>>,

    pub points_possible: Option<Option<f64>>,

    pub assignment_type: Option<AssignmentType>,
}

/// Input for attaching a material to an assignment.
#[derive(Debug, Deserialize, Validate)]
pub struct AddMaterialInput {
    #[validate(length(min = 1, max = 512))]
    pub file_name: String,

    #[validate(length(max = 128))]
    pub file_type: Option<String>,

    #[validate(length(min = 1, max = 2048))]
    pub file_url: String,
}

impl AssignmentService {
    /// Create a new assignment service.
    #[must_use]
    pub fn new(assignment_repo: AssignmentRepository, course_repo: CourseRepository) -> Self {
        Self {
            assignment_repo,
            course_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Create an assignment in a course.
    pub async fn create(&self, input: CreateAssignmentInput) -> AppResult<assignment::Model> {
        input.validate()?;

        let course = self.course_repo.get_by_id(&input.course_id).await?;

        let model = assignment::ActiveModel {
            id: Set(self.id_gen.generate()),
            course_id: Set(course.id),
            title: Set(input.title),
            description: Set(input.description),
            due_date: Set(input.due_date),
            points_possible: Set(input.points_possible),
            assignment_type: Set(input.assignment_type.unwrap_or_default()),
            created_at: Set(chrono::Utc::now().into()),
            ..Default::default()
        };

        self.assignment_repo.create(model).await
    }

    /// Get an assignment by ID.
    pub async fn get(&self, id: &str) -> AppResult<assignment::Model> {
        self.assignment_repo.get_by_id(id).await
    }

    /// List all assignments.
    pub async fn list(&self) -> AppResult<Vec<assignment::Model>> {
        self.assignment_repo.find_all().await
    }

    /// List assignments of a course, soonest due first.
    pub async fn list_for_course(&self, course_id: &str) -> AppResult<Vec<assignment::Model>> {
        self.course_repo.get_by_id(course_id).await?;
        self.assignment_repo.find_by_course(course_id).await
    }

    /// Update an assignment.
    pub async fn update(&self, id: &str, input: UpdateAssignmentInput) -> AppResult<assignment::Model> {
        input.validate()?;

        let assignment = self.assignment_repo.get_by_id(id).await?;
        let mut active: assignment::ActiveModel = assignment.into();

        if let Some(title) = input.title {
            active.title = Set(title);
        }
        if let Some(description) = input.description {
            active.description = Set(Some(description));
        }
        if let Some(due_date) = input.due_date {
            active.due_date = Set(due_date);
        }
        if let Some(points_possible) = input.points_possible {
            active.points_possible = Set(points_possible);
        }
        if let Some(assignment_type) = input.assignment_type {
            active.assignment_type = Set(assignment_type);
        }
        active.updated_at = Set(Some(chrono::Utc::now().into()));

        self.assignment_repo.update(active).await
    }

    /// Delete an assignment.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        self.assignment_repo.delete(id).await
    }

    /// Attach a material to an assignment.
    pub async fn add_material(
        &self,
        assignment_id: &str,
        input: AddMaterialInput,
    ) -> AppResult<assignment_material::Model> {
        input.validate()?;

        let assignment = self.assignment_repo.get_by_id(assignment_id).await?;

        let model = assignment_material::ActiveModel {
            id: Set(self.id_gen.generate()),
            assignment_id: Set(assignment.id),
            file_name: Set(input.file_name),
            file_type: Set(input.file_type),
            file_url: Set(input.file_url),
            created_at: Set(chrono::Utc::now().into()),
        };

        self.assignment_repo.add_material(model).await
    }

    /// Get a material by ID.
    pub async fn material(&self, id: &str) -> AppResult<assignment_material::Model> {
        self.assignment_repo
            .find_material_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Material {id} not found")))
    }

    /// List materials of an assignment.
    pub async fn materials(&self, assignment_id: &str) -> AppResult<Vec<assignment_material::Model>> {
        self.assignment_repo.get_by_id(assignment_id).await?;
        self.assignment_repo.find_materials(assignment_id).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use classroom_common::AppError;
    use classroom_db::entities::course;
    use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase, MockExecResult};
    use std::sync::Arc;

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

    fn create_test_assignment(id: &str, course_id: &str) -> assignment::Model {
        assignment::Model {
            id: id.to_string(),
            course_id: course_id.to_string(),
            title: "Homework 1".to_string(),
            description: None,
            due_date: None,
            points_possible: Some(100.0),
            assignment_type: AssignmentType::Assignment,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    fn empty_db() -> Arc<DatabaseConnection> {
        Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection())
    }

    #[tokio::test]
    async fn test_create_requires_existing_course() {
        let course_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<course::Model>::new()])
                .into_connection(),
        );

        let service = AssignmentService::new(
            AssignmentRepository::new(empty_db()),
            CourseRepository::new(course_db),
        );

        let result = service
            .create(CreateAssignmentInput {
                course_id: "ghost".to_string(),
                title: "Homework 1".to_string(),
                description: None,
                due_date: None,
                points_possible: Some(100.0),
                assignment_type: None,
            })
            .await;

        assert!(matches!(result, Err(AppError::CourseNotFound(_))));
    }

    #[tokio::test]
    async fn test_create_defaults_type_to_assignment() {
        let course = create_test_course("course1");
        let assignment = create_test_assignment("asg1", "course1");

        let course_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[course]])
                .into_connection(),
        );
        let assignment_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[assignment.clone()]])
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .into_connection(),
        );

        let service = AssignmentService::new(
            AssignmentRepository::new(assignment_db),
            CourseRepository::new(course_db),
        );

        let result = service
            .create(CreateAssignmentInput {
                course_id: "course1".to_string(),
                title: "Homework 1".to_string(),
                description: None,
                due_date: None,
                points_possible: Some(100.0),
                assignment_type: None,
            })
            .await
            .unwrap();

        assert_eq!(result.assignment_type, AssignmentType::Assignment);
    }

    #[tokio::test]
    async fn test_create_rejects_empty_title() {
        let service = AssignmentService::new(
            AssignmentRepository::new(empty_db()),
            CourseRepository::new(empty_db()),
        );

        let result = service
            .create(CreateAssignmentInput {
                course_id: "course1".to_string(),
                title: String::new(),
                description: None,
                due_date: None,
                points_possible: None,
                assignment_type: None,
            })
            .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_add_material() {
        let assignment = create_test_assignment("asg1", "course1");
        let material = assignment_material::Model {
            id: "mat1".to_string(),
            assignment_id: "asg1".to_string(),
            file_name: "syllabus.pdf".to_string(),
            file_type: Some("application/pdf".to_string()),
            file_url: "/files/syllabus.pdf".to_string(),
            created_at: Utc::now().into(),
        };

        let assignment_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[assignment]])
                .append_query_results([[material.clone()]])
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .into_connection(),
        );

        let service = AssignmentService::new(
            AssignmentRepository::new(assignment_db),
            CourseRepository::new(empty_db()),
        );

        let result = service
            .add_material(
                "asg1",
                AddMaterialInput {
                    file_name: "syllabus.pdf".to_string(),
                    file_type: Some("application/pdf".to_string()),
                    file_url: "/files/syllabus.pdf".to_string(),
                },
            )
            .await
            .unwrap();

        assert_eq!(result.assignment_id, "asg1");
    }
}
