//! Assignment repository.
//!
//! Also owns the assignment-material sub-resource.

use std::sync::Arc;

use crate::entities::{Assignment, AssignmentMaterial, assignment, assignment_material};
use classroom_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, QueryFilter,
    QueryOrder,
};

use super::map_update_err;

/// Assignment repository for database operations.
#[derive(Clone)]
pub struct AssignmentRepository {
    db: Arc<DatabaseConnection>,
}

impl AssignmentRepository {
    /// Create a new assignment repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find an assignment by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<assignment::Model>> {
        Assignment::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find an assignment by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<assignment::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Assignment {id} not found")))
    }

    /// Create a new assignment.
    pub async fn create(&self, model: assignment::ActiveModel) -> AppResult<assignment::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update an assignment.
    pub async fn update(&self, model: assignment::ActiveModel) -> AppResult<assignment::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| map_update_err(e, "assignment"))
    }

    /// Delete an assignment. Submissions and materials cascade.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        let assignment = self.get_by_id(id).await?;
        assignment
            .delete(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// List all assignments, newest first.
    pub async fn find_all(&self) -> AppResult<Vec<assignment::Model>> {
        Assignment::find()
            .order_by_desc(assignment::Column::CreatedAt)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List assignments of a course, soonest due first.
    pub async fn find_by_course(&self, course_id: &str) -> AppResult<Vec<assignment::Model>> {
        Assignment::find()
            .filter(assignment::Column::CourseId.eq(course_id))
            .order_by_asc(assignment::Column::DueDate)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Attach a material to an assignment.
    pub async fn add_material(
        &self,
        model: assignment_material::ActiveModel,
    ) -> AppResult<assignment_material::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a material by ID.
    pub async fn find_material_by_id(
        &self,
        id: &str,
    ) -> AppResult<Option<assignment_material::Model>> {
        AssignmentMaterial::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List materials of an assignment.
    pub async fn find_materials(
        &self,
        assignment_id: &str,
    ) -> AppResult<Vec<assignment_material::Model>> {
        AssignmentMaterial::find()
            .filter(assignment_material::Column::AssignmentId.eq(assignment_id))
            .order_by_asc(assignment_material::Column::CreatedAt)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
