//! Announcement repository.

use std::sync::Arc;

use crate::entities::{Announcement, announcement};
use classroom_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, QueryFilter,
    QueryOrder,
};

use super::map_update_err;

/// Announcement repository for database operations.
#[derive(Clone)]
pub struct AnnouncementRepository {
    db: Arc<DatabaseConnection>,
}

impl AnnouncementRepository {
    /// Create a new announcement repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find an announcement by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<announcement::Model>> {
        Announcement::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find an announcement by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<announcement::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Announcement {id} not found")))
    }

    /// Create a new announcement.
    pub async fn create(&self, model: announcement::ActiveModel) -> AppResult<announcement::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update an announcement.
    pub async fn update(&self, model: announcement::ActiveModel) -> AppResult<announcement::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| map_update_err(e, "announcement"))
    }

    /// Delete an announcement.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        let announcement = self.get_by_id(id).await?;
        announcement
            .delete(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// List all announcements, newest first.
    pub async fn find_all(&self) -> AppResult<Vec<announcement::Model>> {
        Announcement::find()
            .order_by_desc(announcement::Column::CreatedAt)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List announcements of a course, newest first.
    pub async fn find_by_course(&self, course_id: &str) -> AppResult<Vec<announcement::Model>> {
        Announcement::find()
            .filter(announcement::Column::CourseId.eq(course_id))
            .order_by_desc(announcement::Column::CreatedAt)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List announcements posted by a teacher, newest first.
    pub async fn find_by_teacher(&self, teacher_id: &str) -> AppResult<Vec<announcement::Model>> {
        Announcement::find()
            .filter(announcement::Column::TeacherId.eq(teacher_id))
            .order_by_desc(announcement::Column::CreatedAt)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
