//! Folder repository.

use std::sync::Arc;

use crate::entities::{Folder, folder};
use classroom_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, QueryFilter,
    QueryOrder,
};

use super::map_update_err;

/// Folder repository for database operations.
#[derive(Clone)]
pub struct FolderRepository {
    db: Arc<DatabaseConnection>,
}

impl FolderRepository {
    /// Create a new folder repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a folder by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<folder::Model>> {
        Folder::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a folder by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<folder::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Folder {id} not found")))
    }

    /// Create a new folder.
    pub async fn create(&self, model: folder::ActiveModel) -> AppResult<folder::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update a folder.
    pub async fn update(&self, model: folder::ActiveModel) -> AppResult<folder::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| map_update_err(e, "folder"))
    }

    /// Delete a folder. Children and filed courses follow the FK rules
    /// (cascade and set-null respectively).
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        let folder = self.get_by_id(id).await?;
        folder
            .delete(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// List folders owned by a user, alphabetical.
    pub async fn find_by_owner(&self, owner_id: &str) -> AppResult<Vec<folder::Model>> {
        Folder::find()
            .filter(folder::Column::OwnerId.eq(owner_id))
            .order_by_asc(folder::Column::Name)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List direct child folders of a folder.
    pub async fn find_children(&self, parent_id: &str) -> AppResult<Vec<folder::Model>> {
        Folder::find()
            .filter(folder::Column::ParentId.eq(parent_id))
            .order_by_asc(folder::Column::Name)
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
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn create_test_folder(id: &str, owner_id: &str, parent_id: Option<&str>) -> folder::Model {
        folder::Model {
            id: id.to_string(),
            name: "Semester 1".to_string(),
            owner_id: owner_id.to_string(),
            parent_id: parent_id.map(String::from),
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    #[tokio::test]
    async fn test_find_by_id_found() {
        let folder = create_test_folder("folder1", "user1", None);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[folder.clone()]])
                .into_connection(),
        );

        let repo = FolderRepository::new(db);
        let result = repo.find_by_id("folder1").await.unwrap();

        assert!(result.is_some());
        assert_eq!(result.unwrap().owner_id, "user1");
    }

    #[tokio::test]
    async fn test_get_by_id_not_found_returns_error() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<folder::Model>::new()])
                .into_connection(),
        );

        let repo = FolderRepository::new(db);
        let result = repo.get_by_id("nonexistent").await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_find_children() {
        let f1 = create_test_folder("folder2", "user1", Some("folder1"));
        let f2 = create_test_folder("folder3", "user1", Some("folder1"));

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[f1, f2]])
                .into_connection(),
        );

        let repo = FolderRepository::new(db);
        let result = repo.find_children("folder1").await.unwrap();

        assert_eq!(result.len(), 2);
        assert!(result.iter().all(|f| f.parent_id.as_deref() == Some("folder1")));
    }
}
