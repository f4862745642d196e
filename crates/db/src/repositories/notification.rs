//! Notification repository.

use std::sync::Arc;

use crate::entities::{Notification, notification};
use classroom_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, PaginatorTrait,
    QueryFilter, QueryOrder,
};

/// Notification repository for database operations.
#[derive(Clone)]
pub struct NotificationRepository {
    db: Arc<DatabaseConnection>,
}

impl NotificationRepository {
    /// Create a new notification repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a notification by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<notification::Model>> {
        Notification::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a notification by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<notification::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Notification {id} not found")))
    }

    /// Create a new notification.
    pub async fn create(&self, model: notification::ActiveModel) -> AppResult<notification::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Batch-insert notifications (announcement fan-out). The batch is a
    /// single statement, so it lands atomically or not at all.
    pub async fn insert_many(&self, models: Vec<notification::ActiveModel>) -> AppResult<u64> {
        if models.is_empty() {
            return Ok(0);
        }

        let count = models.len() as u64;
        Notification::insert_many(models)
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(count)
    }

    /// Delete a notification. Unknown ids are an error.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        let notification = self.get_by_id(id).await?;
        notification
            .delete(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Get notifications for a user, newest first.
    pub async fn find_by_user(&self, user_id: &str) -> AppResult<Vec<notification::Model>> {
        Notification::find()
            .filter(notification::Column::UserId.eq(user_id))
            .order_by_desc(notification::Column::CreatedAt)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List all notifications, newest first.
    pub async fn find_all(&self) -> AppResult<Vec<notification::Model>> {
        Notification::find()
            .order_by_desc(notification::Column::CreatedAt)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Mark a notification as read. Unknown ids are an error.
    pub async fn mark_as_read(&self, id: &str) -> AppResult<()> {
        let notification = self.get_by_id(id).await?;
        let mut active: notification::ActiveModel = notification.into();
        active.is_read = sea_orm::Set(true);
        active
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Mark all notifications as read for a user.
    pub async fn mark_all_as_read(&self, user_id: &str) -> AppResult<u64> {
        use sea_orm::UpdateResult;

        let result: UpdateResult = Notification::update_many()
            .filter(notification::Column::UserId.eq(user_id))
            .filter(notification::Column::IsRead.eq(false))
            .col_expr(notification::Column::IsRead, true.into())
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(result.rows_affected)
    }

    /// Count unread notifications for a user.
    pub async fn count_unread(&self, user_id: &str) -> AppResult<u64> {
        Notification::find()
            .filter(notification::Column::UserId.eq(user_id))
            .filter(notification::Column::IsRead.eq(false))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::entities::notification::NotificationType;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult, Set};

    fn create_test_notification(id: &str, user_id: &str) -> notification::Model {
        notification::Model {
            id: id.to_string(),
            user_id: user_id.to_string(),
            title: "New Announcement".to_string(),
            message: "A new announcement has been posted in Math 101: Exam moved".to_string(),
            notification_type: NotificationType::Announcement,
            reference_id: Some("ann1".to_string()),
            is_read: false,
            created_at: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_find_by_user() {
        let n1 = create_test_notification("not1", "student1");
        let n2 = create_test_notification("not2", "student1");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[n1, n2]])
                .into_connection(),
        );

        let repo = NotificationRepository::new(db);
        let result = repo.find_by_user("student1").await.unwrap();

        assert_eq!(result.len(), 2);
    }

    #[tokio::test]
    async fn test_insert_many() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 3,
                }])
                .into_connection(),
        );

        let repo = NotificationRepository::new(db);

        let models: Vec<notification::ActiveModel> = (1..=3)
            .map(|i| notification::ActiveModel {
                id: Set(format!("not{i}")),
                user_id: Set(format!("student{i}")),
                title: Set("New Announcement".to_string()),
                message: Set("A new announcement has been posted".to_string()),
                notification_type: Set(NotificationType::Announcement),
                reference_id: Set(Some("ann1".to_string())),
                is_read: Set(false),
                created_at: Set(Utc::now().into()),
            })
            .collect();

        let count = repo.insert_many(models).await.unwrap();
        assert_eq!(count, 3);
    }

    #[tokio::test]
    async fn test_insert_many_empty_is_noop() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres).into_connection(),
        );

        let repo = NotificationRepository::new(db);
        let count = repo.insert_many(vec![]).await.unwrap();

        assert_eq!(count, 0);
    }

    #[tokio::test]
    async fn test_count_unread() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[maplit::btreemap! {
                    "num_items" => sea_orm::Value::BigInt(Some(5)),
                }]])
                .into_connection(),
        );

        let repo = NotificationRepository::new(db);
        let result = repo.count_unread("student1").await.unwrap();

        assert_eq!(result, 5);
    }

    #[tokio::test]
    async fn test_mark_as_read_unknown_id_is_not_found() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<notification::Model>::new()])
                .into_connection(),
        );

        let repo = NotificationRepository::new(db);
        let result = repo.mark_as_read("nonexistent").await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_unknown_id_is_not_found() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<notification::Model>::new()])
                .into_connection(),
        );

        let repo = NotificationRepository::new(db);
        let result = repo.delete("nonexistent").await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_mark_as_read_flips_flag() {
        let notification = create_test_notification("not1", "student1");
        let mut updated = notification.clone();
        updated.is_read = true;

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[notification]])
                .append_query_results([[updated]])
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .into_connection(),
        );

        let repo = NotificationRepository::new(db);
        let result = repo.mark_as_read("not1").await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_mark_all_as_read() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 4,
                }])
                .into_connection(),
        );

        let repo = NotificationRepository::new(db);
        let result = repo.mark_all_as_read("student1").await.unwrap();

        assert_eq!(result, 4);
    }
}
