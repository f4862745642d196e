//! Notification service.

use classroom_common::{AppError, AppResult, IdGenerator};
use classroom_db::{
    entities::{notification, notification::NotificationType},
    repositories::{NotificationRepository, UserRepository},
};
use sea_orm::Set;
use serde::Deserialize;
use validator::Validate;

/// Notification service for business logic.
#[derive(Clone)]
pub struct NotificationService {
    notification_repo: NotificationRepository,
    user_repo: UserRepository,
    id_gen: IdGenerator,
}

/// Input for creating a notification directly.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateNotificationInput {
    pub user_id: String,

    #[validate(length(min = 1, max = 256))]
    pub title: String,

    #[validate(length(min = 1, max = 4096))]
    pub message: String,

    pub notification_type: NotificationType,

    pub reference_id: Option<String>,
}

impl NotificationService {
    /// Create a new notification service.
    #[must_use]
    pub fn new(notification_repo: NotificationRepository, user_repo: UserRepository) -> Self {
        Self {
            notification_repo,
            user_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Create a notification for a user.
    ///
    /// An unknown recipient is rejected as "Invalid user ID". The
    /// notification always starts unread.
    pub async fn create(&self, input: CreateNotificationInput) -> AppResult<notification::Model> {
        input.validate()?;

        let user = self
            .user_repo
            .find_by_id(&input.user_id)
            .await?
            .ok_or_else(|| AppError::BadRequest("Invalid user ID".to_string()))?;

        let model = notification::ActiveModel {
            id: Set(self.id_gen.generate()),
            user_id: Set(user.id),
            title: Set(input.title),
            message: Set(input.message),
            notification_type: Set(input.notification_type),
            reference_id: Set(input.reference_id),
            is_read: Set(false),
            created_at: Set(chrono::Utc::now().into()),
        };

        self.notification_repo.create(model).await
    }

    /// Get a notification by ID.
    pub async fn get(&self, id: &str) -> AppResult<notification::Model> {
        self.notification_repo.get_by_id(id).await
    }

    /// List all notifications, newest first.
    pub async fn list(&self) -> AppResult<Vec<notification::Model>> {
        self.notification_repo.find_all().await
    }

    /// List a user's notifications, newest first.
    pub async fn list_for_user(&self, user_id: &str) -> AppResult<Vec<notification::Model>> {
        self.notification_repo.find_by_user(user_id).await
    }

    /// Count a user's unread notifications.
    pub async fn unread_count(&self, user_id: &str) -> AppResult<u64> {
        self.notification_repo.count_unread(user_id).await
    }

    /// Mark one notification as read. Unknown ids are not found.
    pub async fn mark_read(&self, id: &str) -> AppResult<()> {
        self.notification_repo.mark_as_read(id).await
    }

    /// Mark all of a user's notifications as read, returning how many
    /// flipped.
    pub async fn mark_all_read(&self, user_id: &str) -> AppResult<u64> {
        self.notification_repo.mark_all_as_read(user_id).await
    }

    /// Delete a notification. Unknown ids are not found.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        self.notification_repo.delete(id).await
    }
}
