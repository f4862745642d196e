//! Notification endpoints.

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, put},
};
use classroom_common::AppResult;
use classroom_core::CreateNotificationInput;
use classroom_db::entities::notification::{self, NotificationType};
use serde::{Deserialize, Serialize};

use crate::{
    middleware::AppState,
    response::{Created, no_content},
};

/// Notification response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationResponse {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub message: String,
    #[serde(rename = "type")]
    pub notification_type: NotificationType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference_id: Option<String>,
    pub is_read: bool,
    pub created_at: String,
}

impl From<notification::Model> for NotificationResponse {
    fn from(n: notification::Model) -> Self {
        Self {
            id: n.id,
            user_id: n.user_id,
            title: n.title,
            message: n.message,
            notification_type: n.notification_type,
            reference_id: n.reference_id,
            is_read: n.is_read,
            created_at: n.created_at.to_rfc3339(),
        }
    }
}

/// Create notification request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateNotificationRequest {
    pub user_id: String,
    pub title: String,
    pub message: String,
    #[serde(rename = "type")]
    pub notification_type: NotificationType,
    pub reference_id: Option<String>,
}

/// Unread count response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnreadCountResponse {
    pub count: u64,
}

/// Mark-all-as-read response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkAllAsReadResponse {
    pub count: u64,
}

/// List all notifications.
async fn list_notifications(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<NotificationResponse>>> {
    let notifications = state.notification_service.list().await?;
    Ok(Json(notifications.into_iter().map(Into::into).collect()))
}

/// Create a notification for a user.
async fn create_notification(
    State(state): State<AppState>,
    Json(req): Json<CreateNotificationRequest>,
) -> AppResult<Created<NotificationResponse>> {
    let notification = state
        .notification_service
        .create(CreateNotificationInput {
            user_id: req.user_id,
            title: req.title,
            message: req.message,
            notification_type: req.notification_type,
            reference_id: req.reference_id,
        })
        .await?;

    Ok(Created(notification.into()))
}

/// Get a notification by ID.
async fn get_notification(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<NotificationResponse>> {
    let notification = state.notification_service.get(&id).await?;
    Ok(Json(notification.into()))
}

/// A user's notifications, newest first.
async fn user_notifications(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> AppResult<Json<Vec<NotificationResponse>>> {
    let notifications = state.notification_service.list_for_user(&user_id).await?;
    Ok(Json(notifications.into_iter().map(Into::into).collect()))
}

/// A user's unread notification count.
async fn unread_count(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> AppResult<Json<UnreadCountResponse>> {
    let count = state.notification_service.unread_count(&user_id).await?;
    Ok(Json(UnreadCountResponse { count }))
}

/// Mark a notification as read.
async fn mark_as_read(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<impl axum::response::IntoResponse> {
    state.notification_service.mark_read(&id).await?;
    Ok(no_content())
}

/// Mark all of a user's notifications as read.
async fn mark_all_as_read(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> AppResult<Json<MarkAllAsReadResponse>> {
    let count = state.notification_service.mark_all_read(&user_id).await?;
    Ok(Json(MarkAllAsReadResponse { count }))
}

/// Delete a notification.
async fn delete_notification(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<impl axum::response::IntoResponse> {
    state.notification_service.delete(&id).await?;
    Ok(no_content())
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_notifications).post(create_notification))
        .route("/{id}", get(get_notification).delete(delete_notification))
        .route("/{id}/MarkAsRead", put(mark_as_read))
        .route("/User/{userId}", get(user_notifications))
        .route("/User/{userId}/UnreadCount", get(unread_count))
        .route("/User/{userId}/MarkAllAsRead", put(mark_all_as_read))
}
