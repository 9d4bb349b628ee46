use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use scolara_db::models::{
    Notification, NotificationPriority, NotificationType, TargetAudience,
};
use scolara_services::dao::base::{PaginatedResult, PaginationParams};
use scolara_services::reporting::AudienceSpec;
use scolara_services::reporting::recipients;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{
    error::ApiError, extractors::auth::AuthUser, routes::parse_id, state::AppState,
};

#[derive(Debug, Deserialize, Validate)]
pub struct CreateNotificationRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(length(min = 1))]
    pub body: String,
    pub notification_type: NotificationType,
    pub priority: Option<NotificationPriority>,
    pub target_audience: TargetAudience,
    pub target_grade_id: Option<String>,
    pub target_class_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct NotificationResponse {
    pub id: String,
    pub title: String,
    pub body: String,
    pub notification_type: NotificationType,
    pub priority: NotificationPriority,
    pub target_audience: TargetAudience,
    pub recipient_count: usize,
    pub created_at: String,
    /// This caller's read state, when listing their own feed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_read: Option<bool>,
}

fn to_response(notification: Notification, for_user: Option<bson::oid::ObjectId>) -> NotificationResponse {
    let is_read = for_user.and_then(|uid| {
        notification
            .recipients
            .iter()
            .find(|r| r.user_id == uid)
            .map(|r| r.is_read)
    });

    NotificationResponse {
        id: notification.id.map(|id| id.to_hex()).unwrap_or_default(),
        title: notification.title,
        body: notification.body,
        notification_type: notification.notification_type,
        priority: notification.priority,
        target_audience: notification.target_audience,
        recipient_count: notification.recipients.len(),
        created_at: notification
            .created_at
            .try_to_rfc3339_string()
            .unwrap_or_default(),
        is_read,
    }
}

/// Resolve the audience to a concrete recipient snapshot, then persist the
/// notification with it.
pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(body): Json<CreateNotificationRequest>,
) -> Result<(StatusCode, Json<NotificationResponse>), ApiError> {
    auth.require_staff()?;
    body.validate()?;

    let target_grade_id = body
        .target_grade_id
        .as_deref()
        .map(|v| parse_id("target_grade_id", v))
        .transpose()?;
    let target_class_id = body
        .target_class_id
        .as_deref()
        .map(|v| parse_id("target_class_id", v))
        .transpose()?;

    let spec = AudienceSpec {
        audience: body.target_audience,
        grade_id: target_grade_id,
        class_id: target_class_id,
    };
    let recipient_list = recipients::resolve(
        &spec,
        auth.user_id,
        &state.students,
        &state.teachers,
        &state.users,
    )
    .await?;

    let notification = state
        .notifications
        .create(
            body.title,
            body.body,
            body.notification_type,
            body.priority.unwrap_or_default(),
            body.target_audience,
            target_grade_id,
            target_class_id,
            auth.user_id,
            recipient_list,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(to_response(notification, None))))
}

pub async fn list_mine(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<PaginationParams>,
) -> Result<Json<PaginatedResult<NotificationResponse>>, ApiError> {
    let page = state.notifications.find_for_user(auth.user_id, &params).await?;

    Ok(Json(PaginatedResult {
        items: page
            .items
            .into_iter()
            .map(|n| to_response(n, Some(auth.user_id)))
            .collect(),
        total: page.total,
        page: page.page,
        per_page: page.per_page,
        total_pages: page.total_pages,
    }))
}

pub async fn unread_count(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<serde_json::Value>, ApiError> {
    let count = state.notifications.unread_count(auth.user_id).await?;
    Ok(Json(serde_json::json!({ "unread": count })))
}

pub async fn mark_read(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let nid = parse_id("notification_id", &id)?;
    let marked = state.notifications.mark_read(nid, auth.user_id).await?;
    if !marked {
        return Err(ApiError::NotFound("Resource not found".to_string()));
    }
    Ok(Json(serde_json::json!({ "read": true })))
}
