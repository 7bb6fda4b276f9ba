use crate::{auth::auth::AuthUser, error::ApiError, store::LeaveStore};
use actix_web::{HttpResponse, web};
use serde::Serialize;
use tracing::{debug, info};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Serialize, ToSchema)]
pub struct MessageResponse {
    #[schema(example = "Notification marked as read")]
    pub message: String,
}

/// Unread leave notifications for managers, oldest first
#[utoipa::path(
    get,
    path = "/api/notifications",
    responses(
        (status = 200, description = "Unread notifications", body = [Notification]),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Notification"
)]
pub async fn list_notifications(
    auth: AuthUser,
    store: web::Data<dyn LeaveStore>,
) -> Result<HttpResponse, ApiError> {
    auth.require_hr_or_admin()?;

    let unread = store.unread_notifications().await?;
    debug!(count = unread.len(), "Unread notifications fetched");

    Ok(HttpResponse::Ok().json(unread))
}

/// Mark a notification as read
#[utoipa::path(
    put,
    path = "/api/notifications/{notification_id}/read",
    params(
        ("notification_id" = String, Path, description = "Notification ID (UUID)")
    ),
    responses(
        (status = 200, description = "Notification marked as read", body = MessageResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Notification not found", body = Object, example = json!({
            "message": "Notification not found"
        }))
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Notification"
)]
pub async fn mark_notification_read(
    auth: AuthUser,
    store: web::Data<dyn LeaveStore>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    auth.require_hr_or_admin()?;

    let notification_id = path.into_inner();
    store.mark_notification_read(notification_id).await?;
    info!(%notification_id, user_id = auth.user_id, "Notification marked as read");

    Ok(HttpResponse::Ok().json(MessageResponse {
        message: "Notification marked as read".to_string(),
    }))
}
