use actix_web::{web, HttpResponse};
use futures::try_join;

use crate::database::models::NotificationListResponse;
use crate::database::repositories::NotificationRepository;
use crate::error::AppError;
use crate::handlers::shared::ApiResponse;
use crate::services::Claims;

pub async fn get_notifications(
    claims: Claims,
    notification_repo: web::Data<NotificationRepository>,
) -> Result<HttpResponse, AppError> {
    let (notifications, unread_count) = try_join!(
        notification_repo.list_recent(claims.user_id()),
        notification_repo.unread_count(claims.user_id()),
    )?;

    Ok(
        HttpResponse::Ok().json(ApiResponse::success(NotificationListResponse {
            notifications,
            unread_count,
        })),
    )
}

pub async fn mark_notification_read(
    claims: Claims,
    path: web::Path<String>,
    notification_repo: web::Data<NotificationRepository>,
) -> Result<HttpResponse, AppError> {
    let notification = notification_repo
        .mark_read(&path.into_inner(), claims.user_id())
        .await?
        .ok_or_else(|| AppError::NotFound("Notification not found".to_string()))?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(notification)))
}

pub async fn mark_all_notifications_read(
    claims: Claims,
    notification_repo: web::Data<NotificationRepository>,
) -> Result<HttpResponse, AppError> {
    let updated = notification_repo.mark_all_read(claims.user_id()).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(serde_json::json!({ "updated": updated }))))
}
