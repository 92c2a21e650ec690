use actix_web::{web, HttpResponse};

use crate::database::repositories::StatsRepository;
use crate::error::AppError;
use crate::handlers::shared::ApiResponse;
use crate::services::Claims;

pub async fn get_dashboard_stats(
    claims: Claims,
    stats_repo: web::Data<StatsRepository>,
) -> Result<HttpResponse, AppError> {
    claims.require_admin()?;

    let stats = stats_repo.dashboard_stats().await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(stats)))
}
