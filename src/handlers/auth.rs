use actix_web::{web, HttpResponse};

use crate::database::models::{LoginRequest, RegisterRequest, UserInfo};
use crate::database::repositories::UserRepository;
use crate::error::AppError;
use crate::handlers::shared::ApiResponse;
use crate::services::{AuthService, Claims};

pub async fn register(
    auth_service: web::Data<AuthService>,
    input: web::Json<RegisterRequest>,
) -> Result<HttpResponse, AppError> {
    let response = auth_service.register(input.into_inner()).await?;
    Ok(HttpResponse::Created().json(ApiResponse::success(response)))
}

pub async fn login(
    auth_service: web::Data<AuthService>,
    input: web::Json<LoginRequest>,
) -> Result<HttpResponse, AppError> {
    let response = auth_service.login(input.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(response)))
}

pub async fn me(
    claims: Claims,
    user_repo: web::Data<UserRepository>,
) -> Result<HttpResponse, AppError> {
    let user = user_repo
        .find_by_id(claims.user_id())
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(UserInfo::from(user))))
}
