use actix_web::{web, HttpResponse};

use crate::database::models::{StaffInput, StaffUpdateInput};
use crate::database::repositories::{StaffRepository, StaffShiftRepository, UserRepository};
use crate::error::AppError;
use crate::handlers::shared::{require_staff_profile, ApiResponse};
use crate::services::Claims;

// Admin: staff profile management

pub async fn create_staff(
    claims: Claims,
    user_repo: web::Data<UserRepository>,
    staff_repo: web::Data<StaffRepository>,
    input: web::Json<StaffInput>,
) -> Result<HttpResponse, AppError> {
    claims.require_admin()?;

    let input = input.into_inner();

    if user_repo.find_by_id(&input.user_id).await?.is_none() {
        return Err(AppError::BadRequest(
            "No user account with that id".to_string(),
        ));
    }
    if staff_repo.find_by_user_id(&input.user_id).await?.is_some() {
        return Err(AppError::BadRequest(
            "User already has a staff profile".to_string(),
        ));
    }

    let staff = staff_repo.create_staff(input).await?;
    Ok(HttpResponse::Created().json(ApiResponse::success(staff)))
}

pub async fn get_staff(
    claims: Claims,
    staff_repo: web::Data<StaffRepository>,
) -> Result<HttpResponse, AppError> {
    claims.require_admin()?;

    let staff = staff_repo.list_all().await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(staff)))
}

pub async fn update_staff(
    claims: Claims,
    path: web::Path<String>,
    staff_repo: web::Data<StaffRepository>,
    input: web::Json<StaffUpdateInput>,
) -> Result<HttpResponse, AppError> {
    claims.require_admin()?;

    let staff = staff_repo
        .update_staff(&path.into_inner(), input.into_inner())
        .await?
        .ok_or_else(|| AppError::NotFound("Staff profile not found".to_string()))?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(staff)))
}

// Staff: own schedule of assigned shifts

pub async fn get_my_schedule(
    claims: Claims,
    staff_repo: web::Data<StaffRepository>,
    staff_shift_repo: web::Data<StaffShiftRepository>,
) -> Result<HttpResponse, AppError> {
    let staff = require_staff_profile(&claims, &staff_repo).await?;

    let shifts = staff_shift_repo.list_by_staff(&staff.id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(shifts)))
}
