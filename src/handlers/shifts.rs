use actix_web::{web, HttpResponse};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::database::models::{
    AvailableShift, AvailableShiftInput, NewAvailableShift, RequestStatus, ShiftRequest,
    ShiftRequestInput, StaffShift,
};
use crate::database::repositories::{
    shift_request::SIBLING_REJECTION_NOTE, AvailableShiftRepository, ReviewOutcome,
    ShiftRequestRepository, StaffRepository,
};
use crate::database::utils::shift_duration_minutes;
use crate::error::AppError;
use crate::handlers::shared::{require_staff_profile, ApiResponse};
use crate::services::{Claims, Notifier};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailableShiftsQuery {
    pub from: Option<NaiveDate>,
    pub service_type: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ShiftRequestsQuery {
    pub status: Option<RequestStatus>,
}

#[derive(Debug, Deserialize)]
pub struct ReviewInput {
    pub notes: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApprovalResponse {
    pub request: ShiftRequest,
    pub shift: AvailableShift,
    pub staff_shift: StaffShift,
}

/// Turn admin input into a persistable shift, rejecting missing fields and
/// unparseable times with a readable message.
fn validate_shift_input(input: AvailableShiftInput) -> Result<NewAvailableShift, AppError> {
    let shift_date = input
        .shift_date
        .ok_or_else(|| AppError::BadRequest("Missing required field: shiftDate".to_string()))?;
    let start_time = input
        .start_time
        .ok_or_else(|| AppError::BadRequest("Missing required field: startTime".to_string()))?;
    let end_time = input
        .end_time
        .ok_or_else(|| AppError::BadRequest("Missing required field: endTime".to_string()))?;
    let service_type = input
        .service_type
        .ok_or_else(|| AppError::BadRequest("Missing required field: serviceType".to_string()))?;
    let location = input
        .location
        .ok_or_else(|| AppError::BadRequest("Missing required field: location".to_string()))?;

    let duration_minutes =
        shift_duration_minutes(&start_time, &end_time).map_err(AppError::BadRequest)?;

    Ok(NewAvailableShift {
        shift_date,
        start_time,
        end_time,
        duration_minutes,
        service_type,
        location,
        required_role: input.required_role,
        required_skills: input.required_skills.unwrap_or_default(),
        participant_id: input.participant_id,
        notes: input.notes,
    })
}

// Admin: open-shift CRUD

pub async fn create_shift(
    claims: Claims,
    shift_repo: web::Data<AvailableShiftRepository>,
    staff_repo: web::Data<StaffRepository>,
    notifier: web::Data<Notifier>,
    input: web::Json<AvailableShiftInput>,
) -> Result<HttpResponse, AppError> {
    claims.require_admin()?;

    let new_shift = validate_shift_input(input.into_inner())?;
    let shift = shift_repo.create_shift(new_shift).await?;

    // Fan-out is best effort; a notification failure never undoes the shift.
    match staff_repo.list_active_by_role(shift.required_role).await {
        Ok(recipients) => notifier.shift_posted(&shift, &recipients).await,
        Err(e) => log::warn!("Failed to resolve fan-out recipients: {}", e),
    }

    Ok(HttpResponse::Created().json(ApiResponse::success(shift)))
}

pub async fn get_shifts(
    claims: Claims,
    shift_repo: web::Data<AvailableShiftRepository>,
) -> Result<HttpResponse, AppError> {
    claims.require_admin()?;

    let shifts = shift_repo.list_all().await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(shifts)))
}

pub async fn update_shift(
    claims: Claims,
    path: web::Path<String>,
    shift_repo: web::Data<AvailableShiftRepository>,
    input: web::Json<AvailableShiftInput>,
) -> Result<HttpResponse, AppError> {
    claims.require_admin()?;

    let shift_id = path.into_inner();
    let new_shift = validate_shift_input(input.into_inner())?;

    let shift = shift_repo
        .update_shift(&shift_id, new_shift)
        .await?
        .ok_or_else(|| AppError::NotFound("Shift not found".to_string()))?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(shift)))
}

pub async fn delete_shift(
    claims: Claims,
    path: web::Path<String>,
    shift_repo: web::Data<AvailableShiftRepository>,
) -> Result<HttpResponse, AppError> {
    claims.require_admin()?;

    let deleted = shift_repo.delete_shift(&path.into_inner()).await?;
    if !deleted {
        return Err(AppError::NotFound("Shift not found".to_string()));
    }

    Ok(HttpResponse::Ok().json(ApiResponse::success(serde_json::json!({ "deleted": true }))))
}

// Staff: marketplace

pub async fn get_available_shifts(
    claims: Claims,
    query: web::Query<AvailableShiftsQuery>,
    staff_repo: web::Data<StaffRepository>,
    shift_repo: web::Data<AvailableShiftRepository>,
) -> Result<HttpResponse, AppError> {
    let staff = require_staff_profile(&claims, &staff_repo).await?;

    let from = query.from.unwrap_or_else(|| Utc::now().date_naive());
    let shifts = shift_repo
        .list_open_for_staff(&staff.id, staff.role, from, query.service_type.as_deref())
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(shifts)))
}

pub async fn submit_shift_request(
    claims: Claims,
    staff_repo: web::Data<StaffRepository>,
    shift_repo: web::Data<AvailableShiftRepository>,
    request_repo: web::Data<ShiftRequestRepository>,
    input: web::Json<ShiftRequestInput>,
) -> Result<HttpResponse, AppError> {
    let staff = require_staff_profile(&claims, &staff_repo).await?;
    if !staff.is_active {
        return Err(AppError::Forbidden("Staff profile is inactive".to_string()));
    }

    let input = input.into_inner();

    // Preconditions in order, each with its own failure reason.
    let shift = shift_repo
        .find_by_id(&input.shift_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Shift not found".to_string()))?;

    if shift.is_assigned {
        return Err(AppError::BadRequest(
            "Shift is already assigned".to_string(),
        ));
    }

    if request_repo.exists_for(&staff.id, &shift.id).await? {
        return Err(AppError::BadRequest(
            "You have already requested this shift".to_string(),
        ));
    }

    if let Some(required_role) = shift.required_role {
        if required_role != staff.role {
            return Err(AppError::BadRequest(
                "This shift requires a different staff role".to_string(),
            ));
        }
    }

    let request = request_repo
        .create_request(&staff.id, &shift.id, input.message)
        .await?;

    Ok(HttpResponse::Created().json(ApiResponse::success(request)))
}

pub async fn get_my_shift_requests(
    claims: Claims,
    query: web::Query<ShiftRequestsQuery>,
    staff_repo: web::Data<StaffRepository>,
    request_repo: web::Data<ShiftRequestRepository>,
) -> Result<HttpResponse, AppError> {
    let staff = require_staff_profile(&claims, &staff_repo).await?;

    let requests = request_repo.list_by_staff(&staff.id, query.status).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(requests)))
}

// Admin: request review

pub async fn get_pending_requests(
    claims: Claims,
    request_repo: web::Data<ShiftRequestRepository>,
) -> Result<HttpResponse, AppError> {
    claims.require_admin()?;

    let requests = request_repo.list_pending().await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(requests)))
}

pub async fn approve_shift_request(
    claims: Claims,
    path: web::Path<String>,
    request_repo: web::Data<ShiftRequestRepository>,
    notifier: web::Data<Notifier>,
) -> Result<HttpResponse, AppError> {
    claims.require_admin()?;

    let request_id = path.into_inner();

    let outcome = match request_repo.approve_request(&request_id).await? {
        ReviewOutcome::Completed(outcome) => outcome,
        ReviewOutcome::NotFound => {
            return Err(AppError::NotFound("Shift request not found".to_string()))
        }
        ReviewOutcome::AlreadyReviewed => {
            return Err(AppError::BadRequest(
                "Request has already been reviewed".to_string(),
            ))
        }
        ReviewOutcome::ShiftUnavailable => {
            return Err(AppError::BadRequest(
                "Shift is already assigned".to_string(),
            ))
        }
    };

    notifier
        .shift_request_approved(&outcome.approved_user_id, &outcome.shift)
        .await;
    for sibling in &outcome.rejected_siblings {
        notifier
            .shift_request_rejected(&sibling.user_id, Some(SIBLING_REJECTION_NOTE))
            .await;
    }

    Ok(HttpResponse::Ok().json(ApiResponse::success(ApprovalResponse {
        request: outcome.request,
        shift: outcome.shift,
        staff_shift: outcome.staff_shift,
    })))
}

pub async fn reject_shift_request(
    claims: Claims,
    path: web::Path<String>,
    input: web::Json<ReviewInput>,
    request_repo: web::Data<ShiftRequestRepository>,
    notifier: web::Data<Notifier>,
) -> Result<HttpResponse, AppError> {
    claims.require_admin()?;

    let request_id = path.into_inner();
    let notes = input.into_inner().notes;

    let (request, user_id) = match request_repo.reject_request(&request_id, notes).await? {
        ReviewOutcome::Completed(result) => result,
        ReviewOutcome::NotFound => {
            return Err(AppError::NotFound("Shift request not found".to_string()))
        }
        _ => {
            return Err(AppError::BadRequest(
                "Request has already been reviewed".to_string(),
            ))
        }
    };

    notifier
        .shift_request_rejected(&user_id, request.rejection_notes.as_deref())
        .await;

    Ok(HttpResponse::Ok().json(ApiResponse::success(request)))
}
