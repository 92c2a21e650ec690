use actix_web::{web, HttpResponse};
use chrono::{Datelike, Duration, Months, Utc};
use futures::try_join;
use serde::Deserialize;

use crate::database::models::{
    NewTimesheetEntry, TimesheetEntryInput, TimesheetListResponse, TimesheetStatus,
    TimesheetSummary,
};
use crate::database::repositories::{StaffRepository, TimesheetRepository};
use crate::database::utils::timesheet_total_hours;
use crate::error::AppError;
use crate::handlers::shared::{require_staff_profile, ApiResponse};
use crate::services::{Claims, Notifier};

#[derive(Debug, Deserialize)]
pub struct AdminTimesheetsQuery {
    pub status: Option<TimesheetStatus>,
}

#[derive(Debug, Deserialize)]
pub struct ReviewInput {
    pub notes: Option<String>,
}

fn validate_entry_input(
    staff_id: &str,
    input: TimesheetEntryInput,
) -> Result<NewTimesheetEntry, AppError> {
    let work_date = input
        .work_date
        .ok_or_else(|| AppError::BadRequest("Missing required field: workDate".to_string()))?;
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

    if input.break_minutes < 0 {
        return Err(AppError::BadRequest(
            "Break minutes cannot be negative".to_string(),
        ));
    }

    let total_hours = timesheet_total_hours(&start_time, &end_time, input.break_minutes)
        .map_err(AppError::BadRequest)?;

    Ok(NewTimesheetEntry {
        staff_id: staff_id.to_string(),
        participant_id: input.participant_id,
        work_date,
        start_time,
        end_time,
        break_minutes: input.break_minutes,
        total_hours,
        service_type,
        location,
        description: input.description,
        submit: input.submit,
    })
}

// Staff endpoints

pub async fn create_timesheet(
    claims: Claims,
    staff_repo: web::Data<StaffRepository>,
    timesheet_repo: web::Data<TimesheetRepository>,
    input: web::Json<TimesheetEntryInput>,
) -> Result<HttpResponse, AppError> {
    let staff = require_staff_profile(&claims, &staff_repo).await?;
    if !staff.is_active {
        return Err(AppError::Forbidden("Staff profile is inactive".to_string()));
    }

    let new_entry = validate_entry_input(&staff.id, input.into_inner())?;
    let entry = timesheet_repo.create_entry(new_entry).await?;

    Ok(HttpResponse::Created().json(ApiResponse::success(entry)))
}

pub async fn get_my_timesheets(
    claims: Claims,
    staff_repo: web::Data<StaffRepository>,
    timesheet_repo: web::Data<TimesheetRepository>,
) -> Result<HttpResponse, AppError> {
    let staff = require_staff_profile(&claims, &staff_repo).await?;

    let today = Utc::now().date_naive();
    let week_start = today - Duration::days(i64::from(today.weekday().num_days_from_monday()));
    let month_start = today.with_day(1).unwrap_or(today);
    // Both windows span their full period, so an entry dated later this
    // month counts the same way one dated later this week does.
    let month_end = month_start
        .checked_add_months(Months::new(1))
        .and_then(|next| next.pred_opt())
        .unwrap_or(today);

    let (entries, week_hours, month_hours, pending_count, approved_count) = try_join!(
        timesheet_repo.list_by_staff(&staff.id),
        timesheet_repo.hours_between(&staff.id, week_start, week_start + Duration::days(6)),
        timesheet_repo.hours_between(&staff.id, month_start, month_end),
        timesheet_repo.count_by_status(&staff.id, TimesheetStatus::Submitted),
        timesheet_repo.count_by_status(&staff.id, TimesheetStatus::Approved),
    )?;

    let response = TimesheetListResponse {
        entries,
        summary: TimesheetSummary {
            week_hours,
            month_hours,
            pending_count,
            approved_count,
        },
    };

    Ok(HttpResponse::Ok().json(ApiResponse::success(response)))
}

pub async fn submit_timesheet(
    claims: Claims,
    path: web::Path<String>,
    staff_repo: web::Data<StaffRepository>,
    timesheet_repo: web::Data<TimesheetRepository>,
) -> Result<HttpResponse, AppError> {
    let staff = require_staff_profile(&claims, &staff_repo).await?;
    if !staff.is_active {
        return Err(AppError::Forbidden("Staff profile is inactive".to_string()));
    }

    let entry_id = path.into_inner();
    let entry = timesheet_repo
        .submit_entry(&entry_id, &staff.id)
        .await?
        .ok_or_else(|| AppError::BadRequest("Only draft entries can be submitted".to_string()))?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(entry)))
}

// Admin endpoints

pub async fn get_timesheets_for_review(
    claims: Claims,
    query: web::Query<AdminTimesheetsQuery>,
    timesheet_repo: web::Data<TimesheetRepository>,
) -> Result<HttpResponse, AppError> {
    claims.require_admin()?;

    let status = query.status.unwrap_or(TimesheetStatus::Submitted);
    let entries = timesheet_repo.list_by_status(status).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(entries)))
}

pub async fn approve_timesheet(
    claims: Claims,
    path: web::Path<String>,
    timesheet_repo: web::Data<TimesheetRepository>,
    notifier: web::Data<Notifier>,
) -> Result<HttpResponse, AppError> {
    claims.require_admin()?;

    let entry_id = path.into_inner();
    let entry = timesheet_repo.approve_entry(&entry_id).await?;
    let entry = match entry {
        Some(entry) => entry,
        None => {
            return Err(match timesheet_repo.find_by_id(&entry_id).await? {
                Some(_) => {
                    AppError::BadRequest("Only submitted entries can be reviewed".to_string())
                }
                None => AppError::NotFound("Timesheet entry not found".to_string()),
            })
        }
    };

    if let Some(user_id) = timesheet_repo.owner_user_id(&entry.id).await? {
        notifier.timesheet_reviewed(&user_id, &entry, true).await;
    }

    Ok(HttpResponse::Ok().json(ApiResponse::success(entry)))
}

pub async fn reject_timesheet(
    claims: Claims,
    path: web::Path<String>,
    input: web::Json<ReviewInput>,
    timesheet_repo: web::Data<TimesheetRepository>,
    notifier: web::Data<Notifier>,
) -> Result<HttpResponse, AppError> {
    claims.require_admin()?;

    let entry_id = path.into_inner();
    let entry = timesheet_repo
        .reject_entry(&entry_id, input.into_inner().notes)
        .await?;
    let entry = match entry {
        Some(entry) => entry,
        None => {
            return Err(match timesheet_repo.find_by_id(&entry_id).await? {
                Some(_) => {
                    AppError::BadRequest("Only submitted entries can be reviewed".to_string())
                }
                None => AppError::NotFound("Timesheet entry not found".to_string()),
            })
        }
    };

    if let Some(user_id) = timesheet_repo.owner_user_id(&entry.id).await? {
        notifier.timesheet_reviewed(&user_id, &entry, false).await;
    }

    Ok(HttpResponse::Ok().json(ApiResponse::success(entry)))
}
