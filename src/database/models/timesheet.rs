use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::database::models::macros::string_enum;

string_enum! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "SCREAMING_SNAKE_CASE")]
    pub enum TimesheetStatus {
        Draft => "draft",
        Submitted => "submitted",
        Approved => "approved",
        Rejected => "rejected",
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct TimesheetEntry {
    pub id: String,
    pub staff_id: String,
    pub participant_id: Option<String>,
    pub work_date: NaiveDate,
    pub start_time: String,
    pub end_time: String,
    pub break_minutes: i64,
    pub total_hours: f64,
    pub service_type: String,
    pub location: String,
    pub description: Option<String>,
    pub status: TimesheetStatus,
    pub submitted_at: Option<NaiveDateTime>,
    pub approved_at: Option<NaiveDateTime>,
    pub rejected_at: Option<NaiveDateTime>,
    pub rejection_notes: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimesheetEntryInput {
    pub work_date: Option<NaiveDate>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    #[serde(default)]
    pub break_minutes: i64,
    pub service_type: Option<String>,
    pub location: Option<String>,
    pub description: Option<String>,
    pub participant_id: Option<String>,
    #[serde(default)]
    pub submit: bool,
}

/// Validated entry, total hours already computed.
#[derive(Debug, Clone)]
pub struct NewTimesheetEntry {
    pub staff_id: String,
    pub participant_id: Option<String>,
    pub work_date: NaiveDate,
    pub start_time: String,
    pub end_time: String,
    pub break_minutes: i64,
    pub total_hours: f64,
    pub service_type: String,
    pub location: String,
    pub description: Option<String>,
    pub submit: bool,
}

/// Derived aggregates shown alongside a staff member's entry list. Only
/// SUBMITTED and APPROVED entries count toward the hour totals.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimesheetSummary {
    pub week_hours: f64,
    pub month_hours: f64,
    pub pending_count: i64,
    pub approved_count: i64,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimesheetListResponse {
    pub entries: Vec<TimesheetEntry>,
    pub summary: TimesheetSummary,
}
