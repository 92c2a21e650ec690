use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::database::models::macros::string_enum;
use crate::database::models::staff::StaffRole;

/// An unassigned work slot posted by an administrator, visible to eligible
/// staff in the marketplace until it is assigned or deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailableShift {
    pub id: String,
    pub shift_date: NaiveDate,
    pub start_time: String,
    pub end_time: String,
    pub duration_minutes: i64,
    pub service_type: String,
    pub location: String,
    pub required_role: Option<StaffRole>,
    pub required_skills: Vec<String>,
    pub participant_id: Option<String>,
    pub is_assigned: bool,
    pub assigned_to: Option<String>,
    pub notes: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Raw row shape; required skills are stored as a JSON array.
#[derive(Debug, sqlx::FromRow)]
pub struct AvailableShiftRow {
    pub id: String,
    pub shift_date: NaiveDate,
    pub start_time: String,
    pub end_time: String,
    pub duration_minutes: i64,
    pub service_type: String,
    pub location: String,
    pub required_role: Option<StaffRole>,
    pub required_skills: Option<String>,
    pub participant_id: Option<String>,
    pub is_assigned: bool,
    pub assigned_to: Option<String>,
    pub notes: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<AvailableShiftRow> for AvailableShift {
    fn from(row: AvailableShiftRow) -> Self {
        Self {
            id: row.id,
            shift_date: row.shift_date,
            start_time: row.start_time,
            end_time: row.end_time,
            duration_minutes: row.duration_minutes,
            service_type: row.service_type,
            location: row.location,
            required_role: row.required_role,
            required_skills: row
                .required_skills
                .as_deref()
                .and_then(|s| serde_json::from_str(s).ok())
                .unwrap_or_default(),
            participant_id: row.participant_id,
            is_assigned: row.is_assigned,
            assigned_to: row.assigned_to,
            notes: row.notes,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Marketplace listing entry: an open shift annotated with whether the
/// calling staff member has already requested it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenShift {
    #[serde(flatten)]
    pub shift: AvailableShift,
    pub has_requested: bool,
}

/// Admin input for creating or updating an open shift. Field presence is
/// validated in the handler so missing fields surface as 400s with a
/// readable message rather than a deserialization error.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailableShiftInput {
    pub shift_date: Option<NaiveDate>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub service_type: Option<String>,
    pub location: Option<String>,
    pub required_role: Option<StaffRole>,
    pub required_skills: Option<Vec<String>>,
    pub participant_id: Option<String>,
    pub notes: Option<String>,
}

/// Fully validated shift, ready to persist.
#[derive(Debug, Clone)]
pub struct NewAvailableShift {
    pub shift_date: NaiveDate,
    pub start_time: String,
    pub end_time: String,
    pub duration_minutes: i64,
    pub service_type: String,
    pub location: String,
    pub required_role: Option<StaffRole>,
    pub required_skills: Vec<String>,
    pub participant_id: Option<String>,
    pub notes: Option<String>,
}

string_enum! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "SCREAMING_SNAKE_CASE")]
    pub enum RequestStatus {
        Pending => "pending",
        Approved => "approved",
        Rejected => "rejected",
    }
}

/// A staff member's bid for an open shift. Reviewed exactly once.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ShiftRequest {
    pub id: String,
    pub staff_id: String,
    pub shift_id: String,
    pub message: Option<String>,
    pub status: RequestStatus,
    pub rejection_notes: Option<String>,
    pub reviewed_at: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShiftRequestInput {
    pub shift_id: String,
    pub message: Option<String>,
}

/// Admin review listing row: a pending request joined with the requester
/// and the shift it targets.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct PendingShiftRequest {
    pub id: String,
    pub staff_id: String,
    pub staff_name: String,
    pub staff_role: StaffRole,
    pub shift_id: String,
    pub shift_date: NaiveDate,
    pub start_time: String,
    pub end_time: String,
    pub service_type: String,
    pub location: String,
    pub message: Option<String>,
    pub created_at: NaiveDateTime,
}

string_enum! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "SCREAMING_SNAKE_CASE")]
    pub enum StaffShiftStatus {
        Scheduled => "scheduled",
        Completed => "completed",
        Cancelled => "cancelled",
    }
}

/// The materialized, assigned work slot created when a request is approved.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct StaffShift {
    pub id: String,
    pub staff_id: String,
    pub shift_date: NaiveDate,
    pub start_time: String,
    pub end_time: String,
    pub status: StaffShiftStatus,
    pub created_at: NaiveDateTime,
}
