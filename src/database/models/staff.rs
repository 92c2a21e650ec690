use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::database::models::macros::string_enum;

string_enum! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "SCREAMING_SNAKE_CASE")]
    pub enum StaffRole {
        SupportWorker => "support_worker",
        EnrolledNurse => "enrolled_nurse",
        RegisteredNurse => "registered_nurse",
        Coordinator => "coordinator",
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayAvailability {
    pub morning: bool,
    pub afternoon: bool,
}

/// Weekly availability grid, one morning/afternoon pair per day.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityMatrix {
    pub monday: DayAvailability,
    pub tuesday: DayAvailability,
    pub wednesday: DayAvailability,
    pub thursday: DayAvailability,
    pub friday: DayAvailability,
    pub saturday: DayAvailability,
    pub sunday: DayAvailability,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Staff {
    pub id: String,
    pub user_id: String,
    pub role: StaffRole,
    pub is_active: bool,
    pub certifications: Option<String>,
    pub availability: AvailabilityMatrix,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Raw row shape; availability is stored as a JSON blob.
#[derive(Debug, sqlx::FromRow)]
pub struct StaffRow {
    pub id: String,
    pub user_id: String,
    pub role: StaffRole,
    pub is_active: bool,
    pub certifications: Option<String>,
    pub availability: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<StaffRow> for Staff {
    fn from(row: StaffRow) -> Self {
        Self {
            id: row.id,
            user_id: row.user_id,
            role: row.role,
            is_active: row.is_active,
            certifications: row.certifications,
            availability: serde_json::from_str(&row.availability).unwrap_or_default(),
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaffInput {
    pub user_id: String,
    pub role: StaffRole,
    pub certifications: Option<String>,
    #[serde(default)]
    pub availability: AvailabilityMatrix,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaffUpdateInput {
    pub role: Option<StaffRole>,
    pub is_active: Option<bool>,
    pub certifications: Option<String>,
    pub availability: Option<AvailabilityMatrix>,
}
