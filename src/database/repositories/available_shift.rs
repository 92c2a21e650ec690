use anyhow::Result;
use chrono::{NaiveDate, NaiveDateTime, Utc};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::database::models::{
    AvailableShift, AvailableShiftRow, NewAvailableShift, OpenShift, StaffRole,
};

const SHIFT_COLUMNS: &str = "id, shift_date, start_time, end_time, duration_minutes, \
     service_type, location, required_role, required_skills, participant_id, \
     is_assigned, assigned_to, notes, created_at, updated_at";

/// Marketplace listing row with the caller-specific annotation.
#[derive(Debug, sqlx::FromRow)]
struct OpenShiftRow {
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
    pub has_requested: bool,
}

impl From<OpenShiftRow> for OpenShift {
    fn from(row: OpenShiftRow) -> Self {
        let has_requested = row.has_requested;
        let shift = AvailableShiftRow {
            id: row.id,
            shift_date: row.shift_date,
            start_time: row.start_time,
            end_time: row.end_time,
            duration_minutes: row.duration_minutes,
            service_type: row.service_type,
            location: row.location,
            required_role: row.required_role,
            required_skills: row.required_skills,
            participant_id: row.participant_id,
            is_assigned: row.is_assigned,
            assigned_to: row.assigned_to,
            notes: row.notes,
            created_at: row.created_at,
            updated_at: row.updated_at,
        };
        OpenShift {
            shift: shift.into(),
            has_requested,
        }
    }
}

#[derive(Clone)]
pub struct AvailableShiftRepository {
    pool: SqlitePool,
}

impl AvailableShiftRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create_shift(&self, input: NewAvailableShift) -> Result<AvailableShift> {
        let now = Utc::now().naive_utc();
        let id = Uuid::new_v4().to_string();
        let skills = serde_json::to_string(&input.required_skills)?;

        sqlx::query(
            r#"
            INSERT INTO available_shifts
                (id, shift_date, start_time, end_time, duration_minutes, service_type,
                 location, required_role, required_skills, participant_id,
                 is_assigned, assigned_to, notes, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, 0, NULL, $11, $12, $13)
            "#,
        )
        .bind(&id)
        .bind(input.shift_date)
        .bind(&input.start_time)
        .bind(&input.end_time)
        .bind(input.duration_minutes)
        .bind(&input.service_type)
        .bind(&input.location)
        .bind(input.required_role.map(|r| r.to_string()))
        .bind(&skills)
        .bind(&input.participant_id)
        .bind(&input.notes)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await?;

        self.find_by_id(&id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("Shift row vanished after insert"))
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<AvailableShift>> {
        let row = sqlx::query_as::<_, AvailableShiftRow>(&format!(
            "SELECT {} FROM available_shifts WHERE id = $1",
            SHIFT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(AvailableShift::from))
    }

    pub async fn list_all(&self) -> Result<Vec<AvailableShift>> {
        let rows = sqlx::query_as::<_, AvailableShiftRow>(&format!(
            "SELECT {} FROM available_shifts ORDER BY shift_date, start_time",
            SHIFT_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(AvailableShift::from).collect())
    }

    /// Open shifts a staff member is eligible for, within the 30-day window
    /// starting at `from`. Each row is annotated with whether the caller has
    /// already requested it (LEFT JOIN, not a second round-trip).
    pub async fn list_open_for_staff(
        &self,
        staff_id: &str,
        staff_role: StaffRole,
        from: NaiveDate,
        service_type: Option<&str>,
    ) -> Result<Vec<OpenShift>> {
        let until = from + chrono::Duration::days(30);

        let rows = sqlx::query_as::<_, OpenShiftRow>(
            r#"
            SELECT s.id, s.shift_date, s.start_time, s.end_time, s.duration_minutes,
                   s.service_type, s.location, s.required_role, s.required_skills,
                   s.participant_id, s.is_assigned, s.assigned_to, s.notes,
                   s.created_at, s.updated_at,
                   r.id IS NOT NULL AS has_requested
            FROM available_shifts s
            LEFT JOIN shift_requests r ON r.shift_id = s.id AND r.staff_id = $1
            WHERE s.is_assigned = 0
              AND s.shift_date >= $2
              AND s.shift_date <= $3
              AND (s.required_role IS NULL OR s.required_role = $4)
              AND ($5 IS NULL OR s.service_type = $5)
            ORDER BY s.shift_date, s.start_time
            "#,
        )
        .bind(staff_id)
        .bind(from)
        .bind(until)
        .bind(staff_role.to_string())
        .bind(service_type)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(OpenShift::from).collect())
    }

    pub async fn update_shift(
        &self,
        id: &str,
        input: NewAvailableShift,
    ) -> Result<Option<AvailableShift>> {
        let skills = serde_json::to_string(&input.required_skills)?;

        let result = sqlx::query(
            r#"
            UPDATE available_shifts
            SET shift_date = $1, start_time = $2, end_time = $3, duration_minutes = $4,
                service_type = $5, location = $6, required_role = $7, required_skills = $8,
                participant_id = $9, notes = $10, updated_at = $11
            WHERE id = $12
            "#,
        )
        .bind(input.shift_date)
        .bind(&input.start_time)
        .bind(&input.end_time)
        .bind(input.duration_minutes)
        .bind(&input.service_type)
        .bind(&input.location)
        .bind(input.required_role.map(|r| r.to_string()))
        .bind(&skills)
        .bind(&input.participant_id)
        .bind(&input.notes)
        .bind(Utc::now().naive_utc())
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        self.find_by_id(id).await
    }

    pub async fn delete_shift(&self, id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM available_shifts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
