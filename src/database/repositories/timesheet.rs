use anyhow::Result;
use chrono::{NaiveDate, Utc};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::database::models::{NewTimesheetEntry, TimesheetEntry, TimesheetStatus};

const ENTRY_COLUMNS: &str = "id, staff_id, participant_id, work_date, start_time, end_time, \
     break_minutes, total_hours, service_type, location, description, status, \
     submitted_at, approved_at, rejected_at, rejection_notes, created_at, updated_at";

/// Staff views return at most this many recent entries.
const LIST_LIMIT: i64 = 100;

#[derive(Clone)]
pub struct TimesheetRepository {
    pool: SqlitePool,
}

impl TimesheetRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create_entry(&self, input: NewTimesheetEntry) -> Result<TimesheetEntry> {
        let now = Utc::now().naive_utc();
        let id = Uuid::new_v4().to_string();
        let (status, submitted_at) = if input.submit {
            (TimesheetStatus::Submitted, Some(now))
        } else {
            (TimesheetStatus::Draft, None)
        };

        sqlx::query(
            r#"
            INSERT INTO timesheet_entries
                (id, staff_id, participant_id, work_date, start_time, end_time,
                 break_minutes, total_hours, service_type, location, description,
                 status, submitted_at, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
            "#,
        )
        .bind(&id)
        .bind(&input.staff_id)
        .bind(&input.participant_id)
        .bind(input.work_date)
        .bind(&input.start_time)
        .bind(&input.end_time)
        .bind(input.break_minutes)
        .bind(input.total_hours)
        .bind(&input.service_type)
        .bind(&input.location)
        .bind(&input.description)
        .bind(status.to_string())
        .bind(submitted_at)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await?;

        self.find_by_id(&id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("Timesheet row vanished after insert"))
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<TimesheetEntry>> {
        let entry = sqlx::query_as::<_, TimesheetEntry>(&format!(
            "SELECT {} FROM timesheet_entries WHERE id = $1",
            ENTRY_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(entry)
    }

    pub async fn list_by_staff(&self, staff_id: &str) -> Result<Vec<TimesheetEntry>> {
        let entries = sqlx::query_as::<_, TimesheetEntry>(&format!(
            "SELECT {} FROM timesheet_entries WHERE staff_id = $1 ORDER BY work_date DESC, created_at DESC LIMIT $2",
            ENTRY_COLUMNS
        ))
        .bind(staff_id)
        .bind(LIST_LIMIT)
        .fetch_all(&self.pool)
        .await?;

        Ok(entries)
    }

    pub async fn list_by_status(&self, status: TimesheetStatus) -> Result<Vec<TimesheetEntry>> {
        let entries = sqlx::query_as::<_, TimesheetEntry>(&format!(
            "SELECT {} FROM timesheet_entries WHERE status = $1 ORDER BY work_date, created_at",
            ENTRY_COLUMNS
        ))
        .bind(status.to_string())
        .fetch_all(&self.pool)
        .await?;

        Ok(entries)
    }

    /// Sum of hours in [from, to] that count toward totals: SUBMITTED and
    /// APPROVED only, DRAFT and REJECTED never. The CAST keeps the empty
    /// window a REAL; a bare COALESCE fallback comes back as an INTEGER,
    /// which the f64 decode refuses.
    pub async fn hours_between(
        &self,
        staff_id: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<f64> {
        let hours: f64 = sqlx::query_scalar(
            r#"
            SELECT CAST(COALESCE(SUM(total_hours), 0) AS REAL)
            FROM timesheet_entries
            WHERE staff_id = $1
              AND work_date >= $2 AND work_date <= $3
              AND status IN ('submitted', 'approved')
            "#,
        )
        .bind(staff_id)
        .bind(from)
        .bind(to)
        .fetch_one(&self.pool)
        .await?;

        Ok(hours)
    }

    pub async fn count_by_status(&self, staff_id: &str, status: TimesheetStatus) -> Result<i64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM timesheet_entries WHERE staff_id = $1 AND status = $2",
        )
        .bind(staff_id)
        .bind(status.to_string())
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    /// Move a staff member's own DRAFT entry to SUBMITTED. Scoped to the
    /// owner so one staff member cannot submit another's draft.
    pub async fn submit_entry(&self, id: &str, staff_id: &str) -> Result<Option<TimesheetEntry>> {
        let now = Utc::now().naive_utc();
        let result = sqlx::query(
            r#"
            UPDATE timesheet_entries
            SET status = 'submitted', submitted_at = $1, updated_at = $1
            WHERE id = $2 AND staff_id = $3 AND status = 'draft'
            "#,
        )
        .bind(now)
        .bind(id)
        .bind(staff_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        self.find_by_id(id).await
    }

    /// Approve a SUBMITTED entry. Terminal entries are left untouched.
    pub async fn approve_entry(&self, id: &str) -> Result<Option<TimesheetEntry>> {
        let now = Utc::now().naive_utc();
        let result = sqlx::query(
            r#"
            UPDATE timesheet_entries
            SET status = 'approved', approved_at = $1, updated_at = $1
            WHERE id = $2 AND status = 'submitted'
            "#,
        )
        .bind(now)
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        self.find_by_id(id).await
    }

    pub async fn reject_entry(
        &self,
        id: &str,
        notes: Option<String>,
    ) -> Result<Option<TimesheetEntry>> {
        let now = Utc::now().naive_utc();
        let result = sqlx::query(
            r#"
            UPDATE timesheet_entries
            SET status = 'rejected', rejected_at = $1, rejection_notes = $2, updated_at = $1
            WHERE id = $3 AND status = 'submitted'
            "#,
        )
        .bind(now)
        .bind(&notes)
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        self.find_by_id(id).await
    }

    /// Owning user of an entry's staff profile, for outcome notifications.
    pub async fn owner_user_id(&self, entry_id: &str) -> Result<Option<String>> {
        let user_id: Option<String> = sqlx::query_scalar(
            r#"
            SELECT st.user_id
            FROM timesheet_entries t
            JOIN staff st ON st.id = t.staff_id
            WHERE t.id = $1
            "#,
        )
        .bind(entry_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user_id)
    }
}
