use anyhow::Result;
use sqlx::SqlitePool;

use crate::database::models::StaffShift;

#[derive(Clone)]
pub struct StaffShiftRepository {
    pool: SqlitePool,
}

impl StaffShiftRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// A staff member's assigned shifts, soonest first. Read by the
    /// schedule view; rows are written by the approval transaction.
    pub async fn list_by_staff(&self, staff_id: &str) -> Result<Vec<StaffShift>> {
        let shifts = sqlx::query_as::<_, StaffShift>(
            r#"
            SELECT id, staff_id, shift_date, start_time, end_time, status, created_at
            FROM staff_shifts
            WHERE staff_id = $1
            ORDER BY shift_date, start_time
            "#,
        )
        .bind(staff_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(shifts)
    }
}
