use anyhow::Result;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub open_shifts: i64,
    pub pending_shift_requests: i64,
    pub submitted_timesheets: i64,
    pub active_staff: i64,
}

#[derive(Clone)]
pub struct StatsRepository {
    pool: SqlitePool,
}

impl StatsRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Independent counts, batched for latency only.
    pub async fn dashboard_stats(&self) -> Result<DashboardStats> {
        let open_shifts = self.count("SELECT COUNT(*) FROM available_shifts WHERE is_assigned = 0");
        let pending_requests =
            self.count("SELECT COUNT(*) FROM shift_requests WHERE status = 'pending'");
        let submitted_timesheets =
            self.count("SELECT COUNT(*) FROM timesheet_entries WHERE status = 'submitted'");
        let active_staff = self.count("SELECT COUNT(*) FROM staff WHERE is_active = 1");

        let (open_shifts, pending_shift_requests, submitted_timesheets, active_staff) =
            futures::try_join!(open_shifts, pending_requests, submitted_timesheets, active_staff)?;

        Ok(DashboardStats {
            open_shifts,
            pending_shift_requests,
            submitted_timesheets,
            active_staff,
        })
    }

    async fn count(&self, query: &str) -> Result<i64> {
        let count: i64 = sqlx::query_scalar(query).fetch_one(&self.pool).await?;
        Ok(count)
    }
}
