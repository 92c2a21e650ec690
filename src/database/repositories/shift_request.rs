use anyhow::Result;
use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::database::models::{
    AvailableShift, AvailableShiftRow, PendingShiftRequest, RequestStatus, ShiftRequest,
    StaffShift, StaffShiftStatus,
};

const REQUEST_COLUMNS: &str =
    "id, staff_id, shift_id, message, status, rejection_notes, reviewed_at, created_at";

pub const SIBLING_REJECTION_NOTE: &str = "Shift was assigned to another staff member";

/// Result of an admin review. Terminal requests are never mutated again, so
/// every failure mode is reported explicitly instead of being retried.
#[derive(Debug)]
pub enum ReviewOutcome<T> {
    Completed(T),
    NotFound,
    AlreadyReviewed,
    /// Another approval won the race and the shift is no longer open.
    ShiftUnavailable,
}

/// Everything the approval transaction produced, for response shaping and
/// post-commit notifications.
#[derive(Debug)]
pub struct ApprovalOutcome {
    pub request: ShiftRequest,
    pub shift: AvailableShift,
    pub staff_shift: StaffShift,
    pub approved_user_id: String,
    pub rejected_siblings: Vec<RejectedSibling>,
}

#[derive(Debug, sqlx::FromRow)]
pub struct RejectedSibling {
    pub id: String,
    pub user_id: String,
}

#[derive(Clone)]
pub struct ShiftRequestRepository {
    pool: SqlitePool,
}

impl ShiftRequestRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create_request(
        &self,
        staff_id: &str,
        shift_id: &str,
        message: Option<String>,
    ) -> Result<ShiftRequest> {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now().naive_utc();

        sqlx::query(
            r#"
            INSERT INTO shift_requests (id, staff_id, shift_id, message, status, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(&id)
        .bind(staff_id)
        .bind(shift_id)
        .bind(&message)
        .bind(RequestStatus::Pending.to_string())
        .bind(now)
        .execute(&self.pool)
        .await?;

        self.find_by_id(&id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("Request row vanished after insert"))
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<ShiftRequest>> {
        let request = sqlx::query_as::<_, ShiftRequest>(&format!(
            "SELECT {} FROM shift_requests WHERE id = $1",
            REQUEST_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(request)
    }

    pub async fn exists_for(&self, staff_id: &str, shift_id: &str) -> Result<bool> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM shift_requests WHERE staff_id = $1 AND shift_id = $2",
        )
        .bind(staff_id)
        .bind(shift_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count > 0)
    }

    pub async fn list_by_staff(
        &self,
        staff_id: &str,
        status: Option<RequestStatus>,
    ) -> Result<Vec<ShiftRequest>> {
        let requests = match status {
            Some(status) => {
                sqlx::query_as::<_, ShiftRequest>(&format!(
                    "SELECT {} FROM shift_requests WHERE staff_id = $1 AND status = $2 ORDER BY created_at DESC",
                    REQUEST_COLUMNS
                ))
                .bind(staff_id)
                .bind(status.to_string())
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, ShiftRequest>(&format!(
                    "SELECT {} FROM shift_requests WHERE staff_id = $1 ORDER BY created_at DESC",
                    REQUEST_COLUMNS
                ))
                .bind(staff_id)
                .fetch_all(&self.pool)
                .await?
            }
        };

        Ok(requests)
    }

    /// Pending requests joined with requester and shift, for the admin
    /// review queue.
    pub async fn list_pending(&self) -> Result<Vec<PendingShiftRequest>> {
        let requests = sqlx::query_as::<_, PendingShiftRequest>(
            r#"
            SELECT r.id, r.staff_id, u.name AS staff_name, st.role AS staff_role,
                   r.shift_id, s.shift_date, s.start_time, s.end_time,
                   s.service_type, s.location, r.message, r.created_at
            FROM shift_requests r
            JOIN staff st ON st.id = r.staff_id
            JOIN users u ON u.id = st.user_id
            JOIN available_shifts s ON s.id = r.shift_id
            WHERE r.status = 'pending'
            ORDER BY r.created_at
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(requests)
    }

    /// Approve a pending request. One transaction covers the `is_assigned`
    /// flip (guarded, so a concurrent second approval loses cleanly), the
    /// request state change, the StaffShift materialization and the sibling
    /// rejections.
    pub async fn approve_request(&self, id: &str) -> Result<ReviewOutcome<ApprovalOutcome>> {
        let mut tx = self.pool.begin().await?;
        let now = Utc::now().naive_utc();

        let request = sqlx::query_as::<_, ShiftRequest>(&format!(
            "SELECT {} FROM shift_requests WHERE id = $1",
            REQUEST_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;

        let request = match request {
            Some(request) => request,
            None => return Ok(ReviewOutcome::NotFound),
        };
        if request.status != RequestStatus::Pending {
            return Ok(ReviewOutcome::AlreadyReviewed);
        }

        let approved_user_id: Option<String> =
            sqlx::query_scalar("SELECT user_id FROM staff WHERE id = $1")
                .bind(&request.staff_id)
                .fetch_optional(&mut *tx)
                .await?;
        let approved_user_id = match approved_user_id {
            Some(user_id) => user_id,
            None => return Ok(ReviewOutcome::NotFound),
        };

        // Siblings are collected first so their owners can be notified after
        // the commit.
        let rejected_siblings = sqlx::query_as::<_, RejectedSibling>(
            r#"
            SELECT r.id, st.user_id
            FROM shift_requests r
            JOIN staff st ON st.id = r.staff_id
            WHERE r.shift_id = $1 AND r.status = 'pending' AND r.id != $2
            "#,
        )
        .bind(&request.shift_id)
        .bind(id)
        .fetch_all(&mut *tx)
        .await?;

        // Guarded flip: zero rows means another approval already took the
        // shift, and the whole transaction is abandoned.
        let flipped = sqlx::query(
            r#"
            UPDATE available_shifts
            SET is_assigned = 1, assigned_to = $1, updated_at = $2
            WHERE id = $3 AND is_assigned = 0
            "#,
        )
        .bind(&request.staff_id)
        .bind(now)
        .bind(&request.shift_id)
        .execute(&mut *tx)
        .await?;
        if flipped.rows_affected() == 0 {
            return Ok(ReviewOutcome::ShiftUnavailable);
        }

        let approved = sqlx::query(
            "UPDATE shift_requests SET status = 'approved', reviewed_at = $1 WHERE id = $2 AND status = 'pending'",
        )
        .bind(now)
        .bind(id)
        .execute(&mut *tx)
        .await?;
        if approved.rows_affected() == 0 {
            return Ok(ReviewOutcome::AlreadyReviewed);
        }

        let shift = sqlx::query_as::<_, AvailableShiftRow>(
            r#"
            SELECT id, shift_date, start_time, end_time, duration_minutes, service_type,
                   location, required_role, required_skills, participant_id,
                   is_assigned, assigned_to, notes, created_at, updated_at
            FROM available_shifts WHERE id = $1
            "#,
        )
        .bind(&request.shift_id)
        .fetch_one(&mut *tx)
        .await?;
        let shift = AvailableShift::from(shift);

        let staff_shift = StaffShift {
            id: Uuid::new_v4().to_string(),
            staff_id: request.staff_id.clone(),
            shift_date: shift.shift_date,
            start_time: shift.start_time.clone(),
            end_time: shift.end_time.clone(),
            status: StaffShiftStatus::Scheduled,
            created_at: now,
        };
        sqlx::query(
            r#"
            INSERT INTO staff_shifts (id, staff_id, shift_date, start_time, end_time, status, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(&staff_shift.id)
        .bind(&staff_shift.staff_id)
        .bind(staff_shift.shift_date)
        .bind(&staff_shift.start_time)
        .bind(&staff_shift.end_time)
        .bind(staff_shift.status.to_string())
        .bind(staff_shift.created_at)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            UPDATE shift_requests
            SET status = 'rejected', rejection_notes = $1, reviewed_at = $2
            WHERE shift_id = $3 AND status = 'pending' AND id != $4
            "#,
        )
        .bind(SIBLING_REJECTION_NOTE)
        .bind(now)
        .bind(&request.shift_id)
        .bind(id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        let request = ShiftRequest {
            status: RequestStatus::Approved,
            reviewed_at: Some(now),
            ..request
        };

        Ok(ReviewOutcome::Completed(ApprovalOutcome {
            request,
            shift,
            staff_shift,
            approved_user_id,
            rejected_siblings,
        }))
    }

    /// Reject a pending request, recording the reviewer's notes.
    pub async fn reject_request(
        &self,
        id: &str,
        notes: Option<String>,
    ) -> Result<ReviewOutcome<(ShiftRequest, String)>> {
        let request = match self.find_by_id(id).await? {
            Some(request) => request,
            None => return Ok(ReviewOutcome::NotFound),
        };
        if request.status != RequestStatus::Pending {
            return Ok(ReviewOutcome::AlreadyReviewed);
        }

        let now = Utc::now().naive_utc();
        let updated = sqlx::query(
            r#"
            UPDATE shift_requests
            SET status = 'rejected', rejection_notes = $1, reviewed_at = $2
            WHERE id = $3 AND status = 'pending'
            "#,
        )
        .bind(&notes)
        .bind(now)
        .bind(id)
        .execute(&self.pool)
        .await?;
        if updated.rows_affected() == 0 {
            return Ok(ReviewOutcome::AlreadyReviewed);
        }

        let user_id: String = sqlx::query_scalar("SELECT user_id FROM staff WHERE id = $1")
            .bind(&request.staff_id)
            .fetch_one(&self.pool)
            .await?;

        let request = ShiftRequest {
            status: RequestStatus::Rejected,
            rejection_notes: notes,
            reviewed_at: Some(now),
            ..request
        };

        Ok(ReviewOutcome::Completed((request, user_id)))
    }
}
