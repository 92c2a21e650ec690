use anyhow::Result;
use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::database::models::{NewNotification, Notification};

const NOTIFICATION_COLUMNS: &str =
    "id, user_id, kind, title, message, link, is_read, read_at, created_at";

/// Notification bell views show at most this many rows.
const LIST_LIMIT: i64 = 50;

#[derive(Clone)]
pub struct NotificationRepository {
    pool: SqlitePool,
}

impl NotificationRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, input: NewNotification) -> Result<Notification> {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now().naive_utc();

        sqlx::query(
            r#"
            INSERT INTO notifications (id, user_id, kind, title, message, link, is_read, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, 0, $7)
            "#,
        )
        .bind(&id)
        .bind(&input.user_id)
        .bind(input.kind.to_string())
        .bind(&input.title)
        .bind(&input.message)
        .bind(&input.link)
        .bind(now)
        .execute(&self.pool)
        .await?;

        let notification = sqlx::query_as::<_, Notification>(&format!(
            "SELECT {} FROM notifications WHERE id = $1",
            NOTIFICATION_COLUMNS
        ))
        .bind(&id)
        .fetch_one(&self.pool)
        .await?;

        Ok(notification)
    }

    /// Fan-out: one row per recipient, inserted in a single transaction so a
    /// multi-recipient event is either fully recorded or not at all.
    pub async fn create_batch(&self, inputs: Vec<NewNotification>) -> Result<()> {
        if inputs.is_empty() {
            return Ok(());
        }

        let mut tx = self.pool.begin().await?;
        let now = Utc::now().naive_utc();

        for input in inputs {
            sqlx::query(
                r#"
                INSERT INTO notifications (id, user_id, kind, title, message, link, is_read, created_at)
                VALUES ($1, $2, $3, $4, $5, $6, 0, $7)
                "#,
            )
            .bind(Uuid::new_v4().to_string())
            .bind(&input.user_id)
            .bind(input.kind.to_string())
            .bind(&input.title)
            .bind(&input.message)
            .bind(&input.link)
            .bind(now)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    pub async fn list_recent(&self, user_id: &str) -> Result<Vec<Notification>> {
        let notifications = sqlx::query_as::<_, Notification>(&format!(
            "SELECT {} FROM notifications WHERE user_id = $1 ORDER BY created_at DESC, id DESC LIMIT $2",
            NOTIFICATION_COLUMNS
        ))
        .bind(user_id)
        .bind(LIST_LIMIT)
        .fetch_all(&self.pool)
        .await?;

        Ok(notifications)
    }

    /// Exact unread count, independent of the listing window.
    pub async fn unread_count(&self, user_id: &str) -> Result<i64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM notifications WHERE user_id = $1 AND is_read = 0",
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    /// Mark one notification read, scoped to the owner. Idempotent: an
    /// already-read notification keeps its original read_at.
    pub async fn mark_read(&self, id: &str, user_id: &str) -> Result<Option<Notification>> {
        let result = sqlx::query(
            r#"
            UPDATE notifications
            SET is_read = 1, read_at = COALESCE(read_at, $1)
            WHERE id = $2 AND user_id = $3
            "#,
        )
        .bind(Utc::now().naive_utc())
        .bind(id)
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        let notification = sqlx::query_as::<_, Notification>(&format!(
            "SELECT {} FROM notifications WHERE id = $1",
            NOTIFICATION_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(notification)
    }

    pub async fn mark_all_read(&self, user_id: &str) -> Result<u64> {
        let result = sqlx::query(
            "UPDATE notifications SET is_read = 1, read_at = $1 WHERE user_id = $2 AND is_read = 0",
        )
        .bind(Utc::now().naive_utc())
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }
}
