use anyhow::Result;
use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::database::models::{Staff, StaffInput, StaffRole, StaffRow, StaffUpdateInput};

const STAFF_COLUMNS: &str =
    "id, user_id, role, is_active, certifications, availability, created_at, updated_at";

#[derive(Clone)]
pub struct StaffRepository {
    pool: SqlitePool,
}

impl StaffRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create_staff(&self, input: StaffInput) -> Result<Staff> {
        let now = Utc::now().naive_utc();
        let id = Uuid::new_v4().to_string();
        let availability = serde_json::to_string(&input.availability)?;

        sqlx::query(
            r#"
            INSERT INTO staff (id, user_id, role, is_active, certifications, availability, created_at, updated_at)
            VALUES ($1, $2, $3, 1, $4, $5, $6, $7)
            "#,
        )
        .bind(&id)
        .bind(&input.user_id)
        .bind(input.role.to_string())
        .bind(&input.certifications)
        .bind(&availability)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await?;

        self.find_by_id(&id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("Staff row vanished after insert"))
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<Staff>> {
        let row = sqlx::query_as::<_, StaffRow>(&format!(
            "SELECT {} FROM staff WHERE id = $1",
            STAFF_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Staff::from))
    }

    pub async fn find_by_user_id(&self, user_id: &str) -> Result<Option<Staff>> {
        let row = sqlx::query_as::<_, StaffRow>(&format!(
            "SELECT {} FROM staff WHERE user_id = $1",
            STAFF_COLUMNS
        ))
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Staff::from))
    }

    pub async fn list_all(&self) -> Result<Vec<Staff>> {
        let rows = sqlx::query_as::<_, StaffRow>(&format!(
            "SELECT {} FROM staff ORDER BY created_at",
            STAFF_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Staff::from).collect())
    }

    /// Active staff eligible for a shift: everyone when the shift has no
    /// role restriction, otherwise only matching roles.
    pub async fn list_active_by_role(&self, role: Option<StaffRole>) -> Result<Vec<Staff>> {
        let rows = match role {
            Some(role) => {
                sqlx::query_as::<_, StaffRow>(&format!(
                    "SELECT {} FROM staff WHERE is_active = 1 AND role = $1",
                    STAFF_COLUMNS
                ))
                .bind(role.to_string())
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, StaffRow>(&format!(
                    "SELECT {} FROM staff WHERE is_active = 1",
                    STAFF_COLUMNS
                ))
                .fetch_all(&self.pool)
                .await?
            }
        };

        Ok(rows.into_iter().map(Staff::from).collect())
    }

    pub async fn update_staff(&self, id: &str, input: StaffUpdateInput) -> Result<Option<Staff>> {
        let existing = match self.find_by_id(id).await? {
            Some(staff) => staff,
            None => return Ok(None),
        };

        let role = input.role.unwrap_or(existing.role);
        let is_active = input.is_active.unwrap_or(existing.is_active);
        let certifications = input.certifications.or(existing.certifications);
        let availability =
            serde_json::to_string(&input.availability.unwrap_or(existing.availability))?;

        sqlx::query(
            r#"
            UPDATE staff
            SET role = $1, is_active = $2, certifications = $3, availability = $4, updated_at = $5
            WHERE id = $6
            "#,
        )
        .bind(role.to_string())
        .bind(is_active)
        .bind(&certifications)
        .bind(&availability)
        .bind(Utc::now().naive_utc())
        .bind(id)
        .execute(&self.pool)
        .await?;

        self.find_by_id(id).await
    }
}
