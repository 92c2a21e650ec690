use serde::{Deserialize, Serialize};

use crate::database::models::Staff;
use crate::database::repositories::StaffRepository;
use crate::error::AppError;
use crate::services::Claims;

/// Response envelope. Success bodies carry `data`, failures carry `error`;
/// clients branch on whichever is present, so the flag and the HTTP status
/// must stay in agreement.
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }
}

impl ApiResponse<()> {
    pub fn error(message: &str) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.to_string()),
        }
    }
}

/// Resolve the caller's staff profile. Staff-scoped handlers filter every
/// query by the returned profile's id, which is what keeps one staff member
/// out of another's rows.
pub async fn require_staff_profile(
    claims: &Claims,
    staff_repo: &StaffRepository,
) -> Result<Staff, AppError> {
    staff_repo
        .find_by_user_id(claims.user_id())
        .await?
        .ok_or_else(|| AppError::NotFound("Staff profile not found".to_string()))
}
