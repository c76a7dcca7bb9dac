//! API DTOs (Data Transfer Objects)

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::entity::user::User;

// ============================================================================
// Login
// ============================================================================

/// Login request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Non-sensitive user summary returned by login and refresh
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub user_id: Uuid,
    pub email: String,
    pub nickname: String,
}

impl From<&User> for UserSummary {
    fn from(user: &User) -> Self {
        Self {
            user_id: *user.id.as_uuid(),
            email: user.email.as_str().to_string(),
            nickname: user.nickname.clone(),
        }
    }
}

/// Login response
///
/// Both tokens are also set as cookies; the body carries them for
/// clients that prefer header-based auth.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub user: UserSummary,
    pub access_token: String,
    pub refresh_token: String,
}

// ============================================================================
// Refresh
// ============================================================================

/// Refresh response
///
/// The refresh token stays cookie-only and never appears in a body.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshResponse {
    pub user: UserSummary,
    pub access_token: String,
}
