//! Logout Use Case
//!
//! Best-effort session teardown. A client presenting a broken or
//! already-invalid token must still be able to clear its local state,
//! so this use case never fails: every failure is absorbed into
//! [`LogoutOutcome::Ignored`] and the caller expires the cookies
//! regardless.

use std::sync::Arc;

use kernel::id::UserId;

use crate::domain::repository::RefreshTokenRepository;
use crate::domain::token::TokenIssuer;

/// Logout outcome
///
/// Not a `Result`: the absorbed-failure path is part of the contract,
/// so it is visible in the type instead of hidden in control flow.
pub enum LogoutOutcome {
    /// A valid refresh token was presented and its record removed
    Cleared { user_id: UserId },
    /// Missing, blank, or invalid token, or nothing on record; the
    /// request still succeeds
    Ignored,
}

/// Logout use case
pub struct LogoutUseCase<R, T>
where
    R: RefreshTokenRepository,
    T: TokenIssuer,
{
    repo: Arc<R>,
    issuer: Arc<T>,
}

impl<R, T> LogoutUseCase<R, T>
where
    R: RefreshTokenRepository,
    T: TokenIssuer,
{
    pub fn new(repo: Arc<R>, issuer: Arc<T>) -> Self {
        Self { repo, issuer }
    }

    pub async fn execute(&self, presented: Option<&str>) -> LogoutOutcome {
        let Some(token) = presented.map(str::trim).filter(|t| !t.is_empty()) else {
            return LogoutOutcome::Ignored;
        };

        let Ok(user_id) = self.issuer.subject_of(token) else {
            tracing::debug!("Logout with unusable refresh token");
            return LogoutOutcome::Ignored;
        };

        match self.repo.delete_by_user_id(&user_id).await {
            Ok(deleted) if deleted > 0 => {
                tracing::info!(user_id = %user_id, "User logged out");
                LogoutOutcome::Cleared { user_id }
            }
            Ok(_) => LogoutOutcome::Ignored,
            Err(e) => {
                tracing::warn!(user_id = %user_id, error = %e, "Failed to delete refresh record during logout");
                LogoutOutcome::Ignored
            }
        }
    }
}
