//! Refresh Use Case
//!
//! Exchanges a valid refresh token for a new access token. The refresh
//! token itself is not rotated: it stays usable until it expires or a
//! new login supersedes it.

use std::sync::Arc;

use crate::domain::entity::user::User;
use crate::domain::repository::{RefreshTokenRepository, UserRepository};
use crate::domain::token::TokenIssuer;
use crate::error::{SessionError, SessionResult};

/// Refresh output
#[derive(Debug)]
pub struct RefreshOutput {
    pub user: User,
    pub access_token: String,
}

/// Refresh use case
pub struct RefreshUseCase<R, T>
where
    R: UserRepository + RefreshTokenRepository,
    T: TokenIssuer,
{
    repo: Arc<R>,
    issuer: Arc<T>,
}

impl<R, T> RefreshUseCase<R, T>
where
    R: UserRepository + RefreshTokenRepository,
    T: TokenIssuer,
{
    pub fn new(repo: Arc<R>, issuer: Arc<T>) -> Self {
        Self { repo, issuer }
    }

    /// Every validation failure collapses to `UnauthorizedUser`; the
    /// only other failure is `NotFoundUser` when the account was
    /// deleted after the token was issued.
    pub async fn execute(&self, presented: Option<&str>) -> SessionResult<RefreshOutput> {
        let token = presented
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or(SessionError::UnauthorizedUser)?;

        // Signature + expiry check and subject decode in one step
        let user_id = self
            .issuer
            .subject_of(token)
            .map_err(|_| SessionError::UnauthorizedUser)?;

        // The token must also be the one currently on record: a
        // cryptographically valid token from a superseded session is
        // rejected here
        let saved = self
            .repo
            .find_by_user_id(&user_id)
            .await?
            .ok_or(SessionError::UnauthorizedUser)?;

        if !saved.matches(token) {
            return Err(SessionError::UnauthorizedUser);
        }

        let access_token = self
            .issuer
            .issue_access(&user_id)
            .map_err(|e| SessionError::Internal(e.to_string()))?;

        let user = self
            .repo
            .find_by_id(&user_id)
            .await?
            .ok_or(SessionError::NotFoundUser)?;

        tracing::debug!(user_id = %user.id, "Access token reissued");

        Ok(RefreshOutput { user, access_token })
    }
}
