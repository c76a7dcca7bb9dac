//! Login Use Case
//!
//! Authenticates a user by email and password, mints the access/refresh
//! token pair, and installs the refresh token as the user's single live
//! refresh record.

use std::sync::Arc;

use platform::password::ClearTextPassword;

use crate::application::config::SessionConfig;
use crate::domain::entity::refresh_token::RefreshRecord;
use crate::domain::entity::user::User;
use crate::domain::repository::{RefreshTokenRepository, UserRepository};
use crate::domain::token::TokenIssuer;
use crate::domain::value_object::credential::Verification;
use crate::domain::value_object::email::Email;
use crate::error::{SessionError, SessionResult};

/// Login input
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

/// Login output
#[derive(Debug)]
pub struct LoginOutput {
    pub user: User,
    pub access_token: String,
    pub refresh_token: String,
}

/// Login use case
///
/// Callers must gate this behind the login rate limiter; a throttled
/// client never reaches credential verification.
pub struct LoginUseCase<R, T>
where
    R: UserRepository + RefreshTokenRepository,
    T: TokenIssuer,
{
    repo: Arc<R>,
    issuer: Arc<T>,
    config: Arc<SessionConfig>,
}

impl<R, T> LoginUseCase<R, T>
where
    R: UserRepository + RefreshTokenRepository,
    T: TokenIssuer,
{
    pub fn new(repo: Arc<R>, issuer: Arc<T>, config: Arc<SessionConfig>) -> Self {
        Self {
            repo,
            issuer,
            config,
        }
    }

    pub async fn execute(&self, input: LoginInput) -> SessionResult<LoginOutput> {
        // An address that fails validation cannot belong to any account
        let email = Email::new(&input.email).map_err(|_| SessionError::NotFoundEmail)?;

        let user = self
            .repo
            .find_by_email(&email)
            .await?
            .ok_or(SessionError::NotFoundEmail)?;

        let presented = ClearTextPassword::new(input.password);

        match user
            .credential
            .verify(&presented)
            .map_err(|e| SessionError::Internal(e.to_string()))?
        {
            Verification::Match => {}
            Verification::MatchUpgraded(upgraded) => {
                // One-time migration: persist the hashed replacement
                // before issuing tokens
                self.repo.update_credential(&user.id, &upgraded).await?;

                tracing::info!(user_id = %user.id, "Migrated legacy credential to hashed form");
            }
            Verification::Mismatch => return Err(SessionError::WrongPassword),
        }

        let access_token = self
            .issuer
            .issue_access(&user.id)
            .map_err(|e| SessionError::Internal(e.to_string()))?;
        let refresh_token = self
            .issuer
            .issue_refresh(&user.id)
            .map_err(|e| SessionError::Internal(e.to_string()))?;

        // Single live refresh record per user: overwrite, never add
        let ttl = chrono::Duration::from_std(self.config.refresh_ttl)
            .map_err(|e| SessionError::Internal(format!("Invalid refresh TTL: {e}")))?;
        let record = RefreshRecord::new(user.id, refresh_token.clone(), ttl);
        self.repo.upsert(&record).await?;

        tracing::info!(user_id = %user.id, "User logged in");

        Ok(LoginOutput {
            user,
            access_token,
            refresh_token,
        })
    }
}
