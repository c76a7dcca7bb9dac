//! Token Issuer Contract
//!
//! Signed bearer tokens carrying a subject id and expiry. The signing
//! scheme is an infrastructure concern; the domain only depends on this
//! contract.

use kernel::id::UserId;
use thiserror::Error;

/// Token issuance/validation errors
#[derive(Debug, Error)]
pub enum TokenError {
    /// Signing failed (key or encoding problem)
    #[error("Token signing failed: {0}")]
    Signing(String),

    /// Unsigned, expired, malformed, or otherwise unusable token.
    /// Deliberately undifferentiated: callers must not learn which
    /// check failed.
    #[error("Token is invalid or expired")]
    Invalid,
}

/// Creates and validates signed bearer tokens
pub trait TokenIssuer: Send + Sync {
    /// Mint a short-lived access token for a user
    fn issue_access(&self, user_id: &UserId) -> Result<String, TokenError>;

    /// Mint a longer-lived refresh token for a user
    fn issue_refresh(&self, user_id: &UserId) -> Result<String, TokenError>;

    /// Validate signature and expiry, then decode the subject id
    fn subject_of(&self, token: &str) -> Result<UserId, TokenError>;
}
