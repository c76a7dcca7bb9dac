//! Repository Traits
//!
//! Interfaces for data persistence. Implementation is in the
//! infrastructure layer.

use kernel::id::UserId;

use crate::domain::entity::{refresh_token::RefreshRecord, user::User};
use crate::domain::value_object::{credential::Credential, email::Email};
use crate::error::SessionResult;

/// User repository trait
///
/// The user table is owned by the user domain; this subsystem needs
/// lookups plus the single credential-upgrade write.
#[trait_variant::make(UserRepository: Send)]
pub trait LocalUserRepository {
    /// Find user by email
    async fn find_by_email(&self, email: &Email) -> SessionResult<Option<User>>;

    /// Find user by ID
    async fn find_by_id(&self, user_id: &UserId) -> SessionResult<Option<User>>;

    /// Replace the stored credential for a user
    async fn update_credential(
        &self,
        user_id: &UserId,
        credential: &Credential,
    ) -> SessionResult<()>;
}

/// Refresh token repository trait
///
/// Enforces at most one live record per user: `upsert` must be atomic
/// with respect to the per-user uniqueness invariant, with the later
/// write winning under concurrency.
#[trait_variant::make(RefreshTokenRepository: Send)]
pub trait LocalRefreshTokenRepository {
    /// Find the current record for a user
    async fn find_by_user_id(&self, user_id: &UserId) -> SessionResult<Option<RefreshRecord>>;

    /// Insert the record, or overwrite the existing one for the same user
    async fn upsert(&self, record: &RefreshRecord) -> SessionResult<()>;

    /// Delete the record for a user, returning the number of rows removed
    async fn delete_by_user_id(&self, user_id: &UserId) -> SessionResult<u64>;
}
