//! User Entity
//!
//! The slice of the user record this subsystem works with. The full
//! profile is owned by the user domain; authentication reads the
//! credential and rewrites it exactly once, on legacy upgrade.

use kernel::id::UserId;

use crate::domain::value_object::{credential::Credential, email::Email};

/// User entity (authentication view)
#[derive(Debug, Clone)]
pub struct User {
    /// Internal UUID identifier
    pub id: UserId,
    /// Login email (unique)
    pub email: Email,
    /// Display name
    pub nickname: String,
    /// Stored login credential
    pub credential: Credential,
}

impl User {
    pub fn new(email: Email, nickname: impl Into<String>, credential: Credential) -> Self {
        Self {
            id: UserId::new(),
            email,
            nickname: nickname.into(),
            credential,
        }
    }
}
