//! Credential Value Object
//!
//! A stored login credential in one of two formats: a modern Argon2id
//! hash, or a legacy plain-text value kept for backward compatibility.
//! The format is decided once, when the stored string is decoded; every
//! other call site matches on the variant.

use std::fmt;

use platform::crypto::constant_time_eq;
use platform::password::{ClearTextPassword, HashedPassword, PasswordHashError, is_phc_string};

/// Stored credential, tagged by format
///
/// Once a credential is `Hashed` it never reverts to `Legacy`; the only
/// mutation is the one-time upgrade performed when a legacy value is
/// confirmed to match at login.
#[derive(Clone)]
pub enum Credential {
    /// Argon2id hash in PHC string format
    Hashed(HashedPassword),
    /// Plain-text password from before hashing was introduced
    Legacy(String),
}

/// Outcome of verifying a presented password against a stored credential
pub enum Verification {
    /// Presented password matches; nothing to persist
    Match,
    /// Presented password matches a legacy credential; the replacement
    /// hashed credential must be persisted by the caller
    MatchUpgraded(Credential),
    /// Presented password does not match
    Mismatch,
}

impl Credential {
    /// Decode a stored credential string
    ///
    /// This is the only place the storage format is sniffed: a PHC
    /// prefix means hashed, anything else is a legacy plain-text value.
    /// A string with the prefix but corrupt contents stays on the hashed
    /// path, where verification simply fails.
    pub fn from_stored(stored: String) -> Self {
        if is_phc_string(&stored) {
            Credential::Hashed(HashedPassword::from_stored_unchecked(stored))
        } else {
            Credential::Legacy(stored)
        }
    }

    /// Verify a presented password
    ///
    /// Hashed credentials delegate to Argon2 verification and never
    /// mutate. Legacy credentials compare byte-for-byte in constant
    /// time; a match produces the upgraded replacement for the caller
    /// to persist.
    pub fn verify(&self, presented: &ClearTextPassword) -> Result<Verification, PasswordHashError> {
        match self {
            Credential::Hashed(hash) => {
                if hash.verify(presented) {
                    Ok(Verification::Match)
                } else {
                    Ok(Verification::Mismatch)
                }
            }
            Credential::Legacy(plain) => {
                if constant_time_eq(plain.as_bytes(), presented.as_bytes()) {
                    let upgraded = presented.hash()?;
                    Ok(Verification::MatchUpgraded(Credential::Hashed(upgraded)))
                } else {
                    Ok(Verification::Mismatch)
                }
            }
        }
    }

    /// Storage representation
    pub fn as_stored(&self) -> &str {
        match self {
            Credential::Hashed(hash) => hash.as_phc_string(),
            Credential::Legacy(plain) => plain,
        }
    }

    pub fn is_hashed(&self) -> bool {
        matches!(self, Credential::Hashed(_))
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Credential::Hashed(_) => f.write_str("Credential::Hashed([HASH])"),
            Credential::Legacy(_) => f.write_str("Credential::Legacy([REDACTED])"),
        }
    }
}
