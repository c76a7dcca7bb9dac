//! Refresh Record Entity
//!
//! The server-side record of the one refresh token currently honored
//! for a user. Keyed by user id: a later login overwrites the record,
//! which silently invalidates any token issued by an earlier session.

use chrono::{DateTime, Duration, Utc};
use kernel::id::UserId;
use platform::crypto::constant_time_eq;

/// Refresh token record (at most one per user)
#[derive(Debug, Clone)]
pub struct RefreshRecord {
    pub user_id: UserId,
    /// Exact token string as issued
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl RefreshRecord {
    /// Create a record expiring `ttl` from now
    pub fn new(user_id: UserId, token: String, ttl: Duration) -> Self {
        let now = Utc::now();

        Self {
            user_id,
            token,
            expires_at: now + ttl,
            updated_at: now,
        }
    }

    /// Compare a presented token against the stored value
    ///
    /// Constant-time: the comparison outcome must not leak how much of
    /// a superseded token still matches.
    pub fn matches(&self, presented: &str) -> bool {
        constant_time_eq(self.token.as_bytes(), presented.as_bytes())
    }

    pub fn is_expired(&self) -> bool {
        Utc::now() > self.expires_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matches_exact_value_only() {
        let record = RefreshRecord::new(UserId::new(), "token-r1".to_string(), Duration::days(7));

        assert!(record.matches("token-r1"));
        assert!(!record.matches("token-r2"));
        assert!(!record.matches(""));
    }

    #[test]
    fn test_fresh_record_is_not_expired() {
        let record = RefreshRecord::new(UserId::new(), "token".to_string(), Duration::days(7));
        assert!(!record.is_expired());
    }

    #[test]
    fn test_negative_ttl_is_expired() {
        let record = RefreshRecord::new(UserId::new(), "token".to_string(), Duration::seconds(-1));
        assert!(record.is_expired());
    }
}
