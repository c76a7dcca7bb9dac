//! Application Configuration
//!
//! Configuration for the session application layer.

use std::time::Duration;

use platform::cookie::CookieConfig;

/// Re-export SameSite from platform
pub use platform::cookie::SameSite;

/// Session application configuration
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Access token cookie name
    pub access_cookie_name: String,
    /// Refresh token cookie name
    pub refresh_cookie_name: String,
    /// HS256 signing secret for tokens
    pub jwt_secret: Vec<u8>,
    /// Access token lifetime (1 hour)
    pub access_ttl: Duration,
    /// Refresh token lifetime (1 week)
    pub refresh_ttl: Duration,
    /// Whether to require Secure cookie
    pub cookie_secure: bool,
    /// SameSite policy
    pub cookie_same_site: SameSite,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            access_cookie_name: "accessToken".to_string(),
            refresh_cookie_name: "refreshToken".to_string(),
            jwt_secret: vec![0u8; 32],
            access_ttl: Duration::from_secs(3600),
            refresh_ttl: Duration::from_secs(7 * 24 * 3600),
            cookie_secure: true,
            cookie_same_site: SameSite::Lax,
        }
    }
}

impl SessionConfig {
    /// Create config with a random signing secret (for development)
    pub fn with_random_secret() -> Self {
        Self {
            jwt_secret: platform::crypto::random_bytes(32),
            ..Default::default()
        }
    }

    /// Create config for development (insecure cookie)
    pub fn development() -> Self {
        Self {
            cookie_secure: false,
            ..Self::with_random_secret()
        }
    }

    /// Access token TTL in whole seconds
    pub fn access_ttl_secs(&self) -> i64 {
        self.access_ttl.as_secs() as i64
    }

    /// Refresh token TTL in whole seconds
    pub fn refresh_ttl_secs(&self) -> i64 {
        self.refresh_ttl.as_secs() as i64
    }

    /// Cookie config for the access token; Max-Age mirrors the token TTL
    pub fn access_cookie(&self) -> CookieConfig {
        CookieConfig {
            name: self.access_cookie_name.clone(),
            secure: self.cookie_secure,
            http_only: true,
            same_site: self.cookie_same_site,
            path: "/".to_string(),
            max_age_secs: Some(self.access_ttl_secs()),
        }
    }

    /// Cookie config for the refresh token; Max-Age mirrors the token TTL
    pub fn refresh_cookie(&self) -> CookieConfig {
        CookieConfig {
            name: self.refresh_cookie_name.clone(),
            secure: self.cookie_secure,
            http_only: true,
            same_site: self.cookie_same_site,
            path: "/".to_string(),
            max_age_secs: Some(self.refresh_ttl_secs()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cookie_max_age_mirrors_ttl() {
        let config = SessionConfig::default();

        assert_eq!(config.access_cookie().max_age_secs, Some(3600));
        assert_eq!(config.refresh_cookie().max_age_secs, Some(604800));
    }

    #[test]
    fn test_development_config_is_insecure_with_random_secret() {
        let config = SessionConfig::development();

        assert!(!config.cookie_secure);
        assert_ne!(config.jwt_secret, vec![0u8; 32]);
    }

    #[test]
    fn test_cookie_names() {
        let config = SessionConfig::default();
        assert_eq!(config.access_cookie().name, "accessToken");
        assert_eq!(config.refresh_cookie().name, "refreshToken");
    }
}
