//! JWT Token Issuer
//!
//! HS256-signed tokens carrying the subject id and expiry. Access and
//! refresh tokens differ only in lifetime.

use std::time::Duration;

use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use kernel::id::UserId;

use crate::application::config::SessionConfig;
use crate::domain::token::{TokenError, TokenIssuer};

/// JWT claims
#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    /// User UUID
    sub: String,
    /// Issued at (Unix seconds)
    iat: i64,
    /// Expiry (Unix seconds)
    exp: i64,
    /// Random token id; keeps tokens minted within the same second
    /// distinct
    jti: String,
}

/// HS256 token issuer
#[derive(Clone)]
pub struct JwtTokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl JwtTokenIssuer {
    pub fn new(secret: &[u8], access_ttl: Duration, refresh_ttl: Duration) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;

        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
            access_ttl,
            refresh_ttl,
        }
    }

    pub fn from_config(config: &SessionConfig) -> Self {
        Self::new(&config.jwt_secret, config.access_ttl, config.refresh_ttl)
    }

    fn issue(&self, user_id: &UserId, ttl: Duration) -> Result<String, TokenError> {
        let now = Utc::now();
        let ttl = chrono::Duration::from_std(ttl)
            .map_err(|e| TokenError::Signing(format!("Invalid token TTL: {e}")))?;

        let claims = Claims {
            sub: user_id.to_string(),
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
            jti: Uuid::new_v4().to_string(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| TokenError::Signing(e.to_string()))
    }
}

impl TokenIssuer for JwtTokenIssuer {
    fn issue_access(&self, user_id: &UserId) -> Result<String, TokenError> {
        self.issue(user_id, self.access_ttl)
    }

    fn issue_refresh(&self, user_id: &UserId) -> Result<String, TokenError> {
        self.issue(user_id, self.refresh_ttl)
    }

    fn subject_of(&self, token: &str) -> Result<UserId, TokenError> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|_| TokenError::Invalid)?;

        let uuid = Uuid::parse_str(&data.claims.sub).map_err(|_| TokenError::Invalid)?;

        Ok(UserId::from_uuid(uuid))
    }
}
