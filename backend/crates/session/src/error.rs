//! Session Error Types
//!
//! This module provides session-specific error variants that integrate
//! with the unified `kernel::error::AppError` system. Each variant maps
//! to a stable wire code that API clients branch on.

use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

/// Session-specific result type alias
pub type SessionResult<T> = Result<T, SessionError>;

/// Session-specific error variants
#[derive(Debug, Error)]
pub enum SessionError {
    /// No account registered under the presented email
    #[error("No account with that email")]
    NotFoundEmail,

    /// Credential did not match
    #[error("Wrong password")]
    WrongPassword,

    /// Refresh token missing, invalid, expired, or superseded.
    /// Deliberately covers every refresh validation failure so the
    /// caller cannot tell which check rejected it.
    #[error("Invalid or expired session")]
    UnauthorizedUser,

    /// The user was deleted after the token was issued
    #[error("User no longer exists")]
    NotFoundUser,

    /// Login attempts exceeded the per-client window
    #[error("Too many login attempts. Please try again later")]
    RateLimited,

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl SessionError {
    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            SessionError::NotFoundEmail | SessionError::NotFoundUser => ErrorKind::NotFound,
            SessionError::WrongPassword | SessionError::UnauthorizedUser => ErrorKind::Unauthorized,
            SessionError::RateLimited => ErrorKind::TooManyRequests,
            SessionError::Database(_) | SessionError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    /// Stable wire code for this error
    pub fn code(&self) -> &'static str {
        match self {
            SessionError::NotFoundEmail => "NOT_FOUND_EMAIL",
            SessionError::WrongPassword => "WRONG_PASSWORD",
            SessionError::UnauthorizedUser => "UNAUTHORIZED_USER",
            SessionError::NotFoundUser => "NOT_FOUND_USER",
            SessionError::RateLimited => "RATE_LIMITED",
            SessionError::Database(_) | SessionError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        self.kind().status_code()
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            SessionError::Database(e) => {
                tracing::error!(error = %e, "Session database error");
            }
            SessionError::Internal(msg) => {
                tracing::error!(message = %msg, "Session internal error");
            }
            SessionError::WrongPassword => {
                tracing::warn!("Invalid login attempt");
            }
            SessionError::UnauthorizedUser => {
                tracing::debug!("Refresh token rejected");
            }
            _ => {
                tracing::debug!(error = %self, "Session error");
            }
        }
    }
}

impl IntoResponse for SessionError {
    fn into_response(self) -> Response {
        self.log();

        let app_error = match self {
            // Keep the kernel's database status mapping (unavailable vs
            // internal); the wire code stays generic.
            SessionError::Database(e) => AppError::from(e),
            other => AppError::new(other.kind(), other.to_string()).with_code(other.code()),
        };

        app_error.into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_codes() {
        assert_eq!(SessionError::NotFoundEmail.code(), "NOT_FOUND_EMAIL");
        assert_eq!(SessionError::WrongPassword.code(), "WRONG_PASSWORD");
        assert_eq!(SessionError::UnauthorizedUser.code(), "UNAUTHORIZED_USER");
        assert_eq!(SessionError::NotFoundUser.code(), "NOT_FOUND_USER");
        assert_eq!(SessionError::RateLimited.code(), "RATE_LIMITED");
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(SessionError::NotFoundEmail.status_code(), 404);
        assert_eq!(SessionError::WrongPassword.status_code(), 401);
        assert_eq!(SessionError::UnauthorizedUser.status_code(), 401);
        assert_eq!(SessionError::NotFoundUser.status_code(), 404);
        assert_eq!(SessionError::RateLimited.status_code(), 429);
        assert_eq!(
            SessionError::Internal("boom".to_string()).status_code(),
            500
        );
    }
}
