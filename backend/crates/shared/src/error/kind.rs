//! Error Kind - Classification of application errors
//!
//! Each kind maps to an HTTP status code and a default wire code.

/// Error classification
///
/// The closed set of failure classes this application can surface.
/// Kinds map one-to-one onto HTTP status codes; the wire code is the
/// machine-readable default used when a caller does not override it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// 400 - Malformed or invalid request
    BadRequest,
    /// 401 - Missing or invalid credentials
    Unauthorized,
    /// 403 - Authenticated but not allowed
    Forbidden,
    /// 404 - Resource does not exist
    NotFound,
    /// 409 - State conflict (duplicate key etc.)
    Conflict,
    /// 429 - Request rate exceeded
    TooManyRequests,
    /// 500 - Unexpected internal failure
    InternalServerError,
    /// 503 - Dependency unavailable
    ServiceUnavailable,
}

impl ErrorKind {
    /// HTTP status code per RFC 9110
    #[inline]
    pub const fn status_code(&self) -> u16 {
        match self {
            ErrorKind::BadRequest => 400,
            ErrorKind::Unauthorized => 401,
            ErrorKind::Forbidden => 403,
            ErrorKind::NotFound => 404,
            ErrorKind::Conflict => 409,
            ErrorKind::TooManyRequests => 429,
            ErrorKind::InternalServerError => 500,
            ErrorKind::ServiceUnavailable => 503,
        }
    }

    /// Standard reason phrase
    #[inline]
    pub const fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::BadRequest => "Bad Request",
            ErrorKind::Unauthorized => "Unauthorized",
            ErrorKind::Forbidden => "Forbidden",
            ErrorKind::NotFound => "Not Found",
            ErrorKind::Conflict => "Conflict",
            ErrorKind::TooManyRequests => "Too Many Requests",
            ErrorKind::InternalServerError => "Internal Server Error",
            ErrorKind::ServiceUnavailable => "Service Unavailable",
        }
    }

    /// Default machine-readable wire code
    ///
    /// Domain errors usually override this with a more specific code
    /// (e.g. `NOT_FOUND_EMAIL`); this is the fallback.
    #[inline]
    pub const fn code(&self) -> &'static str {
        match self {
            ErrorKind::BadRequest => "BAD_REQUEST",
            ErrorKind::Unauthorized => "UNAUTHORIZED",
            ErrorKind::Forbidden => "FORBIDDEN",
            ErrorKind::NotFound => "NOT_FOUND",
            ErrorKind::Conflict => "CONFLICT",
            ErrorKind::TooManyRequests => "TOO_MANY_REQUESTS",
            ErrorKind::InternalServerError => "INTERNAL_ERROR",
            ErrorKind::ServiceUnavailable => "SERVICE_UNAVAILABLE",
        }
    }

    /// 5xx errors should be logged server-side
    #[inline]
    pub const fn is_server_error(&self) -> bool {
        self.status_code() >= 500
    }

    /// 4xx errors are caller mistakes
    #[inline]
    pub const fn is_client_error(&self) -> bool {
        let code = self.status_code();
        code >= 400 && code < 500
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(ErrorKind::BadRequest.status_code(), 400);
        assert_eq!(ErrorKind::Unauthorized.status_code(), 401);
        assert_eq!(ErrorKind::Forbidden.status_code(), 403);
        assert_eq!(ErrorKind::NotFound.status_code(), 404);
        assert_eq!(ErrorKind::Conflict.status_code(), 409);
        assert_eq!(ErrorKind::TooManyRequests.status_code(), 429);
        assert_eq!(ErrorKind::InternalServerError.status_code(), 500);
        assert_eq!(ErrorKind::ServiceUnavailable.status_code(), 503);
    }

    #[test]
    fn test_default_codes() {
        assert_eq!(ErrorKind::TooManyRequests.code(), "TOO_MANY_REQUESTS");
        assert_eq!(ErrorKind::Unauthorized.code(), "UNAUTHORIZED");
    }

    #[test]
    fn test_is_server_error() {
        assert!(!ErrorKind::BadRequest.is_server_error());
        assert!(!ErrorKind::NotFound.is_server_error());
        assert!(ErrorKind::InternalServerError.is_server_error());
        assert!(ErrorKind::ServiceUnavailable.is_server_error());
    }

    #[test]
    fn test_is_client_error() {
        assert!(ErrorKind::BadRequest.is_client_error());
        assert!(ErrorKind::TooManyRequests.is_client_error());
        assert!(!ErrorKind::InternalServerError.is_client_error());
    }
}
