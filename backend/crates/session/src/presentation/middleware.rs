//! Rate Limit Middleware
//!
//! Applied to the login route only. A denied request is answered here
//! with 429 and never reaches credential verification or persistence.

use axum::extract::{Request, State};
use axum::http::{HeaderValue, header};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use std::sync::Arc;

use platform::client::client_key;
use platform::rate_limit::FixedWindowLimiter;

use crate::error::SessionError;

/// Middleware state
#[derive(Clone)]
pub struct RateLimitState {
    pub limiter: Arc<FixedWindowLimiter>,
}

/// Gate login attempts per client key
///
/// One token is consumed per admitted attempt regardless of the login
/// outcome. The client key is the forwarded address when present, else
/// the direct connection address.
pub async fn rate_limit_login(
    State(state): State<RateLimitState>,
    req: Request,
    next: Next,
) -> Response {
    let direct_ip = req
        .extensions()
        .get::<axum::extract::ConnectInfo<std::net::SocketAddr>>()
        .map(|info| info.0.ip());

    let key = client_key(req.headers(), direct_ip);
    let decision = state.limiter.check(&key);

    if !decision.allowed {
        tracing::warn!(
            client_key = %key,
            retry_after_secs = decision.retry_after.as_secs(),
            "Login attempt rate limited"
        );

        let mut response = SessionError::RateLimited.into_response();
        if let Ok(value) = HeaderValue::from_str(&decision.retry_after.as_secs().to_string()) {
            response.headers_mut().insert(header::RETRY_AFTER, value);
        }
        return response;
    }

    next.run(req).await
}
