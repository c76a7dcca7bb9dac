//! Session Router

use axum::{Router, middleware, routing::post};
use std::sync::Arc;

use platform::rate_limit::FixedWindowLimiter;

use crate::application::config::SessionConfig;
use crate::domain::repository::{RefreshTokenRepository, UserRepository};
use crate::domain::token::TokenIssuer;
use crate::infra::jwt::JwtTokenIssuer;
use crate::infra::postgres::PgSessionRepository;
use crate::presentation::handlers::{self, SessionAppState};
use crate::presentation::middleware::{RateLimitState, rate_limit_login};

/// Create the session router with PostgreSQL repository and JWT issuer
pub fn session_router(
    repo: PgSessionRepository,
    issuer: JwtTokenIssuer,
    config: SessionConfig,
    limiter: FixedWindowLimiter,
) -> Router {
    session_router_generic(repo, issuer, config, limiter)
}

/// Create a generic session router for any repository/issuer pair
pub fn session_router_generic<R, T>(
    repo: R,
    issuer: T,
    config: SessionConfig,
    limiter: FixedWindowLimiter,
) -> Router
where
    R: UserRepository + RefreshTokenRepository + Clone + Send + Sync + 'static,
    T: TokenIssuer + 'static,
{
    let state = SessionAppState {
        repo: Arc::new(repo),
        issuer: Arc::new(issuer),
        config: Arc::new(config),
    };

    let rate_limit_state = RateLimitState {
        limiter: Arc::new(limiter),
    };

    Router::new()
        .route(
            "/login",
            post(handlers::login::<R, T>).layer(middleware::from_fn_with_state(
                rate_limit_state,
                rate_limit_login,
            )),
        )
        .route("/refresh", post(handlers::refresh::<R, T>))
        .route("/logout", post(handlers::logout::<R, T>))
        .with_state(state)
}
