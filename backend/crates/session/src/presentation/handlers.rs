//! HTTP Handlers

use axum::Json;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{AppendHeaders, IntoResponse};
use std::sync::Arc;

use crate::application::config::SessionConfig;
use crate::application::{LoginInput, LoginUseCase, LogoutUseCase, RefreshUseCase};
use crate::domain::repository::{RefreshTokenRepository, UserRepository};
use crate::domain::token::TokenIssuer;
use crate::error::SessionResult;
use crate::presentation::dto::{LoginRequest, LoginResponse, RefreshResponse, UserSummary};

/// Shared state for session handlers
pub struct SessionAppState<R, T>
where
    R: UserRepository + RefreshTokenRepository + Clone + Send + Sync + 'static,
    T: TokenIssuer + 'static,
{
    pub repo: Arc<R>,
    pub issuer: Arc<T>,
    pub config: Arc<SessionConfig>,
}

impl<R, T> Clone for SessionAppState<R, T>
where
    R: UserRepository + RefreshTokenRepository + Clone + Send + Sync + 'static,
    T: TokenIssuer + 'static,
{
    fn clone(&self) -> Self {
        Self {
            repo: self.repo.clone(),
            issuer: self.issuer.clone(),
            config: self.config.clone(),
        }
    }
}

// ============================================================================
// Login
// ============================================================================

/// POST /api/v1/auth/login
///
/// The rate-limit middleware runs before this handler; a throttled
/// client never reaches it.
pub async fn login<R, T>(
    State(state): State<SessionAppState<R, T>>,
    Json(req): Json<LoginRequest>,
) -> SessionResult<impl IntoResponse>
where
    R: UserRepository + RefreshTokenRepository + Clone + Send + Sync + 'static,
    T: TokenIssuer + 'static,
{
    let use_case = LoginUseCase::new(
        state.repo.clone(),
        state.issuer.clone(),
        state.config.clone(),
    );

    let output = use_case
        .execute(LoginInput {
            email: req.email,
            password: req.password,
        })
        .await?;

    let user = UserSummary::from(&output.user);

    // Each cookie carries its own token's lifetime
    let cookies = AppendHeaders([
        (
            header::SET_COOKIE,
            state
                .config
                .access_cookie()
                .build_set_cookie(&output.access_token),
        ),
        (
            header::SET_COOKIE,
            state
                .config
                .refresh_cookie()
                .build_set_cookie(&output.refresh_token),
        ),
    ]);

    Ok((
        StatusCode::OK,
        cookies,
        Json(LoginResponse {
            user,
            access_token: output.access_token,
            refresh_token: output.refresh_token,
        }),
    ))
}

// ============================================================================
// Refresh
// ============================================================================

/// POST /api/v1/auth/refresh
pub async fn refresh<R, T>(
    State(state): State<SessionAppState<R, T>>,
    headers: HeaderMap,
) -> SessionResult<impl IntoResponse>
where
    R: UserRepository + RefreshTokenRepository + Clone + Send + Sync + 'static,
    T: TokenIssuer + 'static,
{
    let token = platform::cookie::extract_cookie(&headers, &state.config.refresh_cookie_name);

    let use_case = RefreshUseCase::new(state.repo.clone(), state.issuer.clone());
    let output = use_case.execute(token.as_deref()).await?;

    let user = UserSummary::from(&output.user);

    let cookie = state
        .config
        .access_cookie()
        .build_set_cookie(&output.access_token);

    Ok((
        StatusCode::OK,
        [(header::SET_COOKIE, cookie)],
        Json(RefreshResponse {
            user,
            access_token: output.access_token,
        }),
    ))
}

// ============================================================================
// Logout
// ============================================================================

/// POST /api/v1/auth/logout
///
/// Always succeeds and always expires both cookies, whatever the
/// presented token looks like.
pub async fn logout<R, T>(
    State(state): State<SessionAppState<R, T>>,
    headers: HeaderMap,
) -> impl IntoResponse
where
    R: UserRepository + RefreshTokenRepository + Clone + Send + Sync + 'static,
    T: TokenIssuer + 'static,
{
    let token = platform::cookie::extract_cookie(&headers, &state.config.refresh_cookie_name);

    let use_case = LogoutUseCase::new(state.repo.clone(), state.issuer.clone());
    use_case.execute(token.as_deref()).await;

    let expired_cookies = AppendHeaders([
        (
            header::SET_COOKIE,
            state.config.access_cookie().build_delete_cookie(),
        ),
        (
            header::SET_COOKIE,
            state.config.refresh_cookie().build_delete_cookie(),
        ),
    ]);

    (StatusCode::OK, expired_cookies)
}
