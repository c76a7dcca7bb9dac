//! API Server Entry Point
//!
//! Application entry point and server initialization.
//! Uses `anyhow` for startup errors; request-level failures go through
//! `kernel::error::AppError`.

use axum::{
    Router, http,
    http::{Method, header},
};
use platform::rate_limit::{FixedWindowLimiter, RateLimitConfig};
use session::{
    JwtTokenIssuer, PgSessionRepository, SessionConfig, session_router,
};
use sqlx::postgres::PgPoolOptions;
use std::env;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "api=info,session=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Database connection
    let database_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set in environment");

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await?;

    tracing::info!("Connected to database");

    // Run migrations
    sqlx::migrate!("../../../database/migrations")
        .run(&pool)
        .await?;

    tracing::info!("Migrations completed");

    // Startup cleanup: remove refresh tokens past their natural expiry.
    // Errors here should not prevent server startup
    let repo = PgSessionRepository::new(pool.clone());
    match repo.cleanup_expired().await {
        Ok(deleted) => {
            tracing::info!(tokens_deleted = deleted, "Refresh token cleanup completed");
        }
        Err(e) => {
            tracing::warn!(error = %e, "Refresh token cleanup failed, continuing anyway");
        }
    }

    // Session configuration
    let session_config = if cfg!(debug_assertions) {
        SessionConfig::development()
    } else {
        // In production, the signing secret comes from the environment
        let secret = env::var("JWT_SECRET").expect("JWT_SECRET must be set in production");
        SessionConfig {
            jwt_secret: secret.into_bytes(),
            ..SessionConfig::default()
        }
    };

    let issuer = JwtTokenIssuer::from_config(&session_config);

    // Login rate limiter: 5 attempts per 15 minutes per client
    let limiter = FixedWindowLimiter::new(RateLimitConfig::default());

    // CORS configuration
    let frontend_origins = env::var("FRONTEND_ORIGINS")
        .unwrap_or_else(|_| "http://localhost:3000,http://127.0.0.1:3000".to_string());

    let allowed_origins: Vec<http::HeaderValue> = frontend_origins
        .split(',')
        .filter_map(|origin| origin.trim().parse().ok())
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods(AllowMethods::list([
            Method::GET,
            Method::POST,
            Method::OPTIONS,
        ]))
        .allow_headers(AllowHeaders::list([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::ACCEPT,
        ]))
        .allow_credentials(true);

    // Build router
    let app = Router::new()
        .nest(
            "/api/v1/auth",
            session_router(repo, issuer, session_config, limiter),
        )
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], 8080));
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
