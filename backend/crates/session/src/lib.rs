//! Session (Authentication) Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Entities, value objects, repository and token traits
//! - `application/` - Use cases and application services
//! - `infra/` - Database and token-signing implementations
//! - `presentation/` - HTTP handlers, DTOs, router, middleware
//!
//! ## Features
//! - Email + password login issuing access/refresh token pair
//! - Single live refresh token per user (a new login supersedes the old)
//! - Access-token reissue via refresh cookie (no refresh rotation)
//! - Best-effort logout that always clears cookies
//! - Transparent migration of legacy plain-text credentials to Argon2id
//! - Per-client fixed-window rate limiting on the login path
//!
//! ## Security Model
//! - Tokens are HS256 JWTs carrying only the subject id and expiry
//! - Refresh tokens are honored only while they match the stored record
//! - Stored-vs-presented token comparison is constant-time
//! - Credentials and tokens never appear in logs

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

mod tests;

// Re-exports for convenience
pub use application::config::SessionConfig;
pub use error::{SessionError, SessionResult};
pub use infra::jwt::JwtTokenIssuer;
pub use infra::postgres::PgSessionRepository;
pub use presentation::router::{session_router, session_router_generic};
