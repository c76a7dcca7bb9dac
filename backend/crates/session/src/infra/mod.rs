//! Infrastructure Layer
//!
//! Database implementations and the token-signing backend.

pub mod jwt;
pub mod postgres;

pub use jwt::JwtTokenIssuer;
pub use postgres::PgSessionRepository;
