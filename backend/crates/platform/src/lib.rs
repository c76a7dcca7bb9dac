//! Platform Crate - Technical Infrastructure
//!
//! This crate provides shared technical foundations:
//! - Cryptographic utilities (random bytes, constant-time comparison)
//! - Password hashing (Argon2id, PHC string format)
//! - Cookie management
//! - Client identification
//! - Rate limiting

pub mod client;
pub mod cookie;
pub mod crypto;
pub mod password;
pub mod rate_limit;
