//! # auth-adapters
//!
//! Implementations of the `TokenService` and `PasswordHasher` ports.
//! Password hashing (Argon2) is always compiled; the bearer-token backend is
//! selected by feature.

pub mod password;

#[cfg(feature = "auth-jwt")]
pub mod jwt;

#[cfg(feature = "auth-jwt")]
pub use jwt::JwtTokenService;
pub use password::Argon2PasswordHasher;
