//! # integration-tests
//!
//! Shared fixtures for the end-to-end suites in `tests/`: an in-memory store
//! behind the repository ports, a trivial password hasher, and a [`TestApp`]
//! that drives the real axum router with `tower::ServiceExt::oneshot`.

pub mod memory;

#[cfg(feature = "web-axum")]
mod harness;

#[cfg(feature = "web-axum")]
pub use harness::{TestApp, TestResponse, BASE, JWT_SECRET, PASSWORD};
pub use memory::InMemoryStore;

use async_trait::async_trait;
use domains::{DomainResult, PasswordHasher};

/// Reversible stand-in for Argon2 so the suites stay fast.
#[derive(Default)]
pub struct PlainHasher;

#[async_trait]
impl PasswordHasher for PlainHasher {
    async fn hash(&self, password: &str) -> DomainResult<String> {
        Ok(format!("plain:{password}"))
    }

    async fn verify(&self, password: &str, hash: &str) -> DomainResult<bool> {
        Ok(hash.strip_prefix("plain:") == Some(password))
    }
}
