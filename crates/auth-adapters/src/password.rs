//! Argon2id password hashing.
//!
//! Hashing is CPU-bound and deliberately slow, so both operations run on the
//! blocking pool instead of a runtime worker.

use argon2::password_hash::{
    rand_core::OsRng, PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString,
};
use argon2::Argon2;
use async_trait::async_trait;
use domains::{DomainError, DomainResult, PasswordHasher};
use tokio::task;

#[derive(Debug, Clone, Default)]
pub struct Argon2PasswordHasher;

impl Argon2PasswordHasher {
    pub fn new() -> Self {
        Self
    }
}

fn hash_blocking(password: &str) -> DomainResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|err| DomainError::internal("hash password", err))
}

fn verify_blocking(password: &str, stored: &str) -> DomainResult<bool> {
    let parsed =
        PasswordHash::new(stored).map_err(|err| DomainError::internal("parse password hash", err))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

#[async_trait]
impl PasswordHasher for Argon2PasswordHasher {
    async fn hash(&self, password: &str) -> DomainResult<String> {
        let password = password.to_owned();
        task::spawn_blocking(move || hash_blocking(&password))
            .await
            .map_err(|err| DomainError::internal("password hashing task", err))?
    }

    async fn verify(&self, password: &str, hash: &str) -> DomainResult<bool> {
        let password = password.to_owned();
        let hash = hash.to_owned();
        task::spawn_blocking(move || verify_blocking(&password, &hash))
            .await
            .map_err(|err| DomainError::internal("password verification task", err))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn hash_then_verify() {
        let hasher = Argon2PasswordHasher::new();
        let hash = hasher.hash("secret1").await.unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(hasher.verify("secret1", &hash).await.unwrap());
        assert!(!hasher.verify("secret2", &hash).await.unwrap());
    }

    #[tokio::test]
    async fn salts_differ_between_hashes() {
        let hasher = Argon2PasswordHasher::new();
        let first = hasher.hash("secret1").await.unwrap();
        let second = hasher.hash("secret1").await.unwrap();
        assert_ne!(first, second);
    }

    #[tokio::test]
    async fn corrupt_stored_hash_is_internal() {
        let err = Argon2PasswordHasher::new()
            .verify("secret1", "not-a-phc-string")
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Internal(_)));
    }
}
