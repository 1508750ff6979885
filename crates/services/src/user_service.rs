//! # UserService
//!
//! Registration, login and bearer-token verification.

use std::sync::Arc;

use domains::{
    AuthSession, DomainError, DomainResult, PasswordHasher, TokenService, UserRepository,
};
use tracing::{info, instrument};

use crate::log_failure;
use crate::validation::{validate_password, validate_username};

const BAD_CREDENTIALS: &str = "incorrect username or password";

pub struct UserService {
    users: Arc<dyn UserRepository>,
    hasher: Arc<dyn PasswordHasher>,
    tokens: Arc<dyn TokenService>,
}

impl UserService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        hasher: Arc<dyn PasswordHasher>,
        tokens: Arc<dyn TokenService>,
    ) -> Self {
        Self {
            users,
            hasher,
            tokens,
        }
    }

    /// Creates an account and signs the caller in.
    #[instrument(name = "register", skip_all, fields(username = %raw_username.trim()))]
    pub async fn register(&self, raw_username: &str, password: &str) -> DomainResult<AuthSession> {
        let username = validate_username(raw_username)
            .and_then(|username| validate_password(password).map(|_| username))
            .map_err(DomainError::from)
            .inspect_err(log_failure)?;

        let hash = self.hasher.hash(password).await.inspect_err(log_failure)?;
        self.users
            .insert_user(&username, &hash)
            .await
            .inspect_err(log_failure)?;

        let token = self.tokens.issue(&username).inspect_err(log_failure)?;
        info!("user created");
        Ok(AuthSession { username, token })
    }

    /// Unknown usernames and wrong passwords produce the same `Unauthorized`.
    #[instrument(name = "login", skip_all, fields(username = %raw_username.trim()))]
    pub async fn login(&self, raw_username: &str, password: &str) -> DomainResult<AuthSession> {
        let username = raw_username.trim();
        let user = self
            .users
            .find_user(username)
            .await
            .inspect_err(log_failure)?
            .ok_or_else(|| DomainError::Unauthorized(BAD_CREDENTIALS.into()))
            .inspect_err(log_failure)?;

        let matches = self
            .hasher
            .verify(password, &user.password_hash)
            .await
            .inspect_err(log_failure)?;
        if !matches {
            let err = DomainError::Unauthorized(BAD_CREDENTIALS.into());
            log_failure(&err);
            return Err(err);
        }

        let token = self.tokens.issue(&user.username).inspect_err(log_failure)?;
        info!("user logged in");
        Ok(AuthSession {
            username: user.username,
            token,
        })
    }

    /// Resolves a bearer token to its principal.
    pub fn authenticate(&self, token: &str) -> DomainResult<String> {
        self.tokens.verify(token)
    }
}
