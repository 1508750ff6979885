//! # DomainError
//!
//! Centralized error taxonomy for the forum.
//! Adapters translate their library errors into these variants; the HTTP layer
//! maps each variant to a status code and a static message.

use thiserror::Error;

/// The primary error type for all domain and service operations.
#[derive(Error, Debug)]
pub enum DomainError {
    /// Malformed or out-of-range input. Never reaches persistence.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Missing, invalid or expired credentials.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// The principal is authenticated but does not own the resource.
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// Referenced thread or comment does not exist.
    #[error("{entity} not found with ID {id}")]
    NotFound { entity: &'static str, id: String },

    /// Resource already exists (e.g. duplicate username).
    #[error("conflict: {0}")]
    Conflict(String),

    /// Infrastructure failure (database, transaction, token signing).
    #[error("internal service error: {0}")]
    Internal(String),
}

impl DomainError {
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    pub fn internal(context: &str, source: impl std::fmt::Display) -> Self {
        Self::Internal(format!("{context}: {source}"))
    }
}

/// Individual input rules, kept distinct so callers can react to a specific one
/// (the thread-create endpoint answers `TooManyTags` with 413).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("title must not be empty")]
    EmptyTitle,
    #[error("title exceeds {max} characters")]
    TitleTooLong { max: usize },
    #[error("body must not be empty")]
    EmptyBody,
    #[error("body exceeds {max} characters")]
    BodyTooLong { max: usize },
    #[error("at most {max} tags allowed, got {got}")]
    TooManyTags { max: usize, got: usize },
    #[error("malformed {entity} id")]
    InvalidId { entity: &'static str },
    #[error("username must be 1-{max} characters without whitespace")]
    InvalidUsername { max: usize },
    #[error("password must be at least {min} characters")]
    PasswordTooShort { min: usize },
    #[error("malformed request payload")]
    MalformedPayload,
}

/// A specialized Result type for forum logic.
pub type DomainResult<T> = std::result::Result<T, DomainError>;
