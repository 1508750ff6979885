//! # ApiError
//!
//! Maps the domain taxonomy onto status codes. The body is always
//! `{"error": "<message>"}`; internal causes are never part of it.

use std::borrow::Cow;

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use domains::{DomainError, ValidationError};
use thiserror::Error;
use tracing::debug;

use crate::dto::ErrorBody;

#[derive(Debug, Error)]
#[error("{status}: {message}")]
pub struct ApiError {
    status: StatusCode,
    message: Cow<'static, str>,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<Cow<'static, str>>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn unauthorized(message: &'static str) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Thread creation answers an oversized tag list with 413 rather than 400.
    pub fn on_thread_create(err: DomainError) -> Self {
        match err {
            DomainError::Validation(rule @ ValidationError::TooManyTags { .. }) => {
                Self::new(StatusCode::PAYLOAD_TOO_LARGE, rule.to_string())
            }
            other => other.into(),
        }
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Validation(rule) => Self::new(StatusCode::BAD_REQUEST, rule.to_string()),
            DomainError::Unauthorized(message) => Self::new(StatusCode::UNAUTHORIZED, message),
            DomainError::Forbidden(_) => Self::new(
                StatusCode::FORBIDDEN,
                "only the creator may modify this resource",
            ),
            DomainError::NotFound { entity, .. } => {
                Self::new(StatusCode::NOT_FOUND, format!("{entity} not found"))
            }
            DomainError::Conflict(message) => Self::new(StatusCode::BAD_REQUEST, message),
            DomainError::Internal(_) => {
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, "internal server error")
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        debug!(reason = %rejection.body_text(), "request body rejected");
        Self::new(
            StatusCode::BAD_REQUEST,
            ValidationError::MalformedPayload.to_string(),
        )
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(ErrorBody {
            error: &self.message,
        });
        (self.status, body).into_response()
    }
}
