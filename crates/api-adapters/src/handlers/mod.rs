//! # Handlers
//!
//! Each handler parses its input, calls one service method and serializes the
//! result. Bodies arrive as `Result<Json<T>, JsonRejection>` so malformed JSON
//! gets the same error envelope as every other failure.

pub mod comments;
pub mod health;
pub mod tags;
pub mod threads;
pub mod users;

use std::str::FromStr;

use axum::extract::rejection::JsonRejection;
use axum::Json;
use domains::{DomainError, ValidationError};

use crate::error::ApiError;

pub(crate) fn body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    payload.map(|Json(inner)| inner).map_err(ApiError::from)
}

pub(crate) fn parse_id<T>(raw: &str) -> Result<T, ApiError>
where
    T: FromStr<Err = ValidationError>,
{
    raw.parse::<T>()
        .map_err(|rule| ApiError::from(DomainError::from(rule)))
}
