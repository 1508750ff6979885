//! Bearer-token authentication as an extractor.
//!
//! Handlers that mutate state take an [`AuthUser`] argument; the request is
//! rejected with 401 before the body is read if the token is missing, not a
//! bearer credential, invalid or expired.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;

use crate::error::ApiError;
use crate::state::AppState;

/// The authenticated principal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser(pub String);

/// Returns the token part of an `Authorization: Bearer <token>` value.
pub fn bearer_token(value: &str) -> Option<&str> {
    let (scheme, token) = value.trim().split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .ok_or_else(|| ApiError::unauthorized("missing bearer token"))?
            .to_str()
            .map_err(|_| ApiError::unauthorized("malformed authorization header"))?;
        let token =
            bearer_token(header).ok_or_else(|| ApiError::unauthorized("missing bearer token"))?;

        let username = state.users.authenticate(token)?;
        Ok(AuthUser(username))
    }
}
