use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use domains::AuthSession;

use super::body;
use crate::dto::CredentialsRequest;
use crate::error::ApiError;
use crate::state::AppState;

/// `POST user/create`
pub async fn create_user(
    State(state): State<AppState>,
    payload: Result<Json<CredentialsRequest>, JsonRejection>,
) -> Result<Json<AuthSession>, ApiError> {
    let req = body(payload)?;
    let session = state.users.register(&req.username, &req.password).await?;
    Ok(Json(session))
}

/// `POST user/login`
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<CredentialsRequest>, JsonRejection>,
) -> Result<Json<AuthSession>, ApiError> {
    let req = body(payload)?;
    let session = state.users.login(&req.username, &req.password).await?;
    Ok(Json(session))
}
