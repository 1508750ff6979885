use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use domains::{Comment, CommentId, CommentPage, ThreadId};

use super::{body, parse_id};
use crate::dto::{CommentCreateRequest, CommentListParams, CommentUpdateRequest};
use crate::error::ApiError;
use crate::extract::AuthUser;
use crate::state::AppState;

/// `POST comment/create`
pub async fn create_comment(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    payload: Result<Json<CommentCreateRequest>, JsonRejection>,
) -> Result<Json<Comment>, ApiError> {
    let req = body(payload)?;
    let comment = state
        .comments
        .create_comment(&principal, &req.thread_id, &req.body)
        .await?;
    Ok(Json(comment))
}

/// `PUT comment/{id}`
pub async fn update_comment(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    Path(raw_id): Path<String>,
    payload: Result<Json<CommentUpdateRequest>, JsonRejection>,
) -> Result<Json<Comment>, ApiError> {
    let id: CommentId = parse_id(&raw_id)?;
    let req = body(payload)?;
    let comment = state.comments.update_comment(&principal, id, &req.body).await?;
    Ok(Json(comment))
}

/// `DELETE comment/{id}`
pub async fn delete_comment(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    Path(raw_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id: CommentId = parse_id(&raw_id)?;
    state.comments.delete_comment(&principal, id).await?;
    Ok(StatusCode::OK)
}

/// `GET thread/{id}/comments`
pub async fn list_comments(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    Query(params): Query<CommentListParams>,
) -> Result<Json<CommentPage>, ApiError> {
    let thread_id: ThreadId = parse_id(&raw_id)?;
    let page = state
        .comments
        .list_comments(thread_id, params.order.as_deref(), params.p.as_deref())
        .await?;
    Ok(Json(page))
}
