use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use domains::{DomainError, Thread, ThreadId, ThreadPage};
use services::{SearchRequest, ThreadInput};

use super::{body, parse_id};
use crate::dto::{SearchParams, ThreadRequest};
use crate::error::ApiError;
use crate::extract::AuthUser;
use crate::state::AppState;

impl From<ThreadRequest> for ThreadInput {
    fn from(req: ThreadRequest) -> Self {
        ThreadInput {
            title: req.title,
            body: req.body,
            tags: req.tags,
        }
    }
}

/// `POST thread/create`
pub async fn create_thread(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    payload: Result<Json<ThreadRequest>, JsonRejection>,
) -> Result<Json<Thread>, ApiError> {
    let input = ThreadInput::from(body(payload)?);
    let thread = state
        .threads
        .create_thread(&principal, &input)
        .await
        .map_err(ApiError::on_thread_create)?;
    Ok(Json(thread))
}

/// `GET thread/{id}`. An id that cannot exist is simply not found.
pub async fn get_thread(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Json<Thread>, ApiError> {
    let id: ThreadId = raw_id
        .parse()
        .map_err(|_| ApiError::from(DomainError::not_found("thread", &raw_id)))?;
    Ok(Json(state.threads.get_thread(id).await?))
}

/// `PUT thread/{id}`
pub async fn update_thread(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    Path(raw_id): Path<String>,
    payload: Result<Json<ThreadRequest>, JsonRejection>,
) -> Result<Json<Thread>, ApiError> {
    let id: ThreadId = parse_id(&raw_id)?;
    let input = ThreadInput::from(body(payload)?);
    let thread = state.threads.update_thread(&principal, id, &input).await?;
    Ok(Json(thread))
}

/// `DELETE thread/{id}`
pub async fn delete_thread(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    Path(raw_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id: ThreadId = parse_id(&raw_id)?;
    state.threads.delete_thread(&principal, id).await?;
    Ok(StatusCode::OK)
}

/// `GET thread/search` and `GET thread`
pub async fn search_threads(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<ThreadPage>, ApiError> {
    let request = SearchRequest {
        q: params.q,
        order: params.order,
        page: params.p,
    };
    Ok(Json(state.threads.search_threads(&request).await?))
}
