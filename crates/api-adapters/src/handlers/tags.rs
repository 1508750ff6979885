use axum::extract::State;
use axum::Json;

use crate::dto::TagsResponse;
use crate::error::ApiError;
use crate::state::AppState;

/// `GET tags`: every live tag with the number of threads carrying it.
pub async fn list_tags(State(state): State<AppState>) -> Result<Json<TagsResponse>, ApiError> {
    let tags = state.threads.list_tags().await?;
    Ok(Json(TagsResponse { tags }))
}
