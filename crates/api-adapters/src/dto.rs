//! Request and response bodies that have no domain counterpart.
//!
//! Threads, comments, pages and sessions are serialized straight from the
//! `domains` types. Missing string fields deserialize as empty so that the
//! validation rules, not the JSON parser, decide what is wrong with them.

use domains::TagSummary;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct CredentialsRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct ThreadRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct CommentCreateRequest {
    #[serde(default)]
    pub thread_id: String,
    #[serde(default)]
    pub body: String,
}

#[derive(Debug, Deserialize)]
pub struct CommentUpdateRequest {
    #[serde(default)]
    pub body: String,
}

/// `GET thread/search?q=&order=&p=`
#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
    pub order: Option<String>,
    pub p: Option<String>,
}

/// `GET thread/{id}/comments?order=&p=`
#[derive(Debug, Default, Deserialize)]
pub struct CommentListParams {
    pub order: Option<String>,
    pub p: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct TagsResponse {
    pub tags: Vec<TagSummary>,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody<'a> {
    pub error: &'a str,
}
