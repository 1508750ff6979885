use std::sync::Arc;

use services::{CommentService, ThreadService, UserService};

use crate::metrics::HttpMetrics;

/// Shared state passed to every handler. Cloning only bumps reference counts.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<UserService>,
    pub threads: Arc<ThreadService>,
    pub comments: Arc<CommentService>,
    pub metrics: Arc<HttpMetrics>,
}

impl AppState {
    pub fn new(users: UserService, threads: ThreadService, comments: CommentService) -> Self {
        Self {
            users: Arc::new(users),
            threads: Arc::new(threads),
            comments: Arc::new(comments),
            metrics: Arc::new(HttpMetrics::new()),
        }
    }
}
