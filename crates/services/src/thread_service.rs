//! # ThreadService
//!
//! Coordinates thread reads and writes. Validation happens here, before the
//! repository is called; atomicity and the ownership check live in the
//! repository so that each mutation is a single transaction.

use std::sync::Arc;

use domains::{
    DomainError, DomainResult, Page, TagSummary, Thread, ThreadId, ThreadPage, ThreadRepository,
    ThreadSortOrder,
};
use tracing::{info, instrument};

use crate::log_failure;
use crate::search::parse_search_query;
use crate::validation::validate_thread;

/// Raw title, body and tags as received from a client.
#[derive(Debug, Clone, Default)]
pub struct ThreadInput {
    pub title: String,
    pub body: String,
    pub tags: Vec<String>,
}

/// Raw search parameters; every field is optional and leniently parsed.
#[derive(Debug, Clone, Default)]
pub struct SearchRequest {
    pub q: Option<String>,
    pub order: Option<String>,
    pub page: Option<String>,
}

pub struct ThreadService {
    repo: Arc<dyn ThreadRepository>,
}

impl ThreadService {
    pub fn new(repo: Arc<dyn ThreadRepository>) -> Self {
        Self { repo }
    }

    /// Creates a thread and returns it hydrated.
    ///
    /// A failure while reading the thread back is reported as `Internal` even
    /// though the write has committed.
    #[instrument(name = "create_thread", skip_all, fields(principal = %principal))]
    pub async fn create_thread(&self, principal: &str, input: &ThreadInput) -> DomainResult<Thread> {
        let draft = validate_thread(&input.title, &input.body, &input.tags)
            .map_err(DomainError::from)
            .inspect_err(log_failure)?;

        let id = self
            .repo
            .insert_thread(principal, &draft)
            .await
            .inspect_err(log_failure)?;
        info!(thread_id = %id, "thread created");

        self.read_back(id).await
    }

    #[instrument(name = "update_thread", skip_all, fields(principal = %principal, thread_id = %id))]
    pub async fn update_thread(
        &self,
        principal: &str,
        id: ThreadId,
        input: &ThreadInput,
    ) -> DomainResult<Thread> {
        let draft = validate_thread(&input.title, &input.body, &input.tags)
            .map_err(DomainError::from)
            .inspect_err(log_failure)?;

        self.repo
            .update_thread(id, principal, &draft)
            .await
            .inspect_err(log_failure)?;
        info!("thread updated");

        self.read_back(id).await
    }

    #[instrument(name = "delete_thread", skip_all, fields(principal = %principal, thread_id = %id))]
    pub async fn delete_thread(&self, principal: &str, id: ThreadId) -> DomainResult<()> {
        self.repo
            .delete_thread(id, principal)
            .await
            .inspect_err(log_failure)?;
        info!("thread deleted");
        Ok(())
    }

    #[instrument(name = "get_thread", skip_all, fields(thread_id = %id))]
    pub async fn get_thread(&self, id: ThreadId) -> DomainResult<Thread> {
        self.repo
            .find_thread(id)
            .await
            .and_then(|found| found.ok_or_else(|| DomainError::not_found("thread", id)))
            .inspect_err(log_failure)
    }

    /// Runs a search. An empty query matches every thread.
    #[instrument(name = "search_threads", skip_all, fields(q = request.q.as_deref().unwrap_or("")))]
    pub async fn search_threads(&self, request: &SearchRequest) -> DomainResult<ThreadPage> {
        let query = parse_search_query(request.q.as_deref().unwrap_or("")).into_query(
            ThreadSortOrder::parse_or_default(request.order.as_deref()),
            Page::parse_or_first(request.page.as_deref()),
        );

        let page = self
            .repo
            .search_threads(&query)
            .await
            .inspect_err(log_failure)?;
        info!(
            total = page.total_threads,
            returned = page.threads.len(),
            "threads retrieved"
        );
        Ok(page)
    }

    pub async fn list_tags(&self) -> DomainResult<Vec<TagSummary>> {
        self.repo.list_tags().await.inspect_err(log_failure)
    }

    async fn read_back(&self, id: ThreadId) -> DomainResult<Thread> {
        let hydrated = match self.repo.find_thread(id).await {
            Ok(Some(thread)) => Ok(thread),
            Ok(None) => Err(DomainError::Internal(format!(
                "thread {id} missing on read-back"
            ))),
            Err(err) => Err(DomainError::internal("thread read-back failed", err)),
        };
        hydrated.inspect_err(log_failure)
    }
}
