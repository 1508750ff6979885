//! # CommentService
//!
//! Comments are flat replies. The thread id arrives as raw text from the
//! request body, so it is parsed here along with the body validation.

use std::sync::Arc;

use domains::{
    Comment, CommentId, CommentPage, CommentRepository, CommentSortOrder, DomainError,
    DomainResult, Page, ThreadId,
};
use tracing::{info, instrument};

use crate::log_failure;
use crate::validation::validate_body;

pub struct CommentService {
    repo: Arc<dyn CommentRepository>,
}

impl CommentService {
    pub fn new(repo: Arc<dyn CommentRepository>) -> Self {
        Self { repo }
    }

    #[instrument(name = "create_comment", skip_all, fields(principal = %principal, thread_id = %raw_thread_id))]
    pub async fn create_comment(
        &self,
        principal: &str,
        raw_thread_id: &str,
        body: &str,
    ) -> DomainResult<Comment> {
        let thread_id = raw_thread_id
            .parse::<ThreadId>()
            .map_err(DomainError::from)
            .inspect_err(log_failure)?;
        let body = validate_body(body)
            .map_err(DomainError::from)
            .inspect_err(log_failure)?;

        let comment = self
            .repo
            .insert_comment(thread_id, principal, &body)
            .await
            .inspect_err(log_failure)?;
        info!(comment_id = %comment.id, "comment created");
        Ok(comment)
    }

    #[instrument(name = "update_comment", skip_all, fields(principal = %principal, comment_id = %id))]
    pub async fn update_comment(
        &self,
        principal: &str,
        id: CommentId,
        body: &str,
    ) -> DomainResult<Comment> {
        let body = validate_body(body)
            .map_err(DomainError::from)
            .inspect_err(log_failure)?;

        let comment = self
            .repo
            .update_comment(id, principal, &body)
            .await
            .inspect_err(log_failure)?;
        info!("comment updated");
        Ok(comment)
    }

    #[instrument(name = "delete_comment", skip_all, fields(principal = %principal, comment_id = %id))]
    pub async fn delete_comment(&self, principal: &str, id: CommentId) -> DomainResult<()> {
        self.repo
            .delete_comment(id, principal)
            .await
            .inspect_err(log_failure)?;
        info!("comment deleted");
        Ok(())
    }

    /// Lists one page of a thread's comments. An unknown thread yields an empty page.
    #[instrument(name = "list_comments", skip_all, fields(thread_id = %thread_id))]
    pub async fn list_comments(
        &self,
        thread_id: ThreadId,
        order: Option<&str>,
        page: Option<&str>,
    ) -> DomainResult<CommentPage> {
        let page = self
            .repo
            .list_comments(
                thread_id,
                CommentSortOrder::parse_or_default(order),
                Page::parse_or_first(page),
            )
            .await
            .inspect_err(log_failure)?;
        info!(count = page.count, returned = page.comments.len(), "comments retrieved");
        Ok(page)
    }
}
