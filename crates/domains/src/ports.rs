//! # Ports
//!
//! Any adapter must implement these traits to be wired into the binary.
//!
//! # Developer Note
//! Mutations that require ownership take the principal as an argument so the
//! adapter can fold the creator check into the same statement that performs the
//! write. A failed check yields `Forbidden`, a missing row `NotFound`.

use async_trait::async_trait;

#[cfg(any(test, feature = "testing"))]
use mockall::automock;

use crate::errors::DomainResult;
use crate::models::{
    Comment, CommentId, CommentPage, TagSummary, Thread, ThreadDraft, ThreadId, ThreadPage,
    ThreadQuery, User,
};
use crate::paging::{CommentSortOrder, Page};

/// Account persistence.
#[cfg_attr(any(test, feature = "testing"), automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Fails with `Conflict` when the username is taken.
    async fn insert_user(&self, username: &str, password_hash: &str) -> DomainResult<()>;
    async fn find_user(&self, username: &str) -> DomainResult<Option<User>>;
}

/// Thread persistence, including the thread-tag association.
#[cfg_attr(any(test, feature = "testing"), automock)]
#[async_trait]
pub trait ThreadRepository: Send + Sync {
    /// Inserts the thread, its tags and associations atomically.
    async fn insert_thread(&self, creator: &str, draft: &ThreadDraft) -> DomainResult<ThreadId>;

    /// Replaces title, body and tag set atomically, provided `principal` is the creator.
    async fn update_thread(
        &self,
        id: ThreadId,
        principal: &str,
        draft: &ThreadDraft,
    ) -> DomainResult<()>;

    /// Deletes the thread (cascading to comments and associations) if `principal` is the creator.
    async fn delete_thread(&self, id: ThreadId, principal: &str) -> DomainResult<()>;

    async fn find_thread(&self, id: ThreadId) -> DomainResult<Option<Thread>>;

    /// Returns the requested page and the unpaginated count for the same predicate.
    async fn search_threads(&self, query: &ThreadQuery) -> DomainResult<ThreadPage>;

    async fn list_tags(&self) -> DomainResult<Vec<TagSummary>>;
}

/// Comment persistence.
#[cfg_attr(any(test, feature = "testing"), automock)]
#[async_trait]
pub trait CommentRepository: Send + Sync {
    /// Fails with `NotFound` when the thread does not exist.
    async fn insert_comment(
        &self,
        thread_id: ThreadId,
        creator: &str,
        body: &str,
    ) -> DomainResult<Comment>;

    async fn update_comment(
        &self,
        id: CommentId,
        principal: &str,
        body: &str,
    ) -> DomainResult<Comment>;

    async fn delete_comment(&self, id: CommentId, principal: &str) -> DomainResult<()>;

    async fn list_comments(
        &self,
        thread_id: ThreadId,
        order: CommentSortOrder,
        page: Page,
    ) -> DomainResult<CommentPage>;
}

/// Bearer credential issuance and verification.
#[cfg_attr(any(test, feature = "testing"), automock)]
pub trait TokenService: Send + Sync {
    fn issue(&self, username: &str) -> DomainResult<String>;

    /// Returns the principal encoded in a valid, unexpired token.
    fn verify(&self, token: &str) -> DomainResult<String>;
}

/// Password hashing. Implementations may offload to a blocking pool.
#[cfg_attr(any(test, feature = "testing"), automock)]
#[async_trait]
pub trait PasswordHasher: Send + Sync {
    async fn hash(&self, password: &str) -> DomainResult<String>;
    async fn verify(&self, password: &str, hash: &str) -> DomainResult<bool>;
}
