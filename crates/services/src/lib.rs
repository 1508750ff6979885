//! # services
//!
//! Business rules of the forum: input validation, search-query parsing and the
//! coordinators that drive the repository ports. Services hold their ports as
//! trait objects so the binary decides which adapters to plug in.

pub mod comment_service;
pub mod search;
pub mod thread_service;
pub mod user_service;
pub mod validation;

pub use comment_service::CommentService;
pub use search::{parse_search_query, ParsedQuery};
pub use thread_service::{SearchRequest, ThreadInput, ThreadService};
pub use user_service::UserService;

use domains::DomainError;

/// Logs a failed operation inside the caller's span. Client faults are
/// warnings; infrastructure faults are errors carrying the low-level cause.
pub(crate) fn log_failure(err: &DomainError) {
    match err {
        DomainError::Internal(cause) => tracing::error!(error = %cause, "operation failed"),
        other => tracing::warn!(error = %other, "operation rejected"),
    }
}
