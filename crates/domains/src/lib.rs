//! # domains
//!
//! Entities, value types, the error taxonomy and the port traits of the forum.
//! Nothing in this crate performs I/O; adapters implement the ports and the
//! services crate drives them.

pub mod errors;
pub mod models;
pub mod paging;
pub mod ports;

pub use errors::{DomainError, DomainResult, ValidationError};
pub use models::*;
pub use paging::{CommentSortOrder, Page, ThreadSortOrder, PAGE_SIZE};
pub use ports::*;
