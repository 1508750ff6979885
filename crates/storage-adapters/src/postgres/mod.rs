//! # PostgreSQL backend
//!
//! Repositories share one `PgPool`. Every multi-statement write runs inside a
//! single `pool.begin()` transaction; dropping the transaction on an early
//! return rolls it back, so a failure at any step leaves no partial state.
//!
//! # Developer Note
//! Ownership checks are part of the mutating statement (`WHERE id = $1 AND
//! creator = $2`). Only when no row was affected do we look again, in the same
//! transaction, to tell `Forbidden` apart from `NotFound`.

mod comments;
mod error;
mod pool;
mod queries;
mod tags;
mod threads;
mod users;

pub use comments::PgCommentRepository;
pub use pool::{connect, run_migrations};
pub use threads::PgThreadRepository;
pub use users::PgUserRepository;
