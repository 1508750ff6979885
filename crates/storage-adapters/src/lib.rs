//! # storage-adapters
//!
//! Persistence implementations of the `domains` repository ports.
//! Each backend sits behind its own cargo feature so the binary only links
//! the driver it was compiled for.

#[cfg(feature = "db-postgres")]
pub mod postgres;

#[cfg(feature = "db-postgres")]
pub use postgres::{
    connect, run_migrations, PgCommentRepository, PgThreadRepository, PgUserRepository,
};
