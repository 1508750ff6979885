//! Translation of `sqlx` failures into the domain taxonomy.

use domains::DomainError;

/// Wraps any driver error as `Internal`, keeping the operation name for the log.
pub(crate) fn internal(context: &'static str) -> impl Fn(sqlx::Error) -> DomainError {
    move |err| DomainError::internal(context, err)
}

pub(crate) fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.is_unique_violation())
}

/// True when `err` is a foreign-key violation raised by `constraint`.
pub(crate) fn violates_foreign_key(err: &sqlx::Error, constraint: &str) -> bool {
    matches!(
        err,
        sqlx::Error::Database(db)
            if db.is_foreign_key_violation() && db.constraint() == Some(constraint)
    )
}
