//! # Tag Manager
//!
//! Maintains the shared tag set and the thread/tag association. Every function
//! runs on a connection that is already inside the caller's transaction.
//!
//! Invariant: at commit time no `tags` row lacks a `thread_tags` reference.
//! Writers that remove associations call [`prune_orphans`] with the names they
//! removed before committing.

use domains::ThreadId;
use sqlx::PgConnection;
use tracing::debug;

/// Ensures each tag exists, then links it to `thread`.
///
/// Tag rows are always locked in name order, here and in [`prune_orphans`],
/// so two writers sharing tags cannot deadlock.
pub(crate) async fn attach(
    conn: &mut PgConnection,
    thread: ThreadId,
    tags: &[String],
) -> Result<(), sqlx::Error> {
    if tags.is_empty() {
        return Ok(());
    }
    let sorted = lock_order(tags);

    // The no-op update locks each tag row until commit, so a concurrent prune
    // cannot remove it between here and the association insert.
    sqlx::query(
        "INSERT INTO tags (name) \
         SELECT n FROM UNNEST($1::text[]) AS n ORDER BY n \
         ON CONFLICT (name) DO UPDATE SET name = EXCLUDED.name",
    )
    .bind(&sorted)
    .execute(&mut *conn)
    .await?;

    sqlx::query(
        "INSERT INTO thread_tags (thread_id, tag_name) \
         SELECT $1, n FROM UNNEST($2::text[]) AS n ORDER BY n \
         ON CONFLICT DO NOTHING",
    )
    .bind(thread.0)
    .bind(&sorted)
    .execute(&mut *conn)
    .await?;

    Ok(())
}

/// Removes every association of `thread` and returns the tag names it held.
pub(crate) async fn detach_all(
    conn: &mut PgConnection,
    thread: ThreadId,
) -> Result<Vec<String>, sqlx::Error> {
    sqlx::query_scalar("DELETE FROM thread_tags WHERE thread_id = $1 RETURNING tag_name")
        .bind(thread.0)
        .fetch_all(&mut *conn)
        .await
}

/// Same as [`detach_all`], but only if `principal` created the thread.
/// An empty result does not say whether the predicate matched.
pub(crate) async fn detach_all_owned(
    conn: &mut PgConnection,
    thread: ThreadId,
    principal: &str,
) -> Result<Vec<String>, sqlx::Error> {
    sqlx::query_scalar(
        "DELETE FROM thread_tags tt USING threads t \
         WHERE tt.thread_id = t.id AND t.id = $1 AND t.creator = $2 \
         RETURNING tt.tag_name",
    )
    .bind(thread.0)
    .bind(principal)
    .fetch_all(&mut *conn)
    .await
}

/// Deletes those of `candidates` that no thread references any more.
pub(crate) async fn prune_orphans(
    conn: &mut PgConnection,
    candidates: &[String],
) -> Result<u64, sqlx::Error> {
    if candidates.is_empty() {
        return Ok(0);
    }

    let pruned = sqlx::query(
        "DELETE FROM tags WHERE name IN ( \
             SELECT t.name FROM tags t WHERE t.name = ANY($1::text[]) \
             AND NOT EXISTS (SELECT 1 FROM thread_tags tt WHERE tt.tag_name = t.name) \
             ORDER BY t.name FOR UPDATE)",
    )
    .bind(lock_order(candidates))
    .execute(&mut *conn)
    .await?
    .rows_affected();

    if pruned > 0 {
        debug!(pruned, "orphan tags removed");
    }
    Ok(pruned)
}

fn lock_order(tags: &[String]) -> Vec<String> {
    let mut sorted = tags.to_vec();
    sorted.sort_unstable();
    sorted.dedup();
    sorted
}
