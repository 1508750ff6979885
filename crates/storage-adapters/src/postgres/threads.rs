//! Thread persistence and the search query.

use async_trait::async_trait;
use domains::{
    DomainError, DomainResult, TagSummary, Thread, ThreadDraft, ThreadId, ThreadPage,
    ThreadQuery, ThreadRepository,
};
use sqlx::postgres::{PgPool, PgRow};
use sqlx::{PgConnection, Row};
use tracing::debug;

use super::error::internal;
use super::queries::{find_thread_sql, search_count_sql, search_page_sql, READ_SNAPSHOT};
use super::tags;

pub struct PgThreadRepository {
    pool: PgPool,
}

impl PgThreadRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn thread_from_row(row: &PgRow) -> Result<Thread, sqlx::Error> {
    Ok(Thread {
        id: ThreadId(row.try_get("id")?),
        title: row.try_get("title")?,
        body: row.try_get("body")?,
        creator: row.try_get("creator")?,
        created_time: row.try_get("created_time")?,
        updated_time: row.try_get("updated_time")?,
        num_comments: row.try_get("num_comments")?,
        tags: row.try_get("tags")?,
    })
}

/// Called after an ownership-guarded write touched no row.
async fn ownership_failure(conn: &mut PgConnection, id: ThreadId) -> DomainError {
    let exists = sqlx::query_scalar::<_, bool>("SELECT EXISTS (SELECT 1 FROM threads WHERE id = $1)")
        .bind(id.0)
        .fetch_one(&mut *conn)
        .await;
    match exists {
        Ok(true) => DomainError::Forbidden(format!("thread {id} belongs to another user")),
        Ok(false) => DomainError::not_found("thread", id),
        Err(err) => DomainError::internal("thread ownership lookup", err),
    }
}

#[async_trait]
impl ThreadRepository for PgThreadRepository {
    async fn insert_thread(&self, creator: &str, draft: &ThreadDraft) -> DomainResult<ThreadId> {
        let id = ThreadId::generate();
        let mut tx = self.pool.begin().await.map_err(internal("begin thread insert"))?;

        // 1. Thread row
        sqlx::query("INSERT INTO threads (id, title, body, creator) VALUES ($1, $2, $3, $4)")
            .bind(id.0)
            .bind(&draft.title)
            .bind(&draft.body)
            .bind(creator)
            .execute(&mut *tx)
            .await
            .map_err(internal("insert thread"))?;

        // 2. Tags and associations
        tags::attach(&mut tx, id, &draft.tags)
            .await
            .map_err(internal("attach tags"))?;

        tx.commit().await.map_err(internal("commit thread insert"))?;
        Ok(id)
    }

    async fn update_thread(
        &self,
        id: ThreadId,
        principal: &str,
        draft: &ThreadDraft,
    ) -> DomainResult<()> {
        let mut tx = self.pool.begin().await.map_err(internal("begin thread update"))?;

        // 1. Ownership-guarded update of the row itself
        let updated = sqlx::query(
            "UPDATE threads SET title = $3, body = $4, updated_time = now() \
             WHERE id = $1 AND creator = $2",
        )
        .bind(id.0)
        .bind(principal)
        .bind(&draft.title)
        .bind(&draft.body)
        .execute(&mut *tx)
        .await
        .map_err(internal("update thread"))?
        .rows_affected();

        if updated == 0 {
            return Err(ownership_failure(&mut tx, id).await);
        }

        // 2. Replace the tag set
        let previous = tags::detach_all(&mut tx, id)
            .await
            .map_err(internal("detach tags"))?;
        tags::attach(&mut tx, id, &draft.tags)
            .await
            .map_err(internal("attach tags"))?;

        // 3. Drop tags this thread was the last holder of
        tags::prune_orphans(&mut tx, &previous)
            .await
            .map_err(internal("prune tags"))?;

        tx.commit().await.map_err(internal("commit thread update"))?;
        Ok(())
    }

    async fn delete_thread(&self, id: ThreadId, principal: &str) -> DomainResult<()> {
        let mut tx = self.pool.begin().await.map_err(internal("begin thread delete"))?;

        let previous = tags::detach_all_owned(&mut tx, id, principal)
            .await
            .map_err(internal("detach tags"))?;

        // Comments go with the thread through ON DELETE CASCADE.
        let deleted = sqlx::query("DELETE FROM threads WHERE id = $1 AND creator = $2")
            .bind(id.0)
            .bind(principal)
            .execute(&mut *tx)
            .await
            .map_err(internal("delete thread"))?
            .rows_affected();

        if deleted == 0 {
            return Err(ownership_failure(&mut tx, id).await);
        }

        tags::prune_orphans(&mut tx, &previous)
            .await
            .map_err(internal("prune tags"))?;

        tx.commit().await.map_err(internal("commit thread delete"))?;
        Ok(())
    }

    async fn find_thread(&self, id: ThreadId) -> DomainResult<Option<Thread>> {
        let row = sqlx::query(&find_thread_sql())
            .bind(id.0)
            .fetch_optional(&self.pool)
            .await
            .map_err(internal("find thread"))?;

        row.as_ref()
            .map(thread_from_row)
            .transpose()
            .map_err(internal("decode thread"))
    }

    async fn search_threads(&self, query: &ThreadQuery) -> DomainResult<ThreadPage> {
        let keywords = query.keywords.join(" ");
        let page_sql = search_page_sql(query.order);
        let count_sql = search_count_sql();

        let mut tx = self.pool.begin().await.map_err(internal("begin search"))?;
        sqlx::query(READ_SNAPSHOT)
            .execute(&mut *tx)
            .await
            .map_err(internal("set search snapshot"))?;

        let rows = sqlx::query(&page_sql)
            .bind(&keywords)
            .bind(&query.tags)
            .bind(query.page.limit())
            .bind(query.page.offset())
            .fetch_all(&mut *tx)
            .await
            .map_err(internal("search threads"))?;

        let total_threads: i64 = sqlx::query_scalar(&count_sql)
            .bind(&keywords)
            .bind(&query.tags)
            .fetch_one(&mut *tx)
            .await
            .map_err(internal("count threads"))?;

        tx.commit().await.map_err(internal("end search"))?;

        let threads = rows
            .iter()
            .map(thread_from_row)
            .collect::<Result<Vec<_>, _>>()
            .map_err(internal("decode thread"))?;
        debug!(total_threads, page = query.page.number(), "search executed");

        Ok(ThreadPage {
            total_threads,
            threads,
        })
    }

    async fn list_tags(&self) -> DomainResult<Vec<TagSummary>> {
        let rows = sqlx::query(
            "SELECT t.name, COUNT(tt.thread_id) AS thread_count \
             FROM tags t LEFT JOIN thread_tags tt ON tt.tag_name = t.name \
             GROUP BY t.name ORDER BY t.name",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(internal("list tags"))?;

        rows.iter()
            .map(|row| -> Result<TagSummary, sqlx::Error> {
                Ok(TagSummary {
                    name: row.try_get("name")?,
                    thread_count: row.try_get("thread_count")?,
                })
            })
            .collect::<Result<Vec<_>, _>>()
            .map_err(internal("decode tag"))
    }
}
