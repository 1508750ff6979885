//! Comment persistence. Each write is a single statement.

use async_trait::async_trait;
use domains::{
    Comment, CommentId, CommentPage, CommentRepository, CommentSortOrder, DomainError,
    DomainResult, Page, ThreadId,
};
use sqlx::postgres::{PgPool, PgRow};
use sqlx::Row;

use super::error::{internal, violates_foreign_key};
use super::queries::{comment_page_sql, COMMENT_COLUMNS, READ_SNAPSHOT};

const THREAD_FK: &str = "comments_thread_id_fkey";

pub struct PgCommentRepository {
    pool: PgPool,
}

impl PgCommentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn ownership_failure(&self, id: CommentId) -> DomainError {
        let exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS (SELECT 1 FROM comments WHERE id = $1)")
                .bind(id.0)
                .fetch_one(&self.pool)
                .await;
        match exists {
            Ok(true) => DomainError::Forbidden(format!("comment {id} belongs to another user")),
            Ok(false) => DomainError::not_found("comment", id),
            Err(err) => DomainError::internal("comment ownership lookup", err),
        }
    }
}

fn comment_from_row(row: &PgRow) -> Result<Comment, sqlx::Error> {
    Ok(Comment {
        id: CommentId(row.try_get("id")?),
        body: row.try_get("body")?,
        creator: row.try_get("creator")?,
        thread_id: ThreadId(row.try_get("thread_id")?),
        created_time: row.try_get("created_time")?,
        updated_time: row.try_get("updated_time")?,
    })
}

#[async_trait]
impl CommentRepository for PgCommentRepository {
    async fn insert_comment(
        &self,
        thread_id: ThreadId,
        creator: &str,
        body: &str,
    ) -> DomainResult<Comment> {
        let row = sqlx::query(&format!(
            "INSERT INTO comments (id, thread_id, creator, body) VALUES ($1, $2, $3, $4) \
             RETURNING {COMMENT_COLUMNS}"
        ))
        .bind(CommentId::generate().0)
        .bind(thread_id.0)
        .bind(creator)
        .bind(body)
        .fetch_one(&self.pool)
        .await
        .map_err(|err| {
            if violates_foreign_key(&err, THREAD_FK) {
                DomainError::not_found("thread", thread_id)
            } else {
                DomainError::internal("insert comment", err)
            }
        })?;

        comment_from_row(&row).map_err(internal("decode comment"))
    }

    async fn update_comment(
        &self,
        id: CommentId,
        principal: &str,
        body: &str,
    ) -> DomainResult<Comment> {
        let row = sqlx::query(&format!(
            "UPDATE comments SET body = $3, updated_time = now() \
             WHERE id = $1 AND creator = $2 RETURNING {COMMENT_COLUMNS}"
        ))
        .bind(id.0)
        .bind(principal)
        .bind(body)
        .fetch_optional(&self.pool)
        .await
        .map_err(internal("update comment"))?;

        match row {
            Some(row) => comment_from_row(&row).map_err(internal("decode comment")),
            None => Err(self.ownership_failure(id).await),
        }
    }

    async fn delete_comment(&self, id: CommentId, principal: &str) -> DomainResult<()> {
        let deleted = sqlx::query("DELETE FROM comments WHERE id = $1 AND creator = $2")
            .bind(id.0)
            .bind(principal)
            .execute(&self.pool)
            .await
            .map_err(internal("delete comment"))?
            .rows_affected();

        if deleted == 0 {
            return Err(self.ownership_failure(id).await);
        }
        Ok(())
    }

    async fn list_comments(
        &self,
        thread_id: ThreadId,
        order: CommentSortOrder,
        page: Page,
    ) -> DomainResult<CommentPage> {
        let page_sql = comment_page_sql(order);

        let mut tx = self.pool.begin().await.map_err(internal("begin comment listing"))?;
        sqlx::query(READ_SNAPSHOT)
            .execute(&mut *tx)
            .await
            .map_err(internal("set comment snapshot"))?;

        let rows = sqlx::query(&page_sql)
            .bind(thread_id.0)
            .bind(page.limit())
            .bind(page.offset())
            .fetch_all(&mut *tx)
            .await
            .map_err(internal("list comments"))?;

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM comments WHERE thread_id = $1")
            .bind(thread_id.0)
            .fetch_one(&mut *tx)
            .await
            .map_err(internal("count comments"))?;

        tx.commit().await.map_err(internal("end comment listing"))?;

        let comments = rows
            .iter()
            .map(comment_from_row)
            .collect::<Result<Vec<_>, _>>()
            .map_err(internal("decode comment"))?;
        Ok(CommentPage { comments, count })
    }
}
