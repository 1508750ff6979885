//! SQL text shared by the repositories.
//!
//! Thread search uses one predicate shape for every combination of keywords
//! and tags. An empty keyword string or an empty tag array makes its half of
//! the predicate vacuously true, so there is no per-variant branching.

use domains::{CommentSortOrder, ThreadSortOrder};

/// Hydrated thread columns, with the derived comment count and tag list.
pub(crate) const THREAD_COLUMNS: &str = "t.id, t.title, t.body, t.creator, \
     t.created_time, t.updated_time, \
     (SELECT COUNT(*) FROM comments c WHERE c.thread_id = t.id) AS num_comments, \
     ARRAY(SELECT tt.tag_name FROM thread_tags tt WHERE tt.thread_id = t.id ORDER BY tt.tag_name) AS tags";

/// `$1`: keywords joined by spaces, `$2`: required tag names.
pub(crate) const SEARCH_PREDICATE: &str = "($1 = '' OR t.search_vector @@ plainto_tsquery('english', $1)) \
     AND (cardinality($2::text[]) = 0 \
          OR ARRAY(SELECT tt.tag_name FROM thread_tags tt WHERE tt.thread_id = t.id) @> $2::text[])";

pub(crate) const COMMENT_COLUMNS: &str =
    "id, body, creator, thread_id, created_time, updated_time";

pub(crate) const READ_SNAPSHOT: &str =
    "SET TRANSACTION ISOLATION LEVEL REPEATABLE READ, READ ONLY";

/// Every ordering ends on the id so that pages never overlap on ties.
pub(crate) fn thread_order_clause(order: ThreadSortOrder) -> &'static str {
    match order {
        ThreadSortOrder::CreatedTimeAsc => "t.created_time ASC, t.id ASC",
        ThreadSortOrder::CreatedTimeDesc => "t.created_time DESC, t.id DESC",
        ThreadSortOrder::NumCommentsAsc => "num_comments ASC, t.created_time DESC, t.id DESC",
        ThreadSortOrder::NumCommentsDesc => "num_comments DESC, t.created_time DESC, t.id DESC",
    }
}

pub(crate) fn comment_order_clause(order: CommentSortOrder) -> &'static str {
    match order {
        CommentSortOrder::CreatedTimeAsc => "created_time ASC, id ASC",
        CommentSortOrder::CreatedTimeDesc => "created_time DESC, id DESC",
    }
}

/// Page query: `$3` is the limit, `$4` the offset.
pub(crate) fn search_page_sql(order: ThreadSortOrder) -> String {
    format!(
        "SELECT {THREAD_COLUMNS} FROM threads t WHERE {SEARCH_PREDICATE} ORDER BY {} LIMIT $3 OFFSET $4",
        thread_order_clause(order)
    )
}

pub(crate) fn search_count_sql() -> String {
    format!("SELECT COUNT(*) FROM threads t WHERE {SEARCH_PREDICATE}")
}

pub(crate) fn find_thread_sql() -> String {
    format!("SELECT {THREAD_COLUMNS} FROM threads t WHERE t.id = $1")
}

/// `$1`: thread id, `$2` limit, `$3` offset.
pub(crate) fn comment_page_sql(order: CommentSortOrder) -> String {
    format!(
        "SELECT {COMMENT_COLUMNS} FROM comments WHERE thread_id = $1 ORDER BY {} LIMIT $2 OFFSET $3",
        comment_order_clause(order)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_and_count_share_the_predicate() {
        let page = search_page_sql(ThreadSortOrder::default());
        let count = search_count_sql();
        assert!(page.contains(SEARCH_PREDICATE));
        assert!(count.contains(SEARCH_PREDICATE));
        assert!(!count.contains("LIMIT"));
    }

    #[test]
    fn default_order_is_newest_first_with_id_tiebreak() {
        let sql = search_page_sql(ThreadSortOrder::default());
        assert!(sql.contains("ORDER BY t.created_time DESC, t.id DESC LIMIT $3 OFFSET $4"));
    }

    #[test]
    fn comment_count_orders_fall_back_to_recency() {
        let sql = search_page_sql(ThreadSortOrder::NumCommentsAsc);
        assert!(sql.contains("ORDER BY num_comments ASC, t.created_time DESC"));
    }

    #[test]
    fn keyword_half_uses_plain_tsquery() {
        assert!(SEARCH_PREDICATE.contains("plainto_tsquery('english', $1)"));
        assert!(SEARCH_PREDICATE.contains("@> $2::text[]"));
    }

    #[test]
    fn comment_pages_order_by_creation() {
        assert!(comment_page_sql(CommentSortOrder::CreatedTimeDesc)
            .ends_with("ORDER BY created_time DESC, id DESC LIMIT $2 OFFSET $3"));
        assert!(comment_page_sql(CommentSortOrder::CreatedTimeAsc)
            .contains("WHERE thread_id = $1 ORDER BY created_time ASC"));
    }
}
