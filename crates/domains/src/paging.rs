//! Sort orders and page windows shared by thread search and comment listing.

use serde::{Deserialize, Serialize};

/// Fixed number of items per page for every listing.
pub const PAGE_SIZE: i64 = 10;

/// Recognized thread orderings. Anything else falls back to newest first.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThreadSortOrder {
    CreatedTimeAsc,
    #[default]
    CreatedTimeDesc,
    NumCommentsAsc,
    NumCommentsDesc,
}

impl ThreadSortOrder {
    pub fn parse_or_default(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some("created_time_asc") => Self::CreatedTimeAsc,
            Some("created_time_desc") => Self::CreatedTimeDesc,
            Some("num_comments_asc") => Self::NumCommentsAsc,
            Some("num_comments_desc") => Self::NumCommentsDesc,
            _ => Self::default(),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CreatedTimeAsc => "created_time_asc",
            Self::CreatedTimeDesc => "created_time_desc",
            Self::NumCommentsAsc => "num_comments_asc",
            Self::NumCommentsDesc => "num_comments_desc",
        }
    }
}

/// Recognized comment orderings. Anything else falls back to oldest first.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommentSortOrder {
    #[default]
    CreatedTimeAsc,
    CreatedTimeDesc,
}

impl CommentSortOrder {
    pub fn parse_or_default(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some("created_time_desc") => Self::CreatedTimeDesc,
            _ => Self::default(),
        }
    }
}

/// A 1-based page number. Values at or below one, and anything that does not
/// parse, all mean the first page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page(u32);

impl Default for Page {
    fn default() -> Self {
        Self(1)
    }
}

impl Page {
    pub fn new(number: i64) -> Self {
        Self(number.clamp(1, u32::MAX as i64) as u32)
    }

    pub fn parse_or_first(raw: Option<&str>) -> Self {
        raw.and_then(|p| p.trim().parse::<i64>().ok())
            .map(Self::new)
            .unwrap_or_default()
    }

    pub fn number(&self) -> u32 {
        self.0
    }

    pub fn limit(&self) -> i64 {
        PAGE_SIZE
    }

    pub fn offset(&self) -> i64 {
        (i64::from(self.0) - 1) * PAGE_SIZE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_thread_order_defaults_to_newest_first() {
        assert_eq!(ThreadSortOrder::parse_or_default(None), ThreadSortOrder::CreatedTimeDesc);
        assert_eq!(
            ThreadSortOrder::parse_or_default(Some("by_magic")),
            ThreadSortOrder::CreatedTimeDesc
        );
        assert_eq!(
            ThreadSortOrder::parse_or_default(Some("num_comments_asc")),
            ThreadSortOrder::NumCommentsAsc
        );
    }

    #[test]
    fn comment_order_accepts_only_created_time() {
        assert_eq!(CommentSortOrder::parse_or_default(None), CommentSortOrder::CreatedTimeAsc);
        assert_eq!(
            CommentSortOrder::parse_or_default(Some("num_comments_desc")),
            CommentSortOrder::CreatedTimeAsc
        );
        assert_eq!(
            CommentSortOrder::parse_or_default(Some("created_time_desc")),
            CommentSortOrder::CreatedTimeDesc
        );
    }

    #[test]
    fn page_offsets() {
        assert_eq!(Page::parse_or_first(None).offset(), 0);
        assert_eq!(Page::parse_or_first(Some("abc")).offset(), 0);
        assert_eq!(Page::parse_or_first(Some("-4")).offset(), 0);
        assert_eq!(Page::parse_or_first(Some("0")).offset(), 0);
        assert_eq!(Page::parse_or_first(Some("1")).offset(), 0);
        assert_eq!(Page::parse_or_first(Some("2")).offset(), 10);
        assert_eq!(Page::parse_or_first(Some(" 7 ")).offset(), 60);
        assert_eq!(Page::new(3).limit(), PAGE_SIZE);
    }
}
