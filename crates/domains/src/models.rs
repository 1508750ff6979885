//! # Domain Models
//!
//! These structs represent the core entities of the forum.
//! Identifiers are UUID v7 so that insertion order and id order agree.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::ValidationError;

macro_rules! uuid_id {
    ($(#[$meta:meta])* $name:ident, $entity:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub Uuid);

        impl $name {
            /// Generates a fresh time-ordered identifier.
            pub fn generate() -> Self {
                Self(Uuid::now_v7())
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }

        impl FromStr for $name {
            type Err = ValidationError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Uuid::parse_str(s.trim())
                    .map(Self)
                    .map_err(|_| ValidationError::InvalidId { entity: $entity })
            }
        }
    };
}

uuid_id!(
    /// Opaque key of a [`Thread`].
    ThreadId,
    "thread"
);
uuid_id!(
    /// Opaque key of a [`Comment`].
    CommentId,
    "comment"
);

/// A registered account. Usernames are case-sensitive and immutable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub username: String,
    pub password_hash: String,
    pub created_time: DateTime<Utc>,
}

/// A discussion thread, hydrated with its derived comment count and tag list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Thread {
    pub id: ThreadId,
    pub title: String,
    pub body: String,
    /// Username of the author; the only principal allowed to mutate the thread.
    pub creator: String,
    pub created_time: DateTime<Utc>,
    pub updated_time: DateTime<Utc>,
    pub num_comments: i64,
    pub tags: Vec<String>,
}

/// A reply attached to a thread.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: CommentId,
    pub body: String,
    pub creator: String,
    pub thread_id: ThreadId,
    pub created_time: DateTime<Utc>,
    pub updated_time: DateTime<Utc>,
}

/// Validated title, body and tag set for a thread create or update.
///
/// Only the services crate constructs these, after trimming and bounds checks,
/// so repositories may persist the fields as-is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThreadDraft {
    pub title: String,
    pub body: String,
    /// Trimmed, non-empty, de-duplicated; at most three entries.
    pub tags: Vec<String>,
}

/// A tag together with the number of threads currently carrying it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagSummary {
    pub name: String,
    pub thread_count: i64,
}

/// Composed search criteria handed to the persistence layer.
///
/// Empty `keywords` and empty `tags` are each vacuously true, so the default
/// value matches every thread.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ThreadQuery {
    /// Full-text tokens; a thread must match all of them.
    pub keywords: Vec<String>,
    /// Tag names a thread's tag set must contain.
    pub tags: Vec<String>,
    pub order: crate::paging::ThreadSortOrder,
    pub page: crate::paging::Page,
}

/// One page of search results plus the unpaginated match count.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThreadPage {
    pub total_threads: i64,
    pub threads: Vec<Thread>,
}

/// One page of a thread's comments plus the thread's total comment count.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentPage {
    pub comments: Vec<Comment>,
    pub count: i64,
}

/// Credentials handed back after registration or login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthSession {
    pub username: String,
    pub token: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thread_id_parses_and_displays() {
        let id = ThreadId::generate();
        let parsed: ThreadId = id.to_string().parse().unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn malformed_id_is_a_validation_error() {
        let err = "not-a-uuid".parse::<CommentId>().unwrap_err();
        assert_eq!(err, ValidationError::InvalidId { entity: "comment" });
    }

    #[test]
    fn generated_ids_are_time_ordered() {
        let first = ThreadId::generate();
        std::thread::sleep(std::time::Duration::from_millis(2));
        let second = ThreadId::generate();
        assert!(first < second);
    }

    #[test]
    fn thread_serializes_with_flat_id() {
        let now = Utc::now();
        let thread = Thread {
            id: ThreadId(Uuid::nil()),
            title: "Hello".into(),
            body: "World".into(),
            creator: "alice".into(),
            created_time: now,
            updated_time: now,
            num_comments: 0,
            tags: vec!["intro".into()],
        };
        let json = serde_json::to_value(&thread).unwrap();
        assert_eq!(json["id"], "00000000-0000-0000-0000-000000000000");
        assert_eq!(json["num_comments"], 0);
        assert_eq!(json["tags"][0], "intro");
    }
}
