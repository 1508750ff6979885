//! Search query syntax.
//!
//! The `q` parameter is split on whitespace. Tokens of the form `tag:<name>`
//! become tag filters, everything else is a keyword. Both lists may be empty.

use domains::{Page, ThreadQuery, ThreadSortOrder};

const TAG_PREFIX: &str = "tag:";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedQuery {
    pub keywords: Vec<String>,
    pub tags: Vec<String>,
}

impl ParsedQuery {
    pub fn into_query(self, order: ThreadSortOrder, page: Page) -> ThreadQuery {
        ThreadQuery {
            keywords: self.keywords,
            tags: self.tags,
            order,
            page,
        }
    }
}

pub fn parse_search_query(raw: &str) -> ParsedQuery {
    let mut parsed = ParsedQuery::default();
    for token in raw.split_whitespace() {
        match token.strip_prefix(TAG_PREFIX) {
            // a bare "tag:" filters on nothing
            Some("") => {}
            Some(tag) => {
                if !parsed.tags.iter().any(|t| t == tag) {
                    parsed.tags.push(tag.to_string());
                }
            }
            None => parsed.keywords.push(token.to_string()),
        }
    }
    parsed
}
