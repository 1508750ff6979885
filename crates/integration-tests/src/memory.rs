//! In-memory implementation of the repository ports.
//!
//! Mirrors the PostgreSQL adapter closely enough for end-to-end tests:
//! ownership-guarded writes, tag pruning, the composed search predicate, the
//! same sort tie-breaks and the same page window. Keyword matching is a
//! case-insensitive whole-word comparison instead of stemmed full-text search.

use std::cmp::Reverse;
use std::collections::{BTreeSet, HashMap};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use domains::{
    Comment, CommentId, CommentPage, CommentRepository, CommentSortOrder, DomainError,
    DomainResult, Page, TagSummary, Thread, ThreadDraft, ThreadId, ThreadPage, ThreadQuery,
    ThreadRepository, ThreadSortOrder, User, UserRepository,
};

#[derive(Debug, Clone)]
struct StoredThread {
    id: ThreadId,
    title: String,
    body: String,
    creator: String,
    created_time: DateTime<Utc>,
    updated_time: DateTime<Utc>,
}

#[derive(Default)]
struct State {
    users: HashMap<String, User>,
    threads: HashMap<ThreadId, StoredThread>,
    comments: HashMap<CommentId, Comment>,
    tags: BTreeSet<String>,
    thread_tags: BTreeSet<(ThreadId, String)>,
    last_time: Option<DateTime<Utc>>,
}

impl State {
    /// Strictly increasing timestamps, so creation order is always observable.
    fn tick(&mut self) -> DateTime<Utc> {
        let now = Utc::now();
        let next = match self.last_time {
            Some(last) if now <= last => last + Duration::microseconds(1),
            _ => now,
        };
        self.last_time = Some(next);
        next
    }

    fn tags_of(&self, id: ThreadId) -> Vec<String> {
        self.thread_tags
            .iter()
            .filter(|(thread, _)| *thread == id)
            .map(|(_, tag)| tag.clone())
            .collect()
    }

    fn comment_count(&self, id: ThreadId) -> i64 {
        self.comments.values().filter(|c| c.thread_id == id).count() as i64
    }

    fn hydrate(&self, stored: &StoredThread) -> Thread {
        Thread {
            id: stored.id,
            title: stored.title.clone(),
            body: stored.body.clone(),
            creator: stored.creator.clone(),
            created_time: stored.created_time,
            updated_time: stored.updated_time,
            num_comments: self.comment_count(stored.id),
            tags: self.tags_of(stored.id),
        }
    }

    fn attach(&mut self, id: ThreadId, tags: &[String]) {
        for tag in tags {
            self.tags.insert(tag.clone());
            self.thread_tags.insert((id, tag.clone()));
        }
    }

    fn detach_all(&mut self, id: ThreadId) -> Vec<String> {
        let previous = self.tags_of(id);
        self.thread_tags.retain(|(thread, _)| *thread != id);
        previous
    }

    fn prune(&mut self, candidates: &[String]) {
        for tag in candidates {
            if !self.thread_tags.iter().any(|(_, held)| held == tag) {
                self.tags.remove(tag);
            }
        }
    }

    fn owned_thread(&self, id: ThreadId, principal: &str) -> DomainResult<()> {
        match self.threads.get(&id) {
            None => Err(DomainError::not_found("thread", id)),
            Some(thread) if thread.creator != principal => Err(DomainError::Forbidden(format!(
                "thread {id} belongs to another user"
            ))),
            Some(_) => Ok(()),
        }
    }

    fn owned_comment(&self, id: CommentId, principal: &str) -> DomainResult<()> {
        match self.comments.get(&id) {
            None => Err(DomainError::not_found("comment", id)),
            Some(comment) if comment.creator != principal => Err(DomainError::Forbidden(
                format!("comment {id} belongs to another user"),
            )),
            Some(_) => Ok(()),
        }
    }
}

fn words(text: &str) -> BTreeSet<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
        .collect()
}

fn window<T>(items: Vec<T>, page: Page) -> Vec<T> {
    items
        .into_iter()
        .skip(page.offset() as usize)
        .take(page.limit() as usize)
        .collect()
}

#[derive(Default)]
pub struct InMemoryStore {
    state: Mutex<State>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> DomainResult<MutexGuard<'_, State>> {
        self.state
            .lock()
            .map_err(|_| DomainError::Internal("in-memory store poisoned".into()))
    }

    /// Names currently in the tag set, sorted.
    pub fn tag_names(&self) -> Vec<String> {
        self.state()
            .map(|state| state.tags.iter().cloned().collect())
            .unwrap_or_default()
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn insert_user(&self, username: &str, password_hash: &str) -> DomainResult<()> {
        let mut state = self.state()?;
        if state.users.contains_key(username) {
            return Err(DomainError::Conflict(format!(
                "username {username} is already taken"
            )));
        }
        let created_time = state.tick();
        state.users.insert(
            username.to_string(),
            User {
                username: username.to_string(),
                password_hash: password_hash.to_string(),
                created_time,
            },
        );
        Ok(())
    }

    async fn find_user(&self, username: &str) -> DomainResult<Option<User>> {
        Ok(self.state()?.users.get(username).cloned())
    }
}

#[async_trait]
impl ThreadRepository for InMemoryStore {
    async fn insert_thread(&self, creator: &str, draft: &ThreadDraft) -> DomainResult<ThreadId> {
        let mut state = self.state()?;
        if !state.users.contains_key(creator) {
            return Err(DomainError::Internal(format!("unknown creator {creator}")));
        }
        let id = ThreadId::generate();
        let now = state.tick();
        state.threads.insert(
            id,
            StoredThread {
                id,
                title: draft.title.clone(),
                body: draft.body.clone(),
                creator: creator.to_string(),
                created_time: now,
                updated_time: now,
            },
        );
        state.attach(id, &draft.tags);
        Ok(id)
    }

    async fn update_thread(
        &self,
        id: ThreadId,
        principal: &str,
        draft: &ThreadDraft,
    ) -> DomainResult<()> {
        let mut state = self.state()?;
        state.owned_thread(id, principal)?;

        let now = state.tick();
        if let Some(thread) = state.threads.get_mut(&id) {
            thread.title = draft.title.clone();
            thread.body = draft.body.clone();
            thread.updated_time = now;
        }
        let previous = state.detach_all(id);
        state.attach(id, &draft.tags);
        state.prune(&previous);
        Ok(())
    }

    async fn delete_thread(&self, id: ThreadId, principal: &str) -> DomainResult<()> {
        let mut state = self.state()?;
        state.owned_thread(id, principal)?;

        let previous = state.detach_all(id);
        state.threads.remove(&id);
        state.comments.retain(|_, comment| comment.thread_id != id);
        state.prune(&previous);
        Ok(())
    }

    async fn find_thread(&self, id: ThreadId) -> DomainResult<Option<Thread>> {
        let state = self.state()?;
        Ok(state.threads.get(&id).map(|stored| state.hydrate(stored)))
    }

    async fn search_threads(&self, query: &ThreadQuery) -> DomainResult<ThreadPage> {
        let state = self.state()?;
        let keywords: BTreeSet<String> = query.keywords.iter().flat_map(|k| words(k)).collect();

        let mut matches: Vec<Thread> = state
            .threads
            .values()
            .filter(|stored| {
                let text = words(&format!("{} {}", stored.title, stored.body));
                keywords.iter().all(|k| text.contains(k))
            })
            .map(|stored| state.hydrate(stored))
            .filter(|thread| query.tags.iter().all(|tag| thread.tags.contains(tag)))
            .collect();

        match query.order {
            ThreadSortOrder::CreatedTimeAsc => matches.sort_by_key(|t| (t.created_time, t.id)),
            ThreadSortOrder::CreatedTimeDesc => {
                matches.sort_by_key(|t| Reverse((t.created_time, t.id)))
            }
            ThreadSortOrder::NumCommentsAsc => {
                matches.sort_by_key(|t| (t.num_comments, Reverse((t.created_time, t.id))))
            }
            ThreadSortOrder::NumCommentsDesc => {
                matches.sort_by_key(|t| Reverse((t.num_comments, t.created_time, t.id)))
            }
        }

        let total_threads = matches.len() as i64;
        Ok(ThreadPage {
            total_threads,
            threads: window(matches, query.page),
        })
    }

    async fn list_tags(&self) -> DomainResult<Vec<TagSummary>> {
        let state = self.state()?;
        Ok(state
            .tags
            .iter()
            .map(|name| TagSummary {
                name: name.clone(),
                thread_count: state
                    .thread_tags
                    .iter()
                    .filter(|(_, tag)| tag == name)
                    .count() as i64,
            })
            .collect())
    }
}

#[async_trait]
impl CommentRepository for InMemoryStore {
    async fn insert_comment(
        &self,
        thread_id: ThreadId,
        creator: &str,
        body: &str,
    ) -> DomainResult<Comment> {
        let mut state = self.state()?;
        if !state.threads.contains_key(&thread_id) {
            return Err(DomainError::not_found("thread", thread_id));
        }
        let now = state.tick();
        let comment = Comment {
            id: CommentId::generate(),
            body: body.to_string(),
            creator: creator.to_string(),
            thread_id,
            created_time: now,
            updated_time: now,
        };
        state.comments.insert(comment.id, comment.clone());
        Ok(comment)
    }

    async fn update_comment(
        &self,
        id: CommentId,
        principal: &str,
        body: &str,
    ) -> DomainResult<Comment> {
        let mut state = self.state()?;
        state.owned_comment(id, principal)?;

        let now = state.tick();
        let comment = state
            .comments
            .get_mut(&id)
            .ok_or_else(|| DomainError::not_found("comment", id))?;
        comment.body = body.to_string();
        comment.updated_time = now;
        Ok(comment.clone())
    }

    async fn delete_comment(&self, id: CommentId, principal: &str) -> DomainResult<()> {
        let mut state = self.state()?;
        state.owned_comment(id, principal)?;
        state.comments.remove(&id);
        Ok(())
    }

    async fn list_comments(
        &self,
        thread_id: ThreadId,
        order: CommentSortOrder,
        page: Page,
    ) -> DomainResult<CommentPage> {
        let state = self.state()?;
        let mut comments: Vec<Comment> = state
            .comments
            .values()
            .filter(|c| c.thread_id == thread_id)
            .cloned()
            .collect();

        match order {
            CommentSortOrder::CreatedTimeAsc => comments.sort_by_key(|c| (c.created_time, c.id)),
            CommentSortOrder::CreatedTimeDesc => {
                comments.sort_by_key(|c| Reverse((c.created_time, c.id)))
            }
        }

        let count = comments.len() as i64;
        Ok(CommentPage {
            comments: window(comments, page),
            count,
        })
    }
}
