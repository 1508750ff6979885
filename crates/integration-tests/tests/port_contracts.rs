//! Behaviour every repository implementation must share, checked against the
//! in-memory store that backs the HTTP suites.

use domains::{
    CommentRepository, CommentSortOrder, DomainError, Page, ThreadDraft, ThreadId, ThreadQuery,
    ThreadRepository, ThreadSortOrder, UserRepository,
};
use integration_tests::InMemoryStore;

fn draft(title: &str, tags: &[&str]) -> ThreadDraft {
    ThreadDraft {
        title: title.to_string(),
        body: format!("{title} body"),
        tags: tags.iter().map(|t| t.to_string()).collect(),
    }
}

async fn store_with_users() -> InMemoryStore {
    let store = InMemoryStore::new();
    store.insert_user("alice", "h").await.unwrap();
    store.insert_user("bob", "h").await.unwrap();
    store
}

#[tokio::test]
async fn usernames_are_unique() {
    let store = store_with_users().await;
    let err = store.insert_user("alice", "other").await.unwrap_err();
    assert!(matches!(err, DomainError::Conflict(_)));
    assert_eq!(store.find_user("alice").await.unwrap().unwrap().password_hash, "h");
    assert!(store.find_user("carol").await.unwrap().is_none());
}

#[tokio::test]
async fn ownership_guards_distinguish_missing_from_foreign() {
    let store = store_with_users().await;
    let id = store.insert_thread("alice", &draft("t", &[])).await.unwrap();

    let foreign = store.delete_thread(id, "bob").await.unwrap_err();
    assert!(matches!(foreign, DomainError::Forbidden(_)));

    let missing = store
        .update_thread(ThreadId::generate(), "alice", &draft("t", &[]))
        .await
        .unwrap_err();
    assert!(matches!(missing, DomainError::NotFound { entity: "thread", .. }));

    assert!(store.find_thread(id).await.unwrap().is_some());
}

#[tokio::test]
async fn tags_are_pruned_only_when_unreferenced() {
    let store = store_with_users().await;
    let first = store
        .insert_thread("alice", &draft("first", &["shared", "solo"]))
        .await
        .unwrap();
    store
        .insert_thread("bob", &draft("second", &["shared"]))
        .await
        .unwrap();

    store
        .update_thread(first, "alice", &draft("first", &["fresh"]))
        .await
        .unwrap();
    assert_eq!(store.tag_names(), vec!["fresh", "shared"]);

    store.delete_thread(first, "alice").await.unwrap();
    assert_eq!(store.tag_names(), vec!["shared"]);
}

#[tokio::test]
async fn search_requires_every_tag_and_keyword() {
    let store = store_with_users().await;
    store
        .insert_thread("alice", &draft("widget", &["a", "b"]))
        .await
        .unwrap();
    store
        .insert_thread("alice", &draft("widget", &["a"]))
        .await
        .unwrap();
    store
        .insert_thread("alice", &draft("gizmo", &["a", "b"]))
        .await
        .unwrap();

    let query = ThreadQuery {
        keywords: vec!["widget".into()],
        tags: vec!["a".into(), "b".into()],
        ..ThreadQuery::default()
    };
    let page = store.search_threads(&query).await.unwrap();
    assert_eq!(page.total_threads, 1);
    assert_eq!(page.threads[0].tags, vec!["a", "b"]);

    let everything = store.search_threads(&ThreadQuery::default()).await.unwrap();
    assert_eq!(everything.total_threads, 3);
}

#[tokio::test]
async fn search_pages_past_the_end_are_empty() {
    let store = store_with_users().await;
    store.insert_thread("alice", &draft("t", &[])).await.unwrap();

    let query = ThreadQuery {
        order: ThreadSortOrder::CreatedTimeAsc,
        page: Page::new(2),
        ..ThreadQuery::default()
    };
    let page = store.search_threads(&query).await.unwrap();
    assert_eq!(page.total_threads, 1);
    assert!(page.threads.is_empty());
}

#[tokio::test]
async fn comments_follow_their_thread() {
    let store = store_with_users().await;
    let thread = store.insert_thread("alice", &draft("t", &[])).await.unwrap();
    let comment = store.insert_comment(thread, "bob", "hi").await.unwrap();

    let err = store.update_comment(comment.id, "alice", "x").await.unwrap_err();
    assert!(matches!(err, DomainError::Forbidden(_)));

    let orphan = store
        .insert_comment(ThreadId::generate(), "bob", "hi")
        .await
        .unwrap_err();
    assert!(matches!(orphan, DomainError::NotFound { entity: "thread", .. }));

    store.delete_thread(thread, "alice").await.unwrap();
    let page = store
        .list_comments(thread, CommentSortOrder::CreatedTimeAsc, Page::default())
        .await
        .unwrap();
    assert_eq!(page.count, 0);
}

#[tokio::test]
async fn keywords_are_tokenized_like_the_thread_text() {
    let store = store_with_users().await;
    store
        .insert_thread("alice", &draft("hello world", &[]))
        .await
        .unwrap();

    for raw in ["hello,", "HELLO!", "(world)"] {
        let query = ThreadQuery {
            keywords: vec![raw.to_string()],
            ..ThreadQuery::default()
        };
        let page = store.search_threads(&query).await.unwrap();
        assert_eq!(page.total_threads, 1, "{raw}");
    }
}
