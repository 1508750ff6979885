//! Router, services and ports wired together with mocked adapters, to pin down
//! what reaches persistence and how adapter failures surface over HTTP.

use std::sync::Arc;

use api_adapters::{cors_layer, router, AppState};
use axum::body::{to_bytes, Body};
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use chrono::Utc;
use domains::{
    DomainError, MockCommentRepository, MockPasswordHasher, MockThreadRepository,
    MockTokenService, MockUserRepository, Thread, ThreadId,
};
use mockall::predicate::eq;
use serde_json::{json, Value};
use services::{CommentService, ThreadService, UserService};
use tower::ServiceExt;

struct Mocks {
    users: MockUserRepository,
    threads: MockThreadRepository,
    comments: MockCommentRepository,
    tokens: MockTokenService,
}

impl Mocks {
    fn new() -> Self {
        let mut tokens = MockTokenService::new();
        tokens.expect_verify().returning(|token| match token {
            "alice-token" => Ok("alice".to_string()),
            _ => Err(DomainError::Unauthorized("invalid or expired token".into())),
        });
        Self {
            users: MockUserRepository::new(),
            threads: MockThreadRepository::new(),
            comments: MockCommentRepository::new(),
            tokens,
        }
    }

    fn into_router(self) -> Router {
        let threads = Arc::new(self.threads);
        let state = AppState::new(
            UserService::new(
                Arc::new(self.users),
                Arc::new(MockPasswordHasher::new()),
                Arc::new(self.tokens),
            ),
            ThreadService::new(threads),
            CommentService::new(Arc::new(self.comments)),
        );
        router(state, "/", cors_layer(None).unwrap())
    }
}

async fn call(
    app: Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(json) => builder
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

#[tokio::test]
async fn unauthenticated_writes_never_reach_the_repository() {
    let mut mocks = Mocks::new();
    mocks.threads.expect_insert_thread().never();
    mocks.comments.expect_insert_comment().never();
    let app = mocks.into_router();

    let (status, _) = call(
        app.clone(),
        Method::POST,
        "/thread/create",
        None,
        Some(json!({ "title": "t", "body": "b", "tags": [] })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = call(
        app,
        Method::POST,
        "/comment/create",
        Some("stolen"),
        Some(json!({ "thread_id": ThreadId::generate().to_string(), "body": "b" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn invalid_input_never_reaches_the_repository() {
    let mut mocks = Mocks::new();
    mocks.threads.expect_insert_thread().never();
    let app = mocks.into_router();

    let (status, body) = call(
        app,
        Method::POST,
        "/thread/create",
        Some("alice-token"),
        Some(json!({ "title": "t", "body": "b", "tags": ["1", "2", "3", "4"] })),
    )
    .await;
    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(body["error"], "at most 3 tags allowed, got 4");
}

#[tokio::test]
async fn the_token_subject_becomes_the_creator() {
    let id = ThreadId::generate();
    let mut mocks = Mocks::new();
    mocks
        .threads
        .expect_insert_thread()
        .withf(|creator, draft| creator == "alice" && draft.tags == vec!["intro".to_string()])
        .times(1)
        .returning(move |_, _| Ok(id));
    mocks
        .threads
        .expect_find_thread()
        .with(eq(id))
        .returning(move |_| {
            let now = Utc::now();
            Ok(Some(Thread {
                id,
                title: "Hello".into(),
                body: "World".into(),
                creator: "alice".into(),
                created_time: now,
                updated_time: now,
                num_comments: 0,
                tags: vec!["intro".into()],
            }))
        });
    let app = mocks.into_router();

    let (status, body) = call(
        app,
        Method::POST,
        "/thread/create",
        Some("alice-token"),
        Some(json!({ "title": " Hello ", "body": "World", "tags": ["intro", "intro"] })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], id.to_string());
}

#[tokio::test]
async fn storage_failures_hide_their_cause() {
    let mut mocks = Mocks::new();
    mocks
        .threads
        .expect_search_threads()
        .returning(|_| Err(DomainError::Internal("connection refused on 10.0.0.5".into())));
    let app = mocks.into_router();

    let (status, body) = call(app, Method::GET, "/thread/search?q=rust", None, None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "error": "internal server error" }));
}

#[tokio::test]
async fn search_parameters_reach_the_repository_parsed() {
    let mut mocks = Mocks::new();
    mocks
        .threads
        .expect_search_threads()
        .withf(|query| {
            query.keywords == vec!["widget".to_string()]
                && query.tags == vec!["alpha".to_string()]
                && query.page.number() == 2
        })
        .times(1)
        .returning(|_| Ok(Default::default()));
    let app = mocks.into_router();

    let (status, body) = call(
        app,
        Method::GET,
        "/thread/search?q=widget%20tag:alpha&p=2",
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "total_threads": 0, "threads": [] }));
}
