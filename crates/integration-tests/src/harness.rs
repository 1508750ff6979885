//! Router-level test harness.

use std::sync::Arc;

use api_adapters::{cors_layer, router, AppState};
use auth_adapters::JwtTokenService;
use axum::body::{to_bytes, Body};
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use chrono::Duration;
use serde_json::{json, Value};
use services::{CommentService, ThreadService, UserService};
use tower::ServiceExt;

use crate::{InMemoryStore, PlainHasher};

pub const BASE: &str = "/api/v1";
pub const PASSWORD: &str = "secret1";
pub const JWT_SECRET: &[u8] = b"integration-secret";

pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

pub struct TestApp {
    pub router: Router,
    pub store: Arc<InMemoryStore>,
}

impl Default for TestApp {
    fn default() -> Self {
        Self::new()
    }
}

impl TestApp {
    pub fn new() -> Self {
        let store = Arc::new(InMemoryStore::new());
        let tokens = Arc::new(JwtTokenService::new(JWT_SECRET, Duration::hours(24)));

        let state = AppState::new(
            UserService::new(store.clone(), Arc::new(PlainHasher), tokens),
            ThreadService::new(store.clone()),
            CommentService::new(store.clone()),
        );
        let cors = cors_layer(None).expect("wildcard CORS policy");

        Self {
            router: router(state, BASE, cors),
            store,
        }
    }

    /// Sends a JSON request to `path` under the base path.
    pub async fn send(
        &self,
        method: Method,
        path: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> TestResponse {
        let payload = body.map(|value| value.to_string());
        self.send_raw(method, path, token, payload.as_deref()).await
    }

    /// A leading `!` addresses `path` from the root instead of the base path.
    pub async fn send_raw(
        &self,
        method: Method,
        path: &str,
        token: Option<&str>,
        body: Option<&str>,
    ) -> TestResponse {
        let uri = match path.strip_prefix('!') {
            Some(root) => root.to_string(),
            None => format!("{BASE}{path}"),
        };
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(raw) => builder
                .header(CONTENT_TYPE, "application/json")
                .body(Body::from(raw.to_owned())),
            None => builder.body(Body::empty()),
        }
        .expect("valid request");

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("readable body");
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        };
        TestResponse { status, body }
    }

    /// Registers `username` with [`PASSWORD`] and returns its bearer token.
    pub async fn register(&self, username: &str) -> String {
        let res = self
            .send(
                Method::POST,
                "/user/create",
                None,
                Some(json!({ "username": username, "password": PASSWORD })),
            )
            .await;
        assert_eq!(res.status, StatusCode::OK, "register {username}: {}", res.body);
        res.body["token"].as_str().expect("token").to_string()
    }

    /// Creates a thread and returns its JSON representation.
    pub async fn create_thread(&self, token: &str, title: &str, body: &str, tags: &[&str]) -> Value {
        let res = self
            .send(
                Method::POST,
                "/thread/create",
                Some(token),
                Some(json!({ "title": title, "body": body, "tags": tags })),
            )
            .await;
        assert_eq!(res.status, StatusCode::OK, "create thread: {}", res.body);
        res.body
    }

    pub async fn comment(&self, token: &str, thread_id: &str, body: &str) -> Value {
        let res = self
            .send(
                Method::POST,
                "/comment/create",
                Some(token),
                Some(json!({ "thread_id": thread_id, "body": body })),
            )
            .await;
        assert_eq!(res.status, StatusCode::OK, "create comment: {}", res.body);
        res.body
    }
}
