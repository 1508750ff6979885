//! Registration, login and bearer-token handling over HTTP.

use axum::http::{Method, StatusCode};
use integration_tests::{TestApp, PASSWORD};
use serde_json::json;

#[tokio::test]
async fn register_returns_username_and_token() {
    let app = TestApp::new();
    let res = app
        .send(
            Method::POST,
            "/user/create",
            None,
            Some(json!({ "username": "alice", "password": "secret1" })),
        )
        .await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["username"], "alice");
    assert!(res.body["token"].as_str().is_some_and(|t| !t.is_empty()));
}

#[tokio::test]
async fn duplicate_username_is_rejected() {
    let app = TestApp::new();
    app.register("alice").await;
    let res = app
        .send(
            Method::POST,
            "/user/create",
            None,
            Some(json!({ "username": "alice", "password": "another1" })),
        )
        .await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert!(res.body["error"].as_str().is_some());
}

#[tokio::test]
async fn registration_input_rules() {
    let app = TestApp::new();
    for body in [
        json!({ "username": "alice", "password": "12345" }),
        json!({ "username": "", "password": "secret1" }),
        json!({ "username": "al ice", "password": "secret1" }),
        json!({ "username": "a".repeat(31), "password": "secret1" }),
    ] {
        let res = app.send(Method::POST, "/user/create", None, Some(body)).await;
        assert_eq!(res.status, StatusCode::BAD_REQUEST, "{}", res.body);
    }
}

#[tokio::test]
async fn login_issues_a_working_token() {
    let app = TestApp::new();
    app.register("alice").await;

    let res = app
        .send(
            Method::POST,
            "/user/login",
            None,
            Some(json!({ "username": "alice", "password": PASSWORD })),
        )
        .await;
    assert_eq!(res.status, StatusCode::OK);
    let token = res.body["token"].as_str().unwrap().to_string();

    let created = app.create_thread(&token, "Hello", "World", &[]).await;
    assert_eq!(created["creator"], "alice");
}

#[tokio::test]
async fn bad_credentials_share_one_answer() {
    let app = TestApp::new();
    app.register("alice").await;

    let wrong_password = app
        .send(
            Method::POST,
            "/user/login",
            None,
            Some(json!({ "username": "alice", "password": "nope-nope" })),
        )
        .await;
    let unknown_user = app
        .send(
            Method::POST,
            "/user/login",
            None,
            Some(json!({ "username": "mallory", "password": PASSWORD })),
        )
        .await;
    assert_eq!(wrong_password.status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_user.status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_password.body, unknown_user.body);
}

#[tokio::test]
async fn writes_require_a_valid_bearer_token() {
    let app = TestApp::new();
    let body = json!({ "title": "Hello", "body": "World", "tags": [] });

    let missing = app
        .send(Method::POST, "/thread/create", None, Some(body.clone()))
        .await;
    assert_eq!(missing.status, StatusCode::UNAUTHORIZED);

    let forged = app
        .send(Method::POST, "/thread/create", Some("not-a-token"), Some(body))
        .await;
    assert_eq!(forged.status, StatusCode::UNAUTHORIZED);
    assert_eq!(forged.body["error"], "invalid or expired token");
}

#[tokio::test]
async fn malformed_json_gets_the_error_envelope() {
    let app = TestApp::new();
    let res = app
        .send_raw(Method::POST, "/user/create", None, Some("{not json"))
        .await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.body["error"], "malformed request payload");
}

#[tokio::test]
async fn operational_endpoints_live_at_the_root() {
    let app = TestApp::new();
    let health = app.send(Method::GET, "!/healthz", None, None).await;
    assert_eq!(health.status, StatusCode::OK);
    assert_eq!(health.body, json!("ok"));

    app.send(Method::GET, "/thread", None, None).await;
    let metrics = app.send(Method::GET, "!/metrics", None, None).await;
    assert_eq!(metrics.status, StatusCode::OK);
    let text = metrics.body.as_str().unwrap();
    assert!(text.contains("forum_http_requests_total"));
    assert!(text.contains("route=\"/api/v1/thread\""));
}
