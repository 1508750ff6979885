use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderValue, Method, Request};
use axum::middleware::from_fn_with_state;
use axum::routing::{get, post, put};
use axum::Router;
use tower::ServiceBuilder;
use tower_http::compression::CompressionLayer;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;
use tracing::info_span;

use crate::handlers::{comments, health, tags, threads, users};
use crate::metrics;
use crate::state::AppState;

/// CORS policy: a single allowed origin, or any origin when none is given.
pub fn cors_layer(origin: Option<&str>) -> Result<CorsLayer, axum::http::header::InvalidHeaderValue> {
    let allow_origin = match origin {
        Some(origin) => AllowOrigin::exact(HeaderValue::from_str(origin)?),
        None => AllowOrigin::from(Any),
    };
    Ok(CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE]))
}

fn forum_routes() -> Router<AppState> {
    Router::new()
        .route("/user/create", post(users::create_user))
        .route("/user/login", post(users::login))
        .route("/thread/create", post(threads::create_thread))
        .route("/thread/search", get(threads::search_threads))
        .route("/thread", get(threads::search_threads))
        .route(
            "/thread/{id}",
            get(threads::get_thread)
                .put(threads::update_thread)
                .delete(threads::delete_thread),
        )
        .route("/thread/{id}/comments", get(comments::list_comments))
        .route("/comment/create", post(comments::create_comment))
        .route(
            "/comment/{id}",
            put(comments::update_comment).delete(comments::delete_comment),
        )
        .route("/tags", get(tags::list_tags))
}

/// Creates the application router with all routes and middleware.
///
/// `base_path` must already be normalised (`/` or `/segment/...`).
pub fn router(state: AppState, base_path: &str, cors: CorsLayer) -> Router {
    let forum = if base_path == "/" {
        forum_routes()
    } else {
        Router::new().nest(base_path, forum_routes())
    };

    forum
        .route("/healthz", get(health::healthz))
        .route("/metrics", get(health::metrics))
        .route_layer(from_fn_with_state(state.metrics.clone(), metrics::track))
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(
                    TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                        let request_id = request
                            .headers()
                            .get("x-request-id")
                            .and_then(|value| value.to_str().ok())
                            .unwrap_or("-");
                        info_span!(
                            "http",
                            method = %request.method(),
                            uri = %request.uri(),
                            request_id,
                        )
                    }),
                )
                .layer(PropagateRequestIdLayer::x_request_id())
                .layer(CompressionLayer::new())
                .layer(cors),
        )
}
