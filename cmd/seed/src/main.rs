//! Fills a development database with a few users, threads and comments.
//!
//! Everything goes through the services, so the data obeys the same rules as
//! anything created over HTTP. Running it twice reuses the existing accounts
//! and adds another batch of threads.

use std::sync::Arc;

use anyhow::Context;
use auth_adapters::{Argon2PasswordHasher, JwtTokenService};
use domains::DomainError;
use secrecy::ExposeSecret;
use services::{CommentService, ThreadInput, ThreadService, UserService};
use storage_adapters::{
    connect, run_migrations, PgCommentRepository, PgThreadRepository, PgUserRepository,
};
use tracing::info;

const DEMO_PASSWORD: &str = "password1";
const DEMO_USERS: [&str; 3] = ["alice", "bob", "carol"];

struct DemoThread {
    author: &'static str,
    title: &'static str,
    body: &'static str,
    tags: &'static [&'static str],
    replies: &'static [(&'static str, &'static str)],
}

const DEMO_THREADS: &[DemoThread] = &[
    DemoThread {
        author: "alice",
        title: "Welcome to the forum",
        body: "Introduce yourself and tell us what you are working on.",
        tags: &["intro", "meta"],
        replies: &[("bob", "Hi all, mostly backend work here."), ("carol", "Hello!")],
    },
    DemoThread {
        author: "bob",
        title: "Async Rust without tears",
        body: "Which executor and which HTTP stack do you reach for first?",
        tags: &["rust", "async"],
        replies: &[("alice", "tokio and axum, every time.")],
    },
    DemoThread {
        author: "carol",
        title: "Full-text search in PostgreSQL",
        body: "Generated tsvector columns with a GIN index go a long way.",
        tags: &["postgres", "search"],
        replies: &[],
    },
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,sqlx=warn".into()),
        )
        .init();

    let config = configs::load().context("failed to load configuration")?;
    let pool = connect(config.database.url.expose_secret(), 2)
        .await
        .context("failed to connect to PostgreSQL")?;
    run_migrations(&pool)
        .await
        .context("failed to apply migrations")?;

    let users = UserService::new(
        Arc::new(PgUserRepository::new(pool.clone())),
        Arc::new(Argon2PasswordHasher::new()),
        Arc::new(JwtTokenService::new(
            config.auth.jwt_secret.expose_secret().as_bytes(),
            chrono::Duration::hours(config.auth.token_ttl_hours),
        )),
    );
    let threads = ThreadService::new(Arc::new(PgThreadRepository::new(pool.clone())));
    let comments = CommentService::new(Arc::new(PgCommentRepository::new(pool.clone())));

    for username in DEMO_USERS {
        match users.register(username, DEMO_PASSWORD).await {
            Ok(_) => info!(username, "user created"),
            Err(DomainError::Conflict(_)) => info!(username, "user already exists"),
            Err(err) => return Err(err).with_context(|| format!("failed to register {username}")),
        }
    }

    for demo in DEMO_THREADS {
        let input = ThreadInput {
            title: demo.title.to_string(),
            body: demo.body.to_string(),
            tags: demo.tags.iter().map(|t| t.to_string()).collect(),
        };
        let thread = threads
            .create_thread(demo.author, &input)
            .await
            .with_context(|| format!("failed to create thread {:?}", demo.title))?;
        let thread_id = thread.id.to_string();

        for (author, body) in demo.replies {
            comments
                .create_comment(author, &thread_id, body)
                .await
                .with_context(|| format!("failed to comment on {:?}", demo.title))?;
        }
    }

    info!(
        users = DEMO_USERS.len(),
        threads = DEMO_THREADS.len(),
        password = DEMO_PASSWORD,
        "seed complete"
    );
    pool.close().await;
    Ok(())
}
