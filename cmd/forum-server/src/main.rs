//! # forum-server
//!
//! Assembles the forum from configuration: PostgreSQL repositories, Argon2 and
//! JWT for credentials, and the axum router on top.

use std::sync::Arc;

use anyhow::Context;
use api_adapters::{cors_layer, router, AppState};
use auth_adapters::{Argon2PasswordHasher, JwtTokenService};
use configs::{AppConfig, LogFormat};
use secrecy::ExposeSecret;
use services::{CommentService, ThreadService, UserService};
use storage_adapters::{
    connect, run_migrations, PgCommentRepository, PgThreadRepository, PgUserRepository,
};
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = configs::load().context("failed to load configuration")?;
    init_tracing(&config)?;
    config.warn_on_insecure_defaults();

    let pool = connect(
        config.database.url.expose_secret(),
        config.database.max_connections,
    )
    .await
    .context("failed to connect to PostgreSQL")?;

    if config.database.run_migrations {
        run_migrations(&pool)
            .await
            .context("failed to apply migrations")?;
    }

    let tokens = Arc::new(JwtTokenService::new(
        config.auth.jwt_secret.expose_secret().as_bytes(),
        chrono::Duration::hours(config.auth.token_ttl_hours),
    ));
    let state = AppState::new(
        UserService::new(
            Arc::new(PgUserRepository::new(pool.clone())),
            Arc::new(Argon2PasswordHasher::new()),
            tokens,
        ),
        ThreadService::new(Arc::new(PgThreadRepository::new(pool.clone()))),
        CommentService::new(Arc::new(PgCommentRepository::new(pool.clone()))),
    );

    let cors = cors_layer(config.server.cors_origin.as_deref())
        .context("server.cors_origin is not a valid header value")?;
    let app = router(state, &config.server.base_path, cors);

    let address = config.bind_address();
    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("failed to bind {address}"))?;
    info!(
        address = %address,
        base_path = %config.server.base_path,
        "forum server listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    pool.close().await;
    info!("shutdown complete");
    Ok(())
}

/// `RUST_LOG` wins over `log.filter` when set.
fn init_tracing(config: &AppConfig) -> anyhow::Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&config.log.filter)
            .with_context(|| format!("invalid log.filter `{}`", config.log.filter))?,
    };
    let registry = tracing_subscriber::registry().with(filter);

    match config.log.format {
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json().flatten_event(true))
            .try_init(),
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).try_init(),
    }
    .context("failed to install the tracing subscriber")
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("shutdown signal received");
}
