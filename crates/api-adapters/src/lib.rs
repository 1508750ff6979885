//! # api-adapters
//!
//! The HTTP surface of the forum. Handlers only parse input, authenticate
//! and call into `services`; every rule lives below this crate.
//!
//! # Developer Note
//! Routes are mounted under a configurable base path (`/api/v1` by default).
//! `/healthz` and `/metrics` always sit at the root so probes do not depend on
//! the deployment prefix.

pub mod dto;
pub mod metrics;

#[cfg(feature = "web-axum")]
pub mod error;
#[cfg(feature = "web-axum")]
pub mod extract;
#[cfg(feature = "web-axum")]
pub mod handlers;
#[cfg(feature = "web-axum")]
mod router;
#[cfg(feature = "web-axum")]
mod state;

pub use metrics::HttpMetrics;

#[cfg(feature = "web-axum")]
pub use error::ApiError;
#[cfg(feature = "web-axum")]
pub use router::{cors_layer, router};
#[cfg(feature = "web-axum")]
pub use state::AppState;
