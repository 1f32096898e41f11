//! Webhook listener for threshold.
//!
//! Accepts `pull_request` webhook deliveries, evaluates them against the
//! configured thresholds, and reacts on the source-control host. Binds to
//! `127.0.0.1:8080` unless configured otherwise.
//!
//! # Examples
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use threshold_core::Config;
//! use threshold_github::github::GitHubClient;
//! use threshold_server::AppState;
//!
//! # async fn example() -> Result<(), threshold_core::ThresholdError> {
//! let config = Config::default();
//! let client = Arc::new(GitHubClient::new(&config.github)?);
//! let state = Arc::new(AppState::new(config.thresholds.clone(), client));
//! threshold_server::serve(&config.server.bind, state).await?;
//! # Ok(())
//! # }
//! ```

pub mod event;
mod handler;
pub mod reactor;
mod state;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use threshold_core::ThresholdError;
use tokio::net::TcpListener;

pub use handler::{handle_delivery, health, webhook};
pub use state::AppState;

/// Build the router: `POST /` and `POST /webhook` take deliveries,
/// `GET /health` answers `ok`.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", post(webhook))
        .route("/webhook", post(webhook))
        .route("/health", get(health))
        .with_state(state)
}

/// Bind `addr` and serve until the process is stopped.
///
/// # Errors
///
/// Returns [`ThresholdError::Config`] if the address cannot be bound, or
/// [`ThresholdError::Io`] if the server fails.
pub async fn serve(addr: &str, state: Arc<AppState>) -> Result<(), ThresholdError> {
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| ThresholdError::Config(format!("failed to bind {addr}: {e}")))?;
    serve_on(listener, state).await
}

/// Serve on an already-bound listener.
pub async fn serve_on(listener: TcpListener, state: Arc<AppState>) -> Result<(), ThresholdError> {
    if let Ok(local) = listener.local_addr() {
        tracing::info!(%local, "threshold listening");
    }
    axum::serve(listener, router(state)).await?;
    Ok(())
}
