//! HTTP Server configuration and startup.

use std::sync::Arc;
use std::time::Duration;

use axum::{Router, routing::get};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use super::handlers::{self, AppState};
use crate::RateService;

/// HTTP Server for the rates API.
pub struct HttpServer {
    state: Arc<AppState>,
    timeout: Duration,
}

impl HttpServer {
    /// Creates a new HTTP server with the given service and a server-wide
    /// handler timeout.
    pub fn new(service: RateService, timeout: Duration) -> Self {
        Self {
            state: Arc::new(AppState { service }),
            timeout,
        }
    }

    /// Builds the Axum router with all routes.
    ///
    /// Handlers never perform network IO - every lookup is served from the
    /// in-process snapshot - so the timeout layer is a safety net, not a
    /// steady-state concern.
    pub fn router(&self) -> Router {
        Router::new()
            .route("/rates", get(handlers::get_rate))
            .route("/health", get(handlers::health))
            .route("/ready", get(handlers::ready))
            .layer(TimeoutLayer::new(self.timeout))
            .layer(TraceLayer::new_for_http())
            .with_state(self.state.clone())
    }

    /// Runs the server on the given address with graceful shutdown.
    pub async fn run(self, addr: &str) -> anyhow::Result<()> {
        let listener = tokio::net::TcpListener::bind(addr).await?;
        let local_addr = listener.local_addr()?;
        tracing::info!("Server listening on {}", local_addr);

        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        Ok(())
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown...");
}
