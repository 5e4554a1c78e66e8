//! Authorization server runtime.
//!
//! Wires the OAuth endpoints into an axum HTTP server and runs the background
//! sweep that drops expired authorization codes.

pub mod oauth;
pub mod transport;

use std::net::SocketAddr;
use std::sync::Arc;

use crate::config::Config;
use transport::HttpState;

/// OAuth 2.0 authorization server.
pub struct AuthServer {
    config: Config,
    state: HttpState,
}

impl AuthServer {
    /// Create a server backed by in-memory storage.
    #[must_use]
    pub fn new(config: Config) -> Self {
        let state = HttpState::new(&config);
        Self { config, state }
    }

    /// Run the HTTP server until Ctrl+C.
    ///
    /// # Errors
    ///
    /// Returns error on bind or server failure.
    pub async fn run_http(self) -> anyhow::Result<()> {
        let addr = SocketAddr::from(([0, 0, 0, 0], self.config.port));

        let cleanup =
            oauth::start_cleanup_task(Arc::clone(&self.state.codes), self.config.cleanup_interval);
        let router = transport::create_router(self.state);

        let listener = tokio::net::TcpListener::bind(addr).await?;
        tracing::info!(issuer = %self.config.base_url, "HTTP server listening on http://{}", addr);

        axum::serve(listener, router).with_graceful_shutdown(shutdown_signal()).await?;

        cleanup.abort();
        tracing::info!("HTTP server shut down");
        Ok(())
    }
}

impl std::fmt::Debug for AuthServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthServer").field("config", &self.config).finish_non_exhaustive()
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to install CTRL+C handler");
        std::future::pending::<()>().await;
    }
    tracing::info!("Received shutdown signal");
}
