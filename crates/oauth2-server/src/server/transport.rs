//! HTTP transport: shared handler state and the axum router.

use std::sync::Arc;

use axum::{
    Json, Router,
    response::IntoResponse,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use super::oauth::handlers;
use super::oauth::{
    AuthCodeStore, ClientRegistry, ConsentSessions, InMemoryClientRegistry, InMemoryCodeStore,
    TokenSigner,
};
use crate::config::{Config, defaults};

/// Shared state for HTTP handlers.
pub struct HttpState {
    /// Issuer URL for discovery metadata.
    pub base_url: String,
    pub clients: Arc<dyn ClientRegistry>,
    pub codes: Arc<dyn AuthCodeStore>,
    pub consents: ConsentSessions,
    pub signer: TokenSigner,
}

impl HttpState {
    /// Build state backed by the in-memory registry and code store.
    #[must_use]
    pub fn new(config: &Config) -> Self {
        Self::with_stores(
            config,
            Arc::new(InMemoryClientRegistry::new()),
            Arc::new(InMemoryCodeStore::new(config.code_ttl)),
        )
    }

    /// Build state around caller-provided storage.
    #[must_use]
    pub fn with_stores(
        config: &Config,
        clients: Arc<dyn ClientRegistry>,
        codes: Arc<dyn AuthCodeStore>,
    ) -> Self {
        Self {
            base_url: config.base_url.clone(),
            clients,
            codes,
            consents: ConsentSessions::new(config.consent_ttl, defaults::CONSENT_MAX_PENDING),
            signer: TokenSigner::new(config.signing_secret.as_bytes(), config.access_token_ttl),
        }
    }
}

impl std::fmt::Debug for HttpState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpState")
            .field("base_url", &self.base_url)
            .field("consents", &self.consents)
            .field("signer", &self.signer)
            .finish_non_exhaustive()
    }
}

/// Create the HTTP router for the authorization server.
pub fn create_router(state: HttpState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/.well-known/oauth-authorization-server", get(handlers::handle_auth_server_metadata))
        .route("/register", post(handlers::handle_register))
        .route("/oauth2/authorize", get(handlers::handle_authorize))
        .route("/oauth2/consent", get(handlers::handle_consent))
        .route("/oauth2/token", post(handlers::handle_token))
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(state))
}

async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "oauth2-server",
        "version": env!("CARGO_PKG_VERSION")
    }))
}
