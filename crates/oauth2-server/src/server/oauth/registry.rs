//! Client registry: registered relying parties and their redirect URIs.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use super::types::{Client, NewClient};
use crate::error::StoreError;

/// Lookup and registration of OAuth clients.
///
/// The authorization and token endpoints only ever call [`ClientRegistry::lookup`].
#[async_trait]
pub trait ClientRegistry: Send + Sync {
    /// Find an active (not soft-deleted) client by ID.
    async fn lookup(&self, client_id: &str) -> Result<Option<Client>, StoreError>;

    /// Register a client, allocating a fresh ID.
    ///
    /// Names and redirect URIs are unique across all clients, including deleted ones.
    async fn create(&self, client: NewClient) -> Result<Client, StoreError>;

    /// Soft-delete a client. Returns false if no active client had that ID.
    async fn remove(&self, client_id: &str) -> Result<bool, StoreError>;
}

/// In-memory client registry.
#[derive(Clone, Default)]
pub struct InMemoryClientRegistry {
    clients: Arc<RwLock<HashMap<String, Client>>>,
}

impl InMemoryClientRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ClientRegistry for InMemoryClientRegistry {
    async fn lookup(&self, client_id: &str) -> Result<Option<Client>, StoreError> {
        let clients = self.clients.read().await;
        Ok(clients.get(client_id).filter(|c| !c.is_deleted()).cloned())
    }

    async fn create(&self, client: NewClient) -> Result<Client, StoreError> {
        let mut clients = self.clients.write().await;

        if clients.values().any(|c| c.name == client.name) {
            return Err(StoreError::conflict("name", client.name));
        }
        if clients.values().any(|c| c.redirect_uri == client.redirect_uri) {
            return Err(StoreError::conflict("redirect_uri", client.redirect_uri));
        }

        let registered = Client {
            id: uuid::Uuid::new_v4().simple().to_string(),
            name: client.name,
            website: client.website,
            logo: client.logo,
            redirect_uri: client.redirect_uri,
            created_at: Utc::now(),
            deleted_at: None,
        };
        clients.insert(registered.id.clone(), registered.clone());

        Ok(registered)
    }

    async fn remove(&self, client_id: &str) -> Result<bool, StoreError> {
        let mut clients = self.clients.write().await;
        match clients.get_mut(client_id) {
            Some(client) if !client.is_deleted() => {
                client.deleted_at = Some(Utc::now());
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

impl std::fmt::Debug for InMemoryClientRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryClientRegistry").finish()
    }
}
