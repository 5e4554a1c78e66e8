//! Authorization code store.
//!
//! Codes live here from consent approval until redemption or expiry. Redemption is a
//! single check-and-remove under one write lock, so concurrent exchanges of the same
//! code observe at most one success.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tokio::task::JoinHandle;

use super::types::AuthorizationCode;
use crate::error::StoreError;

/// Storage for outstanding authorization codes.
#[async_trait]
pub trait AuthCodeStore: Send + Sync {
    /// Persist a freshly issued code.
    async fn insert(&self, code: AuthorizationCode) -> Result<(), StoreError>;

    /// Atomically remove and return the code if it was issued to `client_id` and has
    /// not expired at `now`.
    ///
    /// A code presented by a different client is left untouched. An expired code is
    /// deleted and reported as absent.
    async fn consume(
        &self,
        code: &str,
        client_id: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<AuthorizationCode>, StoreError>;

    /// Delete every code expired at `now`. Returns how many were removed.
    async fn purge_expired(&self, now: DateTime<Utc>) -> Result<usize, StoreError>;
}

/// In-memory authorization code store.
#[derive(Clone)]
pub struct InMemoryCodeStore {
    codes: Arc<RwLock<HashMap<String, AuthorizationCode>>>,
    ttl: Duration,
}

impl InMemoryCodeStore {
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self { codes: Arc::new(RwLock::new(HashMap::new())), ttl }
    }

    /// Number of outstanding codes, expired or not.
    pub async fn len(&self) -> usize {
        self.codes.read().await.len()
    }

    /// Returns true if no codes are outstanding.
    pub async fn is_empty(&self) -> bool {
        self.codes.read().await.is_empty()
    }
}

#[async_trait]
impl AuthCodeStore for InMemoryCodeStore {
    async fn insert(&self, code: AuthorizationCode) -> Result<(), StoreError> {
        self.codes.write().await.insert(code.code.clone(), code);
        Ok(())
    }

    async fn consume(
        &self,
        code: &str,
        client_id: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<AuthorizationCode>, StoreError> {
        let mut codes = self.codes.write().await;

        let Some(entry) = codes.get(code) else {
            return Ok(None);
        };
        if entry.client_id != client_id {
            return Ok(None);
        }
        if entry.is_expired_at(now, self.ttl) {
            codes.remove(code);
            tracing::debug!(client_id = %client_id, "Dropped expired authorization code on read");
            return Ok(None);
        }

        Ok(codes.remove(code))
    }

    async fn purge_expired(&self, now: DateTime<Utc>) -> Result<usize, StoreError> {
        let mut codes = self.codes.write().await;
        let before = codes.len();
        codes.retain(|_, code| !code.is_expired_at(now, self.ttl));
        Ok(before - codes.len())
    }
}

impl std::fmt::Debug for InMemoryCodeStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryCodeStore").field("ttl", &self.ttl).finish()
    }
}

/// Start background cleanup task for expired codes.
pub fn start_cleanup_task(store: Arc<dyn AuthCodeStore>, every: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(every);
        loop {
            interval.tick().await;
            match store.purge_expired(Utc::now()).await {
                Ok(0) => {}
                Ok(count) => tracing::debug!(count, "Cleaned up expired authorization codes"),
                Err(e) => tracing::error!(error = %e, "Authorization code cleanup failed"),
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const TTL: Duration = Duration::from_secs(600);

    #[tokio::test]
    async fn test_auth_code_lifecycle() {
        let store = InMemoryCodeStore::new(TTL);
        let code = AuthorizationCode::issue("client1", Utc::now());
        let value = code.code.clone();
        store.insert(code).await.unwrap();

        // First consume succeeds
        let consumed = store.consume(&value, "client1", Utc::now()).await.unwrap();
        assert_eq!(consumed.unwrap().client_id, "client1");

        // Second consume fails (already redeemed)
        assert!(store.consume(&value, "client1", Utc::now()).await.unwrap().is_none());
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_foreign_client_cannot_consume() {
        let store = InMemoryCodeStore::new(TTL);
        let code = AuthorizationCode::issue("client1", Utc::now());
        let value = code.code.clone();
        store.insert(code).await.unwrap();

        assert!(store.consume(&value, "client2", Utc::now()).await.unwrap().is_none());

        // The rightful client can still redeem it
        assert!(store.consume(&value, "client1", Utc::now()).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_expired_code_is_absent_and_deleted() {
        let store = InMemoryCodeStore::new(TTL);
        let issued_at = Utc::now();
        let code = AuthorizationCode::issue("client1", issued_at);
        let value = code.code.clone();
        store.insert(code).await.unwrap();

        let later = issued_at + chrono::Duration::seconds(601);
        assert!(store.consume(&value, "client1", later).await.unwrap().is_none());
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_purge_expired() {
        let store = InMemoryCodeStore::new(TTL);
        let now = Utc::now();
        store.insert(AuthorizationCode::issue("old", now - chrono::Duration::hours(1))).await.unwrap();
        store.insert(AuthorizationCode::issue("fresh", now)).await.unwrap();

        assert_eq!(store.purge_expired(now).await.unwrap(), 1);
        assert_eq!(store.len().await, 1);
        assert_eq!(store.purge_expired(now).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_concurrent_redemption_single_winner() {
        let store = Arc::new(InMemoryCodeStore::new(TTL));
        let code = AuthorizationCode::issue("client1", Utc::now());
        let value = code.code.clone();
        store.insert(code).await.unwrap();

        let handles: Vec<_> = (0..16)
            .map(|_| {
                let store = Arc::clone(&store);
                let value = value.clone();
                tokio::spawn(async move { store.consume(&value, "client1", Utc::now()).await })
            })
            .collect();

        let mut winners = 0;
        for handle in handles {
            if handle.await.unwrap().unwrap().is_some() {
                winners += 1;
            }
        }
        assert_eq!(winners, 1);
    }

    #[tokio::test]
    async fn test_cleanup_task_purges_expired_codes() {
        let store = Arc::new(InMemoryCodeStore::new(TTL));
        store
            .insert(AuthorizationCode::issue("old", Utc::now() - chrono::Duration::hours(1)))
            .await
            .unwrap();

        let handle = start_cleanup_task(store.clone(), Duration::from_secs(60));
        // First tick fires immediately
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(store.is_empty().await);
        handle.abort();
    }
}
