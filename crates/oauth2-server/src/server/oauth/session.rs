//! Pending consent prompts.
//!
//! The authorize step parks the validated request here under an opaque reference.
//! The consent callback must present that reference, which binds the owner's
//! decision to the original request. References are single-use and expire.

use std::time::{Duration, Instant};

use moka::future::Cache;

use super::types::{ConsentRequest, generate_token};

#[derive(Clone)]
struct PendingConsent {
    request: ConsentRequest,
    created_at: Instant,
}

/// TTL-bounded store of authorization requests awaiting a decision.
#[derive(Clone)]
pub struct ConsentSessions {
    pending: Cache<String, PendingConsent>,
    ttl: Duration,
}

impl ConsentSessions {
    #[must_use]
    pub fn new(ttl: Duration, max_pending: u64) -> Self {
        let pending = Cache::builder().max_capacity(max_pending).time_to_live(ttl).build();
        Self { pending, ttl }
    }

    /// Park a validated request and return its consent reference.
    pub async fn begin(&self, request: ConsentRequest) -> String {
        let reference = generate_token();
        self.pending
            .insert(reference.clone(), PendingConsent { request, created_at: Instant::now() })
            .await;
        reference
    }

    /// Remove and return the request for `reference`, if it is still live.
    pub async fn take(&self, reference: &str) -> Option<ConsentRequest> {
        let pending = self.pending.remove(reference).await?;
        if pending.created_at.elapsed() > self.ttl {
            return None;
        }
        Some(pending.request)
    }
}

impl std::fmt::Debug for ConsentSessions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConsentSessions")
            .field("pending", &self.pending.entry_count())
            .field("ttl", &self.ttl)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> ConsentRequest {
        ConsentRequest {
            client_id: "C1".into(),
            client_name: "Demo".into(),
            redirect_uri: "https://app.test/cb".into(),
            state: "S1".into(),
            scope: "read".into(),
        }
    }

    #[tokio::test]
    async fn test_reference_is_single_use() {
        let sessions = ConsentSessions::new(Duration::from_secs(60), 100);
        let reference = sessions.begin(request()).await;

        assert_eq!(sessions.take(&reference).await, Some(request()));
        assert_eq!(sessions.take(&reference).await, None);
    }

    #[tokio::test]
    async fn test_unknown_reference() {
        let sessions = ConsentSessions::new(Duration::from_secs(60), 100);
        assert_eq!(sessions.take("forged").await, None);
    }

    #[tokio::test]
    async fn test_expired_reference() {
        let sessions = ConsentSessions::new(Duration::from_millis(20), 100);
        let reference = sessions.begin(request()).await;

        tokio::time::sleep(Duration::from_millis(60)).await;
        assert_eq!(sessions.take(&reference).await, None);
    }
}
