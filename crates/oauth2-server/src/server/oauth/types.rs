//! OAuth 2.0 types for the authorization code grant.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::error::{OAuthError, OAuthResult};

/// A registered OAuth client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Client {
    pub id: String,
    pub name: String,
    pub website: Option<String>,
    pub logo: Option<String>,
    pub redirect_uri: String,
    pub created_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Client {
    /// Soft-deleted clients are kept for uniqueness but never returned from lookups.
    #[must_use]
    pub const fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}

/// Registration metadata submitted by a client developer.
#[derive(Debug, Clone, Deserialize)]
pub struct NewClient {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub redirect_uri: String,
    pub website: Option<String>,
    pub logo: Option<String>,
}

impl NewClient {
    /// Check that the name is present and the redirect URI is an absolute URL
    /// without a fragment (RFC 6749 §3.1.2).
    pub fn validate(&self) -> OAuthResult<()> {
        if self.name.trim().is_empty() {
            return Err(OAuthError::InvalidClientMetadata("name is required".into()));
        }
        if self.redirect_uri.is_empty() {
            return Err(OAuthError::InvalidClientMetadata("redirect_uri is required".into()));
        }

        let parsed = url::Url::parse(&self.redirect_uri).map_err(|e| {
            OAuthError::InvalidClientMetadata(format!("redirect_uri is not an absolute URL: {e}"))
        })?;
        if parsed.fragment().is_some() {
            return Err(OAuthError::InvalidClientMetadata(
                "redirect_uri must not contain a fragment".into(),
            ));
        }
        Ok(())
    }
}

/// An authorization code issued after the resource owner approved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorizationCode {
    pub code: String,
    pub client_id: String,
    pub issued_at: DateTime<Utc>,
}

impl AuthorizationCode {
    /// Mint a fresh, unguessable code bound to `client_id`.
    #[must_use]
    pub fn issue(client_id: impl Into<String>, issued_at: DateTime<Utc>) -> Self {
        Self { code: generate_token(), client_id: client_id.into(), issued_at }
    }

    /// Check if the code is older than `ttl` at `now`.
    #[must_use]
    pub fn is_expired_at(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        (now - self.issued_at).to_std().is_ok_and(|age| age > ttl)
    }
}

/// A validated authorization request awaiting the owner's decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsentRequest {
    pub client_id: String,
    pub client_name: String,
    pub redirect_uri: String,
    pub state: String,
    pub scope: String,
}

impl ConsentRequest {
    /// Check the echoed consent callback parameters against the stored request.
    ///
    /// Absent values compare as empty strings.
    #[must_use]
    pub fn matches(
        &self,
        client_id: Option<&str>,
        redirect_uri: Option<&str>,
        state: Option<&str>,
    ) -> bool {
        client_id.unwrap_or_default() == self.client_id
            && redirect_uri.unwrap_or_default() == self.redirect_uri
            && state.unwrap_or_default() == self.state
    }
}

/// Generate a random token using two UUIDs (244 random bits).
pub(crate) fn generate_token() -> String {
    format!("{}{}", uuid::Uuid::new_v4().simple(), uuid::Uuid::new_v4().simple())
}
