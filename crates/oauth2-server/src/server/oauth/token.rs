//! Access token signing.
//!
//! Access tokens are HS256 JWTs carrying `client_id`, `iat` and `exp`. They are never
//! stored: a token is valid iff its signature and expiry check out.

use std::time::Duration;

use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::error::TokenError;

/// Claims carried by an access token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessTokenClaims {
    pub client_id: String,
    #[serde(rename = "iat")]
    pub issued_at: i64,
    #[serde(rename = "exp")]
    pub expires_at: i64,
}

/// A freshly signed access token.
#[derive(Debug, Clone)]
pub struct SignedToken {
    pub access_token: String,
    pub claims: AccessTokenClaims,
    pub expires_in: u64,
}

/// Signs and verifies access tokens with a process-wide secret.
#[derive(Clone)]
pub struct TokenSigner {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    lifetime: Duration,
}

impl TokenSigner {
    #[must_use]
    pub fn new(secret: &[u8], lifetime: Duration) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            lifetime,
        }
    }

    /// Sign a token for `client_id` issued at `now`.
    pub fn issue(&self, client_id: &str, now: DateTime<Utc>) -> Result<SignedToken, TokenError> {
        let issued_at = now.timestamp();
        let lifetime = i64::try_from(self.lifetime.as_secs()).unwrap_or(i64::MAX);
        let claims = AccessTokenClaims {
            client_id: client_id.to_owned(),
            issued_at,
            expires_at: issued_at.saturating_add(lifetime),
        };

        let access_token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(TokenError::Signing)?;

        Ok(SignedToken { access_token, claims, expires_in: self.lifetime.as_secs() })
    }

    /// Verify the signature and expiry of `token` and return its claims.
    pub fn verify(&self, token: &str) -> Result<AccessTokenClaims, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_required_spec_claims(&["exp", "iat"]);

        decode::<AccessTokenClaims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(TokenError::Verification)
    }
}

impl std::fmt::Debug for TokenSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenSigner").field("lifetime", &self.lifetime).finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &[u8] = b"0123456789abcdef0123456789abcdef";
    const DAY: Duration = Duration::from_secs(86400);

    #[test]
    fn test_issue_and_verify() {
        let signer = TokenSigner::new(SECRET, DAY);
        let now = Utc::now();
        let token = signer.issue("C1", now).unwrap();

        assert_eq!(token.expires_in, 86400);
        assert_eq!(token.claims.expires_at - token.claims.issued_at, 86400);

        let claims = signer.verify(&token.access_token).unwrap();
        assert_eq!(claims.client_id, "C1");
        assert_eq!(claims.issued_at, now.timestamp());
        assert_eq!(claims.expires_at, now.timestamp() + 86400);
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let signer = TokenSigner::new(SECRET, DAY);
        let other = TokenSigner::new(b"another-secret-another-secret-!!", DAY);
        let token = signer.issue("C1", Utc::now()).unwrap();

        assert!(matches!(other.verify(&token.access_token), Err(TokenError::Verification(_))));
    }

    #[test]
    fn test_expired_token_rejected() {
        let signer = TokenSigner::new(SECRET, DAY);
        let token = signer.issue("C1", Utc::now() - chrono::Duration::days(2)).unwrap();

        assert!(signer.verify(&token.access_token).is_err());
    }

    #[test]
    fn test_spliced_signature_rejected() {
        let signer = TokenSigner::new(SECRET, DAY);
        let now = Utc::now();
        let mine = signer.issue("C1", now).unwrap().access_token;
        let theirs = signer.issue("C2", now).unwrap().access_token;

        // C2's header and payload under C1's signature
        let (payload, _) = theirs.rsplit_once('.').unwrap();
        let (_, signature) = mine.rsplit_once('.').unwrap();
        let spliced = format!("{payload}.{signature}");

        assert!(signer.verify(&spliced).is_err());
    }
}
