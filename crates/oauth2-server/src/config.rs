//! Configuration for the OAuth 2.0 authorization server.

use std::time::Duration;

/// Protocol and runtime defaults.
pub mod defaults {
    use std::time::Duration;

    /// Default HTTP port.
    pub const PORT: u16 = 3000;

    /// Authorization code lifetime (10 minutes).
    pub const CODE_TTL: Duration = Duration::from_secs(600);

    /// Access token lifetime (24 hours).
    pub const ACCESS_TOKEN_TTL: Duration = Duration::from_secs(24 * 3600);

    /// How long a consent prompt stays answerable (10 minutes).
    pub const CONSENT_TTL: Duration = Duration::from_secs(600);

    /// Expired code sweep interval (5 minutes).
    pub const CLEANUP_INTERVAL: Duration = Duration::from_secs(300);

    /// Maximum number of pending consent prompts held in memory.
    pub const CONSENT_MAX_PENDING: u64 = 10_000;

    /// Minimum HS256 secret length in bytes.
    pub const MIN_SECRET_LEN: usize = 32;
}

/// Server configuration.
#[derive(Clone)]
pub struct Config {
    /// HTTP listen port.
    pub port: u16,

    /// Public base URL used as issuer and in discovery metadata.
    pub base_url: String,

    /// HS256 secret used to sign access tokens.
    pub signing_secret: String,

    /// Authorization code lifetime.
    pub code_ttl: Duration,

    /// Access token lifetime.
    pub access_token_ttl: Duration,

    /// Pending consent lifetime.
    pub consent_ttl: Duration,

    /// Interval between expired code sweeps.
    pub cleanup_interval: Duration,
}

impl Config {
    /// Create a configuration with protocol defaults.
    ///
    /// The base URL defaults to `http://localhost:<port>`.
    ///
    /// # Errors
    ///
    /// Returns error if the signing secret is shorter than
    /// [`defaults::MIN_SECRET_LEN`] bytes.
    pub fn new(
        signing_secret: impl Into<String>,
        base_url: Option<String>,
        port: u16,
    ) -> anyhow::Result<Self> {
        let signing_secret = signing_secret.into();
        anyhow::ensure!(
            signing_secret.len() >= defaults::MIN_SECRET_LEN,
            "signing secret must be at least {} bytes",
            defaults::MIN_SECRET_LEN
        );

        let base_url = base_url
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or_else(|| format!("http://localhost:{port}"));

        Ok(Self {
            port,
            base_url,
            signing_secret,
            code_ttl: defaults::CODE_TTL,
            access_token_ttl: defaults::ACCESS_TOKEN_TTL,
            consent_ttl: defaults::CONSENT_TTL,
            cleanup_interval: defaults::CLEANUP_INTERVAL,
        })
    }

    /// Create a test configuration with a fixed secret and base URL.
    #[must_use]
    pub fn for_testing(signing_secret: &str) -> Self {
        Self {
            port: 0,
            base_url: "https://auth.test".to_string(),
            signing_secret: signing_secret.to_string(),
            code_ttl: defaults::CODE_TTL,
            access_token_ttl: defaults::ACCESS_TOKEN_TTL,
            consent_ttl: defaults::CONSENT_TTL,
            cleanup_interval: Duration::from_secs(3600),
        }
    }

    /// Access token lifetime in whole seconds, as reported in `expires_in`.
    #[must_use]
    pub const fn access_token_ttl_secs(&self) -> u64 {
        self.access_token_ttl.as_secs()
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("port", &self.port)
            .field("base_url", &self.base_url)
            .field("signing_secret", &"<redacted>")
            .field("code_ttl", &self.code_ttl)
            .field("access_token_ttl", &self.access_token_ttl)
            .field("consent_ttl", &self.consent_ttl)
            .field("cleanup_interval", &self.cleanup_interval)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "0123456789abcdef0123456789abcdef";

    #[test]
    fn test_config_defaults() {
        let config = Config::new(SECRET, None, 3000).unwrap();
        assert_eq!(config.base_url, "http://localhost:3000");
        assert_eq!(config.code_ttl, Duration::from_secs(600));
        assert_eq!(config.access_token_ttl_secs(), 86400);
    }

    #[test]
    fn test_config_trims_base_url() {
        let config = Config::new(SECRET, Some("https://auth.example.com/".into()), 8080).unwrap();
        assert_eq!(config.base_url, "https://auth.example.com");
    }

    #[test]
    fn test_config_rejects_short_secret() {
        let err = Config::new("your-secret-key", None, 3000).unwrap_err();
        assert!(err.to_string().contains("at least 32 bytes"));
    }

    #[test]
    fn test_debug_redacts_secret() {
        let config = Config::for_testing(SECRET);
        let debug = format!("{config:?}");
        assert!(!debug.contains(SECRET));
        assert!(debug.contains("<redacted>"));
    }
}
