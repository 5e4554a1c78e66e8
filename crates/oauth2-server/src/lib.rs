//! OAuth 2.0 Authorization Server
//!
//! An authorization server for the OAuth 2.0 Authorization Code Grant (RFC 6749 §4.1).
//! A registered client sends the resource owner to `/oauth2/authorize`, the owner
//! approves or denies on a consent page, and the client exchanges the resulting
//! single-use code at `/oauth2/token` for a signed bearer token.
//!
//! # Features
//!
//! - **Exact redirect URI binding**: no prefix or partial matching
//! - **Single-use codes**: atomic redemption, 10-minute expiry with background sweep
//! - **Bound consent**: the consent callback must present a server-issued reference
//! - **Stateless tokens**: HS256 JWTs verifiable by signature alone
//!
//! # Example
//!
//! ```no_run
//! use oauth2_server::{config::Config, server::AuthServer};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::new("a-signing-secret-of-at-least-32-bytes", None, 3000)?;
//!     AuthServer::new(config).run_http().await
//! }
//! ```

pub mod config;
pub mod error;
pub mod server;

pub use config::Config;
pub use error::{OAuthError, StoreError, TokenError};
pub use server::AuthServer;
