//! OAuth 2.0 authorization server.
//!
//! Implements the Authorization Code Grant as three cooperating steps glued together
//! only by redirects and the code store:
//! authorize (validate, show consent) → consent (mint code) → token (redeem code).
//!
//! ## Supported Standards
//! - RFC 6749: Authorization Code Grant
//! - RFC 7519: JWT access tokens (HS256)
//! - RFC 8414: OAuth Authorization Server Metadata

pub mod consent;
pub mod extract;
pub mod handlers;
pub mod registry;
pub mod session;
pub mod store;
pub mod token;
pub mod types;

pub use registry::{ClientRegistry, InMemoryClientRegistry};
pub use session::ConsentSessions;
pub use store::{AuthCodeStore, InMemoryCodeStore, start_cleanup_task};
pub use token::{AccessTokenClaims, TokenSigner};
pub use types::{AuthorizationCode, Client, ConsentRequest, NewClient};
