//! Error types for the OAuth 2.0 authorization server.
//!
//! Uses `thiserror` for structured error handling with automatic `From` implementations.
//! Every [`OAuthError`] renders as an RFC 6749 §5.2 style JSON body.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

/// Errors from the client registry and authorization code store.
#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    /// A unique field is already taken by another client.
    #[error("Duplicate {field}: {value}")]
    Conflict {
        /// Name of the conflicting field
        field: &'static str,
        /// The rejected value
        value: String,
    },

    /// The backing storage could not serve the request.
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    /// Create a uniqueness conflict error.
    #[must_use]
    pub fn conflict(field: &'static str, value: impl Into<String>) -> Self {
        Self::Conflict { field, value: value.into() }
    }

    /// Create an unavailable error.
    #[must_use]
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable(message.into())
    }
}

/// Errors from access token signing and verification.
#[derive(thiserror::Error, Debug)]
pub enum TokenError {
    /// The token could not be signed.
    #[error("Failed to sign token: {0}")]
    Signing(#[source] jsonwebtoken::errors::Error),

    /// The token failed signature or claim validation.
    #[error("Token verification failed: {0}")]
    Verification(#[source] jsonwebtoken::errors::Error),
}

/// Errors surfaced by the OAuth endpoints.
#[derive(thiserror::Error, Debug)]
pub enum OAuthError {
    /// Malformed query or body, or a missing required parameter
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// `response_type` other than `code`
    #[error("Unsupported response type: {0}")]
    UnsupportedResponseType(String),

    /// Unknown or deleted client
    #[error("Client not found")]
    InvalidClient,

    /// Redirect URI does not exactly match the registered one
    #[error("Invalid redirect URI")]
    InvalidRedirectUri,

    /// `grant_type` other than `authorization_code`
    #[error("Unsupported grant type: {0}")]
    UnsupportedGrantType(String),

    /// Unknown, consumed, expired or foreign authorization code
    #[error("Invalid or expired authorization code")]
    InvalidGrant,

    /// Registration metadata failed validation
    #[error("Invalid client metadata: {0}")]
    InvalidClientMetadata(String),

    /// Registration metadata collides with an existing client
    #[error("Client already registered: {0}")]
    ClientConflict(String),

    /// Storage failure
    #[error("Store error: {0}")]
    Store(StoreError),

    /// Token signing failure
    #[error("Token error: {0}")]
    Token(#[from] TokenError),

    /// Any other server-side fault
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<StoreError> for OAuthError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict { field, value } => {
                Self::ClientConflict(format!("{field} '{value}' is already registered"))
            }
            other => Self::Store(other),
        }
    }
}

impl OAuthError {
    /// Create an invalid request error.
    #[must_use]
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest(message.into())
    }

    /// Create an internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Machine-readable error code for the `error` field.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidRequest(_) => "invalid_request",
            Self::UnsupportedResponseType(_) => "unsupported_response_type",
            Self::InvalidClient => "invalid_client",
            Self::InvalidRedirectUri => "invalid_redirect_uri",
            Self::UnsupportedGrantType(_) => "unsupported_grant_type",
            Self::InvalidGrant => "invalid_grant",
            Self::InvalidClientMetadata(_) | Self::ClientConflict(_) => "invalid_client_metadata",
            Self::Store(_) | Self::Token(_) | Self::Internal(_) => "server_error",
        }
    }

    /// HTTP status for this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::InvalidClient | Self::InvalidRedirectUri => StatusCode::UNAUTHORIZED,
            Self::ClientConflict(_) => StatusCode::CONFLICT,
            Self::Store(_) | Self::Token(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            _ => StatusCode::BAD_REQUEST,
        }
    }

    /// Returns true for faults on the server side.
    #[must_use]
    pub const fn is_server_error(&self) -> bool {
        matches!(self, Self::Store(_) | Self::Token(_) | Self::Internal(_))
    }

    /// Description safe to show to the caller. Server faults stay generic.
    #[must_use]
    pub fn description(&self) -> String {
        if self.is_server_error() { "Internal server error".to_string() } else { self.to_string() }
    }
}

impl IntoResponse for OAuthError {
    fn into_response(self) -> Response {
        if self.is_server_error() {
            tracing::error!(error = %self, "OAuth request failed");
        } else {
            tracing::warn!(error = self.error_code(), reason = %self, "OAuth request rejected");
        }

        (
            self.status(),
            Json(serde_json::json!({
                "error": self.error_code(),
                "error_description": self.description()
            })),
        )
            .into_response()
    }
}

/// Result type alias for endpoint operations.
pub type OAuthResult<T> = Result<T, OAuthError>;
