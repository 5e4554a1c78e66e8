//! OAuth 2.0 endpoint handlers.
//!
//! Implements:
//! - RFC 6749 §4.1: Authorization Code Grant (authorize, consent, token)
//! - RFC 8414: OAuth Authorization Server Metadata
//! - Client registration for relying parties

use std::sync::Arc;

use axum::{
    Json,
    extract::{Query, State, rejection::QueryRejection},
    http::{HeaderValue, StatusCode, header},
    response::{Html, IntoResponse, Response},
};
use chrono::Utc;
use serde::Deserialize;
use url::Url;

use super::consent;
use super::extract::FormOrJson;
use super::token::SignedToken;
use super::types::{AuthorizationCode, ConsentRequest, NewClient};
use crate::error::{OAuthError, OAuthResult};
use crate::server::transport::HttpState;

// ─── RFC 8414: Authorization Server Metadata ─────────────────────────────────

/// `GET /.well-known/oauth-authorization-server`
///
/// Describes the OAuth endpoints and capabilities.
pub async fn handle_auth_server_metadata(State(state): State<Arc<HttpState>>) -> impl IntoResponse {
    Json(serde_json::json!({
        "issuer": state.base_url,
        "authorization_endpoint": format!("{}/oauth2/authorize", state.base_url),
        "token_endpoint": format!("{}/oauth2/token", state.base_url),
        "registration_endpoint": format!("{}/register", state.base_url),
        "response_types_supported": ["code"],
        "grant_types_supported": ["authorization_code"],
        "token_endpoint_auth_methods_supported": ["none"]
    }))
}

// ─── Client Registration ─────────────────────────────────────────────────────

/// `POST /register`
///
/// Register a client with a single exact-match redirect URI.
pub async fn handle_register(
    State(state): State<Arc<HttpState>>,
    FormOrJson(req): FormOrJson<NewClient>,
) -> OAuthResult<Response> {
    req.validate()?;

    let client = state.clients.create(req).await?;

    tracing::info!(client_id = %client.id, name = %client.name, "Registered OAuth client");

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({
            "client_id": client.id,
            "name": client.name,
            "redirect_uri": client.redirect_uri,
            "website": client.website,
            "logo": client.logo
        })),
    )
        .into_response())
}

// ─── Authorization Endpoint ──────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct AuthorizeQuery {
    pub client_id: Option<String>,
    pub redirect_uri: Option<String>,
    pub response_type: Option<String>,
    pub scope: Option<String>,
    pub state: Option<String>,
}

/// `GET /oauth2/authorize`
///
/// Validate the request and show the consent prompt. No code is allocated here.
pub async fn handle_authorize(
    State(state): State<Arc<HttpState>>,
    query: Result<Query<AuthorizeQuery>, QueryRejection>,
) -> OAuthResult<Response> {
    let Query(query) = query.map_err(|e| OAuthError::invalid_request(e.body_text()))?;

    // Checked before touching the registry
    let response_type = query.response_type.unwrap_or_default();
    if response_type != "code" {
        return Err(OAuthError::UnsupportedResponseType(response_type));
    }

    let client_id = query.client_id.unwrap_or_default();
    let Some(client) = state.clients.lookup(&client_id).await? else {
        return Err(OAuthError::InvalidClient);
    };

    // Exact match only; prefix matching would allow open redirects
    if query.redirect_uri.as_deref() != Some(client.redirect_uri.as_str()) {
        return Err(OAuthError::InvalidRedirectUri);
    }

    let request = ConsentRequest {
        client_id: client.id,
        client_name: client.name,
        redirect_uri: client.redirect_uri,
        state: query.state.unwrap_or_default(),
        scope: query.scope.unwrap_or_default(),
    };
    let consent_ref = state.consents.begin(request.clone()).await;

    tracing::debug!(client_id = %request.client_id, "Showing consent prompt");

    let mut response = Html(consent::render_consent_page(&request, &consent_ref)).into_response();
    response.headers_mut().insert(header::CACHE_CONTROL, HeaderValue::from_static("no-store"));
    Ok(response)
}

// ─── Consent Callback ────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ConsentQuery {
    pub consent: Option<String>,
    pub approved: Option<String>,
    pub state: Option<String>,
    pub client_id: Option<String>,
    pub redirect_uri: Option<String>,
}

/// `GET /oauth2/consent`
///
/// Apply the resource owner's decision and redirect back to the client.
pub async fn handle_consent(
    State(state): State<Arc<HttpState>>,
    query: Result<Query<ConsentQuery>, QueryRejection>,
) -> OAuthResult<Response> {
    let Query(query) = query.map_err(|e| OAuthError::invalid_request(e.body_text()))?;

    let Some(consent_ref) = query.consent.as_deref() else {
        return Err(OAuthError::invalid_request("Missing consent reference"));
    };
    let Some(request) = state.consents.take(consent_ref).await else {
        return Err(OAuthError::invalid_request("Unknown or expired consent reference"));
    };
    if !request.matches(
        query.client_id.as_deref(),
        query.redirect_uri.as_deref(),
        query.state.as_deref(),
    ) {
        return Err(OAuthError::invalid_request(
            "Consent parameters do not match the authorization request",
        ));
    }

    if query.approved.as_deref() != Some("true") {
        tracing::info!(client_id = %request.client_id, "Resource owner denied access");
        return redirect_with(
            &request.redirect_uri,
            &[("error", "access_denied")],
            &request.state,
        );
    }

    let code = AuthorizationCode::issue(request.client_id.as_str(), Utc::now());
    let code_value = code.code.clone();
    state.codes.insert(code).await?;

    tracing::info!(client_id = %request.client_id, "Issued authorization code");

    redirect_with(&request.redirect_uri, &[("code", code_value.as_str())], &request.state)
}

// ─── Token Endpoint ──────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct TokenRequest {
    pub grant_type: Option<String>,
    pub code: Option<String>,
    pub redirect_uri: Option<String>,
    pub client_id: Option<String>,
}

/// `POST /oauth2/token`
///
/// Exchange an authorization code for an access token.
pub async fn handle_token(
    State(state): State<Arc<HttpState>>,
    FormOrJson(form): FormOrJson<TokenRequest>,
) -> OAuthResult<Response> {
    let Some(grant_type) = form.grant_type else {
        return Err(OAuthError::invalid_request("Missing grant_type"));
    };
    if grant_type != "authorization_code" {
        return Err(OAuthError::UnsupportedGrantType(grant_type));
    }

    let code = required(form.code, "code")?;
    let client_id = required(form.client_id, "client_id")?;
    let redirect_uri = required(form.redirect_uri, "redirect_uri")?;

    // Redirect URI binding, checked before the code is touched
    let Some(client) = state.clients.lookup(&client_id).await? else {
        return Err(OAuthError::InvalidGrant);
    };
    if client.redirect_uri != redirect_uri {
        return Err(OAuthError::InvalidGrant);
    }

    // Sign first so a signing failure never burns the code
    let now = Utc::now();
    let token = state.signer.issue(&client_id, now)?;

    if state.codes.consume(&code, &client_id, now).await?.is_none() {
        return Err(OAuthError::InvalidGrant);
    }

    tracing::info!(client_id = %client_id, "Issued access token");

    Ok(token_success(&token))
}

fn required(value: Option<String>, name: &str) -> OAuthResult<String> {
    value
        .filter(|v| !v.is_empty())
        .ok_or_else(|| OAuthError::invalid_request(format!("Missing {name}")))
}

/// Build a token response with required OAuth 2.0 cache headers (RFC 6749 §5.1).
fn token_success(token: &SignedToken) -> Response {
    let mut response = Json(serde_json::json!({
        "access_token": token.access_token,
        "token_type": "Bearer",
        "expires_in": token.expires_in
    }))
    .into_response();

    let headers = response.headers_mut();
    headers.insert(header::CACHE_CONTROL, HeaderValue::from_static("no-store"));
    headers.insert(header::PRAGMA, HeaderValue::from_static("no-cache"));
    response
}

/// Redirect to `redirect_uri` with `params` appended, plus `state` when the client sent one.
///
/// Any query string already on the registered URI is preserved.
fn redirect_with(redirect_uri: &str, params: &[(&str, &str)], state: &str) -> OAuthResult<Response> {
    let mut url = Url::parse(redirect_uri)
        .map_err(|e| OAuthError::internal(format!("Registered redirect URI is invalid: {e}")))?;
    {
        let mut query = url.query_pairs_mut();
        query.extend_pairs(params);
        if !state.is_empty() {
            query.append_pair("state", state);
        }
    }

    Ok((StatusCode::FOUND, [(header::LOCATION, url.to_string())]).into_response())
}
