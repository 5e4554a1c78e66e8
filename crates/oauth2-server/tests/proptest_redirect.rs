//! Property-based tests for exact redirect URI matching.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use proptest::prelude::*;
use tower::ServiceExt;

use oauth2_server::config::Config;
use oauth2_server::server::oauth::{
    ClientRegistry, InMemoryClientRegistry, InMemoryCodeStore, NewClient,
};
use oauth2_server::server::transport::{HttpState, create_router};

const REGISTERED: &str = "https://app.test/cb";

/// Apply a single-character edit at `index`: 0 = replace, 1 = insert, 2 = delete.
fn mutate(original: &str, op: u8, index: usize, ch: char) -> String {
    let mut chars: Vec<char> = original.chars().collect();
    let index = index % chars.len();
    match op {
        0 => chars[index] = ch,
        1 => chars.insert(index, ch),
        _ => {
            chars.remove(index);
        }
    }
    chars.into_iter().collect()
}

/// Authorize against a freshly registered client and return the response status.
async fn authorize_with(redirect_uri: &str) -> StatusCode {
    let config = Config::for_testing("proptest-secret-0123456789abcdefgh");
    let registry = Arc::new(InMemoryClientRegistry::new());
    let codes = Arc::new(InMemoryCodeStore::new(config.code_ttl));
    let client = registry
        .create(NewClient {
            name: "Demo".into(),
            redirect_uri: REGISTERED.into(),
            website: None,
            logo: None,
        })
        .await
        .unwrap();
    let app = create_router(HttpState::with_stores(&config, registry, codes.clone()));

    let query = serde_urlencoded::to_string([
        ("client_id", client.id.as_str()),
        ("redirect_uri", redirect_uri),
        ("response_type", "code"),
        ("state", "S1"),
    ])
    .unwrap();
    let response = app
        .oneshot(Request::get(format!("/oauth2/authorize?{query}")).body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert!(codes.is_empty().await, "authorize must never allocate a code");
    response.status()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn one_character_edit_is_rejected(
        op in 0u8..3,
        index in any::<usize>(),
        ch in proptest::char::range('!', '~'),
    ) {
        let candidate = mutate(REGISTERED, op, index, ch);
        prop_assume!(candidate != REGISTERED);

        let rt = tokio::runtime::Runtime::new().unwrap();
        let status = rt.block_on(authorize_with(&candidate));
        prop_assert_eq!(status, StatusCode::UNAUTHORIZED);
    }
}

#[tokio::test]
async fn exact_redirect_uri_is_accepted() {
    assert_eq!(authorize_with(REGISTERED).await, StatusCode::OK);
}
