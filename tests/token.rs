mod common;

use azure_ops::api::constants::{MANAGEMENT_AUDIENCE, VAULT_AUDIENCE};
use azure_ops::error::OpsError;
use azure_ops::ops::fetch_access_token;
use common::{FakeTokens, MemorySessionStore, session};

#[tokio::test]
async fn test_no_session_fails_before_any_request() {
    let tokens = FakeTokens::default();
    let store = MemorySessionStore::empty();

    let err = fetch_access_token(&tokens, &store, None, None)
        .await
        .unwrap_err();

    match err.downcast_ref::<OpsError>() {
        Some(OpsError::ArgumentNull { parameter }) => assert_eq!(parameter, "session"),
        other => panic!("expected ArgumentNull, got {other:?}"),
    }
    assert_eq!(tokens.calls(), 0);
}

#[tokio::test]
async fn test_explicit_session_defaults_to_management_audience() {
    let tokens = FakeTokens::default();
    let store = MemorySessionStore::empty();
    let session = session("t-1", "sub-explicit", "Prod");

    let token = fetch_access_token(&tokens, &store, Some(&session), None)
        .await
        .unwrap();

    assert_eq!(token, format!("token:sub-explicit:{}", MANAGEMENT_AUDIENCE));
    assert_eq!(tokens.calls(), 1);
}

#[tokio::test]
async fn test_current_session_is_resolved_from_store() {
    let tokens = FakeTokens::default();
    let store = MemorySessionStore::with_sessions(vec![session("t-1", "sub-current", "Prod")]);

    let token = fetch_access_token(&tokens, &store, None, Some(VAULT_AUDIENCE))
        .await
        .unwrap();

    assert_eq!(token, format!("token:sub-current:{}", VAULT_AUDIENCE));
}
