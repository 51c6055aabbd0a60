//! Entity registry credential resolution (ENV → TOML)

mod helpers;

use bizscan_search::config::{resolve_entity_registry_api_key, ENTITY_REGISTRY_KEY_ENV};
use bizscan_search::services::{Dispatch, DispatchEngine, RateGovernor};
use bizscan_search::EnvelopeStatus;
use helpers::*;
use serial_test::serial;
use std::env;
use std::sync::Arc;

#[test]
#[serial]
fn test_env_key_wins_over_toml() {
    env::set_var(ENTITY_REGISTRY_KEY_ENV, "env-key");
    assert_eq!(
        resolve_entity_registry_api_key(Some("toml-key")),
        Some("env-key".to_string())
    );
    env::remove_var(ENTITY_REGISTRY_KEY_ENV);
}

#[test]
#[serial]
fn test_toml_key_used_when_env_unset_or_blank() {
    env::remove_var(ENTITY_REGISTRY_KEY_ENV);
    assert_eq!(
        resolve_entity_registry_api_key(Some("toml-key")),
        Some("toml-key".to_string())
    );

    env::set_var(ENTITY_REGISTRY_KEY_ENV, "   ");
    assert_eq!(
        resolve_entity_registry_api_key(Some("toml-key")),
        Some("toml-key".to_string())
    );
    env::remove_var(ENTITY_REGISTRY_KEY_ENV);
}

#[test]
#[serial]
fn test_no_key_anywhere() {
    env::remove_var(ENTITY_REGISTRY_KEY_ENV);
    assert_eq!(resolve_entity_registry_api_key(None), None);
    assert_eq!(resolve_entity_registry_api_key(Some("")), None);
}

#[tokio::test]
#[serial]
async fn test_resolved_env_key_reaches_the_request() {
    env::set_var(ENTITY_REGISTRY_KEY_ENV, "env-key");
    let api_key = resolve_entity_registry_api_key(None);
    env::remove_var(ENTITY_REGISTRY_KEY_ENV);

    let transport = MockTransport::new()
        .respond(ENTITY_REGISTRY_URL, 200, sample_entity())
        .respond(SPENDING_RECORDS_URL, 200, empty_awards())
        .respond(PUBLIC_FILINGS_URL, 200, sample_directory());
    let engine = DispatchEngine::from_config(
        &test_config(),
        api_key,
        transport.as_transport(),
        Arc::new(RateGovernor::unthrottled()),
    );

    let record = engine.dispatch(&identity("Zenith Labs Corp", None)).await;

    assert_eq!(record.envelopes[0].status(), EnvelopeStatus::Found);
    let request = transport
        .requests()
        .into_iter()
        .find(|r| r.url == ENTITY_REGISTRY_URL)
        .unwrap();
    assert_eq!(request.query_value("api_key"), Some("env-key"));
}
