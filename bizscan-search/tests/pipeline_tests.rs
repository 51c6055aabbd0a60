//! End-to-end pipeline tests
//!
//! Full dispatch engine plus aggregation pipeline over a scripted transport.

mod helpers;

use bizscan_search::models::SourceOutcome;
use bizscan_search::services::{AggregationPipeline, DispatchEngine, RateGovernor};
use bizscan_search::{AggregatedRecord, BusinessIdentity, EnvelopeStatus, SourceKind};
use helpers::*;
use serde_json::json;
use std::sync::Arc;

fn pipeline(transport: &MockTransport, api_key: Option<&str>) -> AggregationPipeline<DispatchEngine> {
    let config = test_config();
    let governor = Arc::new(RateGovernor::from_config(&config.rate_limits));
    let engine = DispatchEngine::from_config(
        &config,
        api_key.map(str::to_string),
        transport.as_transport(),
        Arc::clone(&governor),
    );
    AggregationPipeline::new(engine, governor)
}

async fn run(transport: &MockTransport, api_key: Option<&str>, input: &[BusinessIdentity]) -> Vec<AggregatedRecord> {
    pipeline(transport, api_key).run(input).await
}

#[tokio::test]
async fn test_end_to_end_without_credential() {
    let transport = MockTransport::new()
        .respond(SPENDING_RECORDS_URL, 200, empty_awards())
        .respond(PUBLIC_FILINGS_URL, 200, sample_directory());

    let records = run(&transport, None, &[identity("Acme Rockets Inc", Some("CA"))]).await;

    assert_eq!(records.len(), 1);
    let record = &records[0];
    assert_eq!(record.identity.name(), "Acme Rockets Inc");
    assert_eq!(record.identity.state(), Some("CA"));
    assert_eq!(
        record.statuses(),
        vec![
            EnvelopeStatus::RequiresCredential,
            EnvelopeStatus::NotFound,
            EnvelopeStatus::Found,
            EnvelopeStatus::RequiresOfflineProcessing,
        ]
    );

    let filings = record.envelopes[2].payload().unwrap();
    assert_eq!(filings["best_match"]["company_name"], "Acme Rockets Inc");
    assert_eq!(filings["best_match"]["ticker"], "ACME");
    assert_eq!(filings["matches_found"], 1);

    // Spending records and the filings directory only
    assert_eq!(transport.call_count(), 2);
    assert_eq!(transport.calls_to(ENTITY_REGISTRY_URL), 0);
}

#[tokio::test]
async fn test_envelopes_follow_fixed_source_order() {
    let transport = MockTransport::new()
        .respond(ENTITY_REGISTRY_URL, 200, sample_entity())
        .respond(SPENDING_RECORDS_URL, 200, sample_awards())
        .respond(PUBLIC_FILINGS_URL, 200, sample_directory());

    let input = vec![
        identity("Zenith Labs Corp", Some("TX")),
        identity("Acme Rockets Inc", None),
        identity("Nobody Holdings", Some("NV")),
    ];
    let records = run(&transport, Some("test-key"), &input).await;

    assert_eq!(records.len(), input.len());
    for (record, expected) in records.iter().zip(&input) {
        assert_eq!(record.identity.name(), expected.name());
        let sources: Vec<SourceKind> = record.envelopes.iter().map(|e| e.source()).collect();
        assert_eq!(sources, SourceKind::ALL.to_vec());
    }

    let zenith = &records[0];
    assert_eq!(zenith.envelopes[0].payload().unwrap()["uei"], "ZQGGHJH74DW7");
    let spending = zenith.envelopes[1].payload().unwrap();
    assert_eq!(spending["total_awards"], 2);
    assert_eq!(spending["total_amount"], 1000000.0);

    // The directory has no entry overlapping this name
    assert_eq!(records[2].envelopes[2].status(), EnvelopeStatus::NotFound);
}

#[tokio::test]
async fn test_payload_present_only_when_found() {
    let transport = MockTransport::new()
        .respond(ENTITY_REGISTRY_URL, 404, json!({"error": "not found"}))
        .fail(SPENDING_RECORDS_URL, "connection refused")
        .respond(PUBLIC_FILINGS_URL, 200, sample_directory());

    let records = run(
        &transport,
        Some("test-key"),
        &[identity("Acme Rockets Inc", None), identity("Unlisted Widgets", None)],
    )
    .await;

    for envelope in records.iter().flat_map(|r| r.envelopes.iter()) {
        let found = envelope.status() == EnvelopeStatus::Found;
        assert_eq!(envelope.payload().is_some(), found, "{:?}", envelope);
        let errored = envelope.status() == EnvelopeStatus::Error;
        assert_eq!(envelope.error_detail().is_some(), errored, "{:?}", envelope);
    }
}

#[tokio::test]
async fn test_failing_source_leaves_others_populated() {
    let transport = MockTransport::new()
        .respond(ENTITY_REGISTRY_URL, 200, sample_entity())
        .fail(SPENDING_RECORDS_URL, "connection reset by peer")
        .respond(PUBLIC_FILINGS_URL, 200, sample_directory());

    let records = run(&transport, Some("test-key"), &[identity("Zenith Labs Corp", None)]).await;
    let record = &records[0];

    assert_eq!(
        record.statuses(),
        vec![
            EnvelopeStatus::Found,
            EnvelopeStatus::Error,
            EnvelopeStatus::Found,
            EnvelopeStatus::RequiresOfflineProcessing,
        ]
    );
    let detail = record.envelopes[1].error_detail().unwrap();
    assert!(detail.contains("connection reset by peer"), "{}", detail);
    assert!(!record.is_degenerate());
}

#[tokio::test]
async fn test_non_json_body_is_an_error_envelope() {
    let transport = MockTransport::new()
        .respond(SPENDING_RECORDS_URL, 200, empty_awards())
        .respond_non_json(PUBLIC_FILINGS_URL, 200);

    let records = run(&transport, None, &[identity("Acme Rockets Inc", None)]).await;

    let filings = &records[0].envelopes[2];
    assert_eq!(filings.status(), EnvelopeStatus::Error);
    assert!(filings.error_detail().unwrap().contains("not JSON"));
}

#[tokio::test]
async fn test_small_business_notice_lists_datasets() {
    let transport = MockTransport::new();
    let records = run(&transport, None, &[identity("Acme Rockets Inc", None)]).await;

    match records[0].envelopes[3].outcome() {
        SourceOutcome::RequiresOfflineProcessing(notice) => {
            assert!(notice.datasets_to_check.contains(&"PPP Loan Data".to_string()));
        }
        other => panic!("unexpected outcome: {:?}", other),
    }
}

#[tokio::test]
async fn test_empty_input_makes_no_calls() {
    let transport = MockTransport::new();
    let records = run(&transport, Some("test-key"), &[]).await;

    assert!(records.is_empty());
    assert_eq!(transport.call_count(), 0);
}

#[tokio::test]
async fn test_json_dump_of_pipeline_output() {
    let transport = MockTransport::new()
        .respond(SPENDING_RECORDS_URL, 200, empty_awards())
        .respond(PUBLIC_FILINGS_URL, 200, sample_directory());

    let records = run(&transport, None, &[identity("Acme Rockets Inc", Some("CA"))]).await;
    let dumped: serde_json::Value =
        serde_json::from_str(&bizscan_search::report::render_json(&records).unwrap()).unwrap();

    let envelopes = dumped[0]["envelopes"].as_array().unwrap();
    let statuses: Vec<&str> = envelopes.iter().map(|e| e["status"].as_str().unwrap()).collect();
    assert_eq!(
        statuses,
        vec!["requires_credential", "not_found", "found", "requires_offline_processing"]
    );
    assert_eq!(envelopes[0]["payload"], serde_json::Value::Null);
}
