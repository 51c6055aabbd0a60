//! Test Helper Utilities
//!
//! Shared utilities for bizscan-search integration tests. No test here
//! touches the network: sources are pointed at `.test` URLs and served by
//! [`MockTransport`].

#![allow(dead_code)]

use async_trait::async_trait;
use bizscan_search::config::{RateLimitConfig, SearchConfig};
use bizscan_search::services::{HttpRequest, HttpResponse, HttpTransport, TransportError};
use bizscan_search::BusinessIdentity;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

pub const ENTITY_REGISTRY_URL: &str = "https://entities.test/v3/entities";
pub const SPENDING_RECORDS_URL: &str = "https://spending.test/api/v2/search/spending_by_award/";
pub const PUBLIC_FILINGS_URL: &str = "https://filings.test/files/company_tickers.json";
pub const TEST_USER_AGENT: &str = "bizscan tests ops@example.test";

/// Scripted reply for one URL
#[derive(Debug, Clone)]
pub enum MockReply {
    Respond(HttpResponse),
    Fail(String),
}

/// Transport that replays scripted responses by URL and records every request
///
/// Unscripted URLs fail with a network error so a missing route shows up as an
/// `Error` envelope instead of a hang.
#[derive(Clone, Default)]
pub struct MockTransport {
    routes: Arc<Mutex<HashMap<String, MockReply>>>,
    requests: Arc<Mutex<Vec<HttpRequest>>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `url` with `status` and a JSON body
    pub fn respond(self, url: &str, status: u16, body: Value) -> Self {
        self.routes
            .lock()
            .unwrap()
            .insert(url.to_string(), MockReply::Respond(HttpResponse::json(status, body)));
        self
    }

    /// Answer `url` with a body that did not parse as JSON
    pub fn respond_non_json(self, url: &str, status: u16) -> Self {
        self.routes.lock().unwrap().insert(
            url.to_string(),
            MockReply::Respond(HttpResponse { status, body: None }),
        );
        self
    }

    /// Fail every request to `url` at the transport level
    pub fn fail(self, url: &str, message: &str) -> Self {
        self.routes
            .lock()
            .unwrap()
            .insert(url.to_string(), MockReply::Fail(message.to_string()));
        self
    }

    /// All requests seen so far, in order
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn calls_to(&self, url: &str) -> usize {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.url == url)
            .count()
    }

    pub fn as_transport(&self) -> Arc<dyn HttpTransport> {
        Arc::new(self.clone())
    }
}

#[async_trait]
impl HttpTransport for MockTransport {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let reply = self.routes.lock().unwrap().get(&request.url).cloned();
        self.requests.lock().unwrap().push(request.clone());

        match reply {
            Some(MockReply::Respond(response)) => Ok(response),
            Some(MockReply::Fail(message)) => Err(TransportError::NetworkError(message)),
            None => Err(TransportError::NetworkError(format!("no route for {}", request.url))),
        }
    }
}

/// Default config pointed at the mock URLs with all courtesy delays disabled
pub fn test_config() -> SearchConfig {
    let mut config = SearchConfig::default();
    config.rate_limits = RateLimitConfig::disabled();
    config.entity_registry.base_url = ENTITY_REGISTRY_URL.to_string();
    config.spending_records.base_url = SPENDING_RECORDS_URL.to_string();
    config.public_filings.directory_url = PUBLIC_FILINGS_URL.to_string();
    config.public_filings.user_agent = TEST_USER_AGENT.to_string();
    config
}

pub fn identity(name: &str, state: Option<&str>) -> BusinessIdentity {
    let identity = BusinessIdentity::new(name).unwrap();
    match state {
        Some(state) => identity.with_state(state),
        None => identity,
    }
}

/// Issuer directory in the object-keyed layout the source publishes
pub fn sample_directory() -> Value {
    json!({
        "0": {"cik_str": 320193, "ticker": "AAPL", "title": "Apple Inc."},
        "1": {"cik_str": 1234567, "ticker": "ACME", "title": "Acme Rockets Inc"},
        "2": {"cik_str": 7654321, "ticker": "ZNTH", "title": "Zenith Labs Corp"},
    })
}

pub fn empty_awards() -> Value {
    json!({"results": [], "page_metadata": {"page": 1, "hasNext": false}})
}

pub fn sample_awards() -> Value {
    json!({
        "results": [
            {"Award ID": "W91-001", "Recipient Name": "ZENITH LABS CORP", "Award Amount": 900000.0,
             "Award Type": "Definitive Contract", "Period of Performance Start Date": "2023-01-15"},
            {"Award ID": "W91-002", "Recipient Name": "ZENITH LABS CORP", "Award Amount": 100000.0,
             "Award Type": "Purchase Order", "Period of Performance Start Date": "2022-06-01"}
        ]
    })
}

pub fn sample_entity() -> Value {
    json!({
        "totalRecords": 1,
        "entityData": [{
            "entityRegistration": {
                "ueiSAM": "ZQGGHJH74DW7",
                "cageCode": "1ABC2",
                "registrationStatus": "Active",
                "legalBusinessName": "ZENITH LABS CORP"
            },
            "coreData": {"legalBusinessName": "ZENITH LABS CORP"}
        }]
    })
}
