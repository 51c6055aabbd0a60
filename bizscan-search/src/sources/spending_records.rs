//! Federal spending records (USAspending.gov) adapter
//!
//! Searches award records whose recipient matches the business name. The
//! source sorts by award amount (descending); the envelope lists the first
//! five awards but `total_awards` and `total_amount` cover every award the
//! source returned.

use super::{scalar_text, SourceAdapter};
use crate::config::SpendingRecordsConfig;
use crate::models::{BusinessIdentity, SourceEnvelope, SourceKind};
use crate::services::http_transport::{HttpRequest, HttpTransport};
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// Awards listed in the envelope payload
pub const TOP_AWARDS_SHOWN: usize = 5;

const SORT_FIELD: &str = "Award Amount";
const FIELDS: [&str; 5] = [
    "Award ID",
    "Recipient Name",
    "Award Amount",
    "Award Type",
    "Period of Performance Start Date",
];

/// Top-level response shape; rows stay raw JSON and are read field by field
#[derive(Debug, Deserialize)]
struct AwardSearchResponse {
    #[serde(default)]
    results: Option<Vec<Value>>,
}

/// One award as exposed in the payload
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Award {
    pub award_id: Option<String>,
    pub recipient_name: Option<String>,
    pub amount: f64,
    #[serde(rename = "type")]
    pub award_type: Option<String>,
    pub start_date: Option<String>,
}

/// Award totals plus the highest-amount awards
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpendingSummary {
    /// Count of every returned award
    pub total_awards: usize,
    /// Sum of every returned award amount
    pub total_amount: f64,
    /// First [`TOP_AWARDS_SHOWN`] awards in source order
    pub awards: Vec<Award>,
}

/// USAspending.gov award search
pub struct SpendingRecordsAdapter {
    transport: Arc<dyn HttpTransport>,
    base_url: String,
    award_type_codes: Vec<String>,
    result_limit: u32,
    timeout: Duration,
}

impl SpendingRecordsAdapter {
    pub fn new(transport: Arc<dyn HttpTransport>, config: &SpendingRecordsConfig) -> Self {
        Self {
            transport,
            base_url: config.base_url.clone(),
            award_type_codes: config.award_type_codes.clone(),
            result_limit: config.result_limit,
            timeout: config.timeout(),
        }
    }

    fn search_body(&self, business_name: &str) -> Value {
        json!({
            "filters": {
                "recipient_search_text": [business_name],
                "award_type_codes": self.award_type_codes,
            },
            "fields": FIELDS,
            "sort": SORT_FIELD,
            "order": "desc",
            "limit": self.result_limit,
        })
    }
}

/// Summarize a 200 response body; `Ok(None)` when no awards came back
fn summarize_awards(body: Value) -> Result<Option<SpendingSummary>> {
    let response: AwardSearchResponse =
        serde_json::from_value(body).context("Failed to parse USAspending.gov response")?;

    let awards: Vec<Award> = response
        .results
        .unwrap_or_default()
        .iter()
        .filter(|row| row.is_object())
        .map(|row| {
            let text = |field: &str| row.get(field).and_then(scalar_text);
            Award {
                award_id: text("Award ID"),
                recipient_name: text("Recipient Name"),
                amount: row.get("Award Amount").and_then(amount_value).unwrap_or(0.0),
                award_type: text("Award Type"),
                start_date: text("Period of Performance Start Date"),
            }
        })
        .collect();

    if awards.is_empty() {
        return Ok(None);
    }

    let total_awards = awards.len();
    let total_amount: f64 = awards.iter().map(|a| a.amount).sum();

    Ok(Some(SpendingSummary {
        total_awards,
        total_amount,
        awards: awards.into_iter().take(TOP_AWARDS_SHOWN).collect(),
    }))
}

/// Award amount as a number; numeric strings are accepted
fn amount_value(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

#[async_trait]
impl SourceAdapter for SpendingRecordsAdapter {
    fn kind(&self) -> SourceKind {
        SourceKind::SpendingRecords
    }

    async fn query(&self, identity: &BusinessIdentity) -> Result<SourceEnvelope> {
        let request = HttpRequest::post_json(&self.base_url, self.search_body(identity.name()), self.timeout);
        debug!(business = %identity.name(), "Querying USAspending.gov");

        let response = self
            .transport
            .execute(request)
            .await
            .context("USAspending.gov request failed")?;

        if !response.is_ok() {
            debug!(status = response.status, "USAspending.gov returned non-200, treating as not found");
            return Ok(SourceEnvelope::not_found(self.kind()));
        }

        let body = response
            .body
            .context("USAspending.gov returned a response body that is not JSON")?;

        match summarize_awards(body)? {
            Some(summary) => {
                info!(
                    business = %identity.name(),
                    total_awards = summary.total_awards,
                    total_amount = summary.total_amount,
                    "Found USAspending.gov awards"
                );
                Ok(SourceEnvelope::found_with(self.kind(), &summary)?)
            }
            None => Ok(SourceEnvelope::not_found(self.kind())),
        }
    }
}
