//! Aggregated per-business record

use super::{BusinessIdentity, EnvelopeStatus, SourceEnvelope};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Combined result of every source for one business
///
/// A complete record holds one envelope per registered adapter, in dispatch
/// order. The degenerate shape (no envelopes, `error` set) only appears when
/// dispatch itself failed for this business.
#[derive(Debug, Clone, Serialize)]
pub struct AggregatedRecord {
    pub identity: BusinessIdentity,
    /// Capture time of the search (UTC)
    pub timestamp: DateTime<Utc>,
    pub envelopes: Vec<SourceEnvelope>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AggregatedRecord {
    pub fn new(identity: BusinessIdentity, timestamp: DateTime<Utc>, envelopes: Vec<SourceEnvelope>) -> Self {
        Self {
            identity,
            timestamp,
            envelopes,
            error: None,
        }
    }

    /// Zero-envelope record carrying a top-level error note
    pub fn degenerate(identity: BusinessIdentity, timestamp: DateTime<Utc>, error: impl Into<String>) -> Self {
        Self {
            identity,
            timestamp,
            envelopes: Vec::new(),
            error: Some(error.into()),
        }
    }

    pub fn is_degenerate(&self) -> bool {
        self.error.is_some()
    }

    /// True when at least one source found the business
    pub fn has_findings(&self) -> bool {
        self.envelopes
            .iter()
            .any(|e| e.status() == EnvelopeStatus::Found)
    }

    pub fn statuses(&self) -> Vec<EnvelopeStatus> {
        self.envelopes.iter().map(|e| e.status()).collect()
    }
}
