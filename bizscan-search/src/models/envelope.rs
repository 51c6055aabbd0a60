//! Normalized per-source result envelope
//!
//! Every source adapter, whatever its response shape, reports back through a
//! [`SourceEnvelope`]. The aggregation and report layers only ever look at the
//! envelope status; the payload is opaque JSON owned by the adapter.

use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;
use std::fmt;

/// External data sources, in fixed dispatch order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    /// Federal entity registry (SAM.gov)
    EntityRegistry,
    /// Federal spending records (USAspending.gov)
    SpendingRecords,
    /// Public-company filings registry (SEC EDGAR)
    PublicFilings,
    /// Small-business program datasets (SBA)
    SmallBusinessDatasets,
}

impl SourceKind {
    /// All sources in dispatch order
    pub const ALL: [SourceKind; 4] = [
        SourceKind::EntityRegistry,
        SourceKind::SpendingRecords,
        SourceKind::PublicFilings,
        SourceKind::SmallBusinessDatasets,
    ];

    /// Human-readable source label used in logs and reports
    pub fn label(&self) -> &'static str {
        match self {
            SourceKind::EntityRegistry => "SAM.gov",
            SourceKind::SpendingRecords => "USAspending.gov",
            SourceKind::PublicFilings => "SEC EDGAR",
            SourceKind::SmallBusinessDatasets => "SBA Data",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Envelope status, one per envelope
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnvelopeStatus {
    Found,
    NotFound,
    RequiresCredential,
    RequiresOfflineProcessing,
    Error,
}

impl EnvelopeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EnvelopeStatus::Found => "found",
            EnvelopeStatus::NotFound => "not_found",
            EnvelopeStatus::RequiresCredential => "requires_credential",
            EnvelopeStatus::RequiresOfflineProcessing => "requires_offline_processing",
            EnvelopeStatus::Error => "error",
        }
    }
}

impl fmt::Display for EnvelopeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Bulk datasets an operator has to download for an offline-only source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OfflineNotice {
    pub note: String,
    pub datasets_to_check: Vec<String>,
}

/// Outcome of one source query
///
/// Each variant carries exactly the data its status allows, so a payload
/// cannot exist without `Found` and an error message cannot exist without
/// `Error`.
#[derive(Debug, Clone, PartialEq)]
pub enum SourceOutcome {
    /// Source returned a match; payload shape is source-specific
    Found(Value),
    /// Source reachable, no matching record
    NotFound,
    /// Source needs an access credential that is not configured
    RequiresCredential,
    /// Source has no live query interface
    RequiresOfflineProcessing(OfflineNotice),
    /// Transport failure, malformed response, or adapter fault
    Error(String),
}

impl SourceOutcome {
    pub fn status(&self) -> EnvelopeStatus {
        match self {
            SourceOutcome::Found(_) => EnvelopeStatus::Found,
            SourceOutcome::NotFound => EnvelopeStatus::NotFound,
            SourceOutcome::RequiresCredential => EnvelopeStatus::RequiresCredential,
            SourceOutcome::RequiresOfflineProcessing(_) => EnvelopeStatus::RequiresOfflineProcessing,
            SourceOutcome::Error(_) => EnvelopeStatus::Error,
        }
    }
}

/// Normalized result of querying one source for one business
#[derive(Debug, Clone, PartialEq)]
pub struct SourceEnvelope {
    source: SourceKind,
    outcome: SourceOutcome,
}

impl SourceEnvelope {
    pub fn new(source: SourceKind, outcome: SourceOutcome) -> Self {
        Self { source, outcome }
    }

    pub fn found(source: SourceKind, payload: Value) -> Self {
        Self::new(source, SourceOutcome::Found(payload))
    }

    /// `Found` envelope from any serializable payload struct
    pub fn found_with<T: Serialize>(source: SourceKind, payload: &T) -> serde_json::Result<Self> {
        Ok(Self::found(source, serde_json::to_value(payload)?))
    }

    pub fn not_found(source: SourceKind) -> Self {
        Self::new(source, SourceOutcome::NotFound)
    }

    pub fn requires_credential(source: SourceKind) -> Self {
        Self::new(source, SourceOutcome::RequiresCredential)
    }

    pub fn requires_offline_processing(source: SourceKind, notice: OfflineNotice) -> Self {
        Self::new(source, SourceOutcome::RequiresOfflineProcessing(notice))
    }

    pub fn error(source: SourceKind, detail: impl Into<String>) -> Self {
        Self::new(source, SourceOutcome::Error(detail.into()))
    }

    pub fn source(&self) -> SourceKind {
        self.source
    }

    pub fn outcome(&self) -> &SourceOutcome {
        &self.outcome
    }

    pub fn status(&self) -> EnvelopeStatus {
        self.outcome.status()
    }

    /// Source-specific data; present iff status is `Found`
    pub fn payload(&self) -> Option<&Value> {
        match &self.outcome {
            SourceOutcome::Found(payload) => Some(payload),
            _ => None,
        }
    }

    /// Failure message; present iff status is `Error`
    pub fn error_detail(&self) -> Option<&str> {
        match &self.outcome {
            SourceOutcome::Error(detail) => Some(detail),
            _ => None,
        }
    }

    /// Offline download guidance; present iff status is `RequiresOfflineProcessing`
    pub fn offline_notice(&self) -> Option<&OfflineNotice> {
        match &self.outcome {
            SourceOutcome::RequiresOfflineProcessing(notice) => Some(notice),
            _ => None,
        }
    }
}

/// Flat wire shape of an envelope in the JSON dump
#[derive(Serialize)]
struct EnvelopeRepr<'a> {
    source: SourceKind,
    label: &'static str,
    status: EnvelopeStatus,
    payload: Option<&'a Value>,
    error_detail: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    offline_notice: Option<&'a OfflineNotice>,
}

impl Serialize for SourceEnvelope {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        EnvelopeRepr {
            source: self.source,
            label: self.source.label(),
            status: self.status(),
            payload: self.payload(),
            error_detail: self.error_detail(),
            offline_notice: self.offline_notice(),
        }
        .serialize(serializer)
    }
}
