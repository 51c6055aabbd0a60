//! Source adapters - one per external data source
//!
//! Each adapter turns a [`BusinessIdentity`] into at most one outbound
//! request and the source's response into a [`SourceEnvelope`]. Adapters own
//! all shape-specific extraction; nothing outside this module looks inside a
//! payload.

use crate::models::{BusinessIdentity, SourceEnvelope, SourceKind};
use anyhow::Result;
use async_trait::async_trait;

pub mod entity_registry;
pub mod public_filings;
pub mod small_business;
pub mod spending_records;

pub use entity_registry::EntityRegistryAdapter;
pub use public_filings::PublicFilingsAdapter;
pub use small_business::SmallBusinessAdapter;
pub use spending_records::SpendingRecordsAdapter;

/// Adapter trait - all sources implement this
#[async_trait]
pub trait SourceAdapter: Send + Sync {
    /// Which source this adapter queries
    fn kind(&self) -> SourceKind;

    /// Query the source for one business
    ///
    /// # Returns
    /// * `Ok(SourceEnvelope)` - Found, NotFound, RequiresCredential or RequiresOfflineProcessing
    /// * `Err(_)` - Transport failure or malformed response (becomes an `Error` envelope)
    async fn query(&self, identity: &BusinessIdentity) -> Result<SourceEnvelope>;
}

/// Render a JSON scalar as text (strings as-is, numbers and bools formatted)
///
/// Sources are inconsistent about quoting identifiers, so identifier fields
/// are read as raw JSON and normalized here.
pub(crate) fn scalar_text(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        serde_json::Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
