//! JSON dump of the full record sequence

use crate::error::SearchResult;
use crate::models::AggregatedRecord;

/// Pretty-printed JSON array of every record, in input order
pub fn render_json(records: &[AggregatedRecord]) -> SearchResult<String> {
    Ok(serde_json::to_string_pretty(records)?)
}
