//! Public filings registry (SEC EDGAR) adapter
//!
//! The source publishes one issuer directory (`{"0": {"cik_str", "ticker",
//! "title"}, ...}`) instead of a search endpoint. The directory is fetched on
//! every query and matched locally:
//!
//! - candidate matches when either lower-cased name contains the other
//! - score = number of shared lower-cased whitespace-separated words
//! - candidates sorted by score descending, directory order kept on ties

use super::{scalar_text, SourceAdapter};
use crate::config::PublicFilingsConfig;
use crate::models::{BusinessIdentity, SourceEnvelope, SourceKind};
use crate::services::http_transport::{HttpRequest, HttpTransport};
use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// Candidates listed in `all_matches`
pub const TOP_MATCHES_SHOWN: usize = 3;

/// Raw directory row; fields kept as JSON so an odd-typed value never drops
/// the whole entry
#[derive(Debug, Deserialize)]
struct DirectoryEntry {
    #[serde(default)]
    cik_str: Option<Value>,
    #[serde(default)]
    ticker: Option<Value>,
    #[serde(default)]
    title: Option<Value>,
}

/// One directory entry that matched the search name
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilingMatch {
    /// Central index key
    pub cik: Option<String>,
    pub ticker: Option<String>,
    pub company_name: String,
    /// Shared word count between search name and company name
    pub match_score: usize,
}

/// Matching outcome for one search name
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilingMatches {
    pub matches_found: usize,
    pub best_match: FilingMatch,
    /// Top [`TOP_MATCHES_SHOWN`] candidates by score
    pub all_matches: Vec<FilingMatch>,
}

/// Word-overlap score between two names (case-insensitive)
pub fn match_score(search_name: &str, candidate_name: &str) -> usize {
    let search_lower = search_name.to_lowercase();
    let candidate_lower = candidate_name.to_lowercase();
    let search_words: HashSet<&str> = search_lower.split_whitespace().collect();
    let candidate_words: HashSet<&str> = candidate_lower.split_whitespace().collect();
    search_words.intersection(&candidate_words).count()
}

/// Two-way case-insensitive substring test
///
/// Blank candidates never match (an empty string is a substring of anything).
pub fn names_overlap(search_name: &str, candidate_name: &str) -> bool {
    let search = search_name.trim().to_lowercase();
    let candidate = candidate_name.trim().to_lowercase();
    if search.is_empty() || candidate.is_empty() {
        return false;
    }
    candidate.contains(&search) || search.contains(&candidate)
}

/// Match a search name against the whole directory body
///
/// Accepts the directory as a JSON object (keyed by row number) or array.
/// Entries that are not objects or lack a title are skipped.
pub fn match_directory(search_name: &str, directory: &Value) -> Result<Option<FilingMatches>> {
    let entries: Box<dyn Iterator<Item = &Value>> = match directory {
        Value::Object(map) => Box::new(map.values()),
        Value::Array(items) => Box::new(items.iter()),
        other => bail!("Unexpected SEC EDGAR directory shape: {}", json_kind(other)),
    };

    let mut matches: Vec<FilingMatch> = entries
        .filter(|entry| entry.is_object())
        .filter_map(|entry| serde_json::from_value::<DirectoryEntry>(entry.clone()).ok())
        .filter_map(|entry| {
            // Only a string title can be matched
            let title = entry.title.as_ref().and_then(Value::as_str)?.to_string();
            if !names_overlap(search_name, &title) {
                return None;
            }
            Some(FilingMatch {
                cik: entry.cik_str.as_ref().and_then(scalar_text),
                ticker: entry.ticker.as_ref().and_then(scalar_text),
                match_score: match_score(search_name, &title),
                company_name: title,
            })
        })
        .collect();

    if matches.is_empty() {
        return Ok(None);
    }

    // Stable: ties keep directory order
    matches.sort_by(|a, b| b.match_score.cmp(&a.match_score));

    let matches_found = matches.len();
    let best_match = matches[0].clone();
    matches.truncate(TOP_MATCHES_SHOWN);

    Ok(Some(FilingMatches {
        matches_found,
        best_match,
        all_matches: matches,
    }))
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// SEC EDGAR issuer directory search
pub struct PublicFilingsAdapter {
    transport: Arc<dyn HttpTransport>,
    directory_url: String,
    user_agent: String,
    timeout: Duration,
}

impl PublicFilingsAdapter {
    pub fn new(transport: Arc<dyn HttpTransport>, config: &PublicFilingsConfig) -> Self {
        Self {
            transport,
            directory_url: config.directory_url.clone(),
            user_agent: config.user_agent.clone(),
            timeout: config.timeout(),
        }
    }
}

#[async_trait]
impl SourceAdapter for PublicFilingsAdapter {
    fn kind(&self) -> SourceKind {
        SourceKind::PublicFilings
    }

    async fn query(&self, identity: &BusinessIdentity) -> Result<SourceEnvelope> {
        let request = HttpRequest::get(&self.directory_url, self.timeout).header("User-Agent", &self.user_agent);
        debug!(business = %identity.name(), "Fetching SEC EDGAR issuer directory");

        let response = self
            .transport
            .execute(request)
            .await
            .context("SEC EDGAR request failed")?;

        if !response.is_ok() {
            debug!(status = response.status, "SEC EDGAR returned non-200, treating as not found");
            return Ok(SourceEnvelope::not_found(self.kind()));
        }

        let directory = response
            .body
            .context("SEC EDGAR returned a response body that is not JSON")?;

        match match_directory(identity.name(), &directory)? {
            Some(matches) => {
                info!(
                    business = %identity.name(),
                    matches_found = matches.matches_found,
                    best_match = %matches.best_match.company_name,
                    "Found SEC EDGAR matches"
                );
                Ok(SourceEnvelope::found_with(self.kind(), &matches)?)
            }
            None => Ok(SourceEnvelope::not_found(self.kind())),
        }
    }
}
