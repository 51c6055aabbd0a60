//! Report synthesis - HTML summary and JSON dump of aggregated records

pub mod html;
pub mod json;

use crate::error::SearchResult;
use crate::models::{AggregatedRecord, EnvelopeStatus, SourceKind};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::info;

pub use html::render_html;
pub use json::render_json;

/// Per-source status counts
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SourceStats {
    pub found: usize,
    pub not_found: usize,
    /// Requires a credential or offline processing
    pub unavailable: usize,
    pub error: usize,
}

impl SourceStats {
    fn record(&mut self, status: EnvelopeStatus) {
        match status {
            EnvelopeStatus::Found => self.found += 1,
            EnvelopeStatus::NotFound => self.not_found += 1,
            EnvelopeStatus::RequiresCredential | EnvelopeStatus::RequiresOfflineProcessing => {
                self.unavailable += 1
            }
            EnvelopeStatus::Error => self.error += 1,
        }
    }
}

/// Batch-level summary shown at the top of the HTML report
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportSummary {
    pub total_businesses: usize,
    pub businesses_with_findings: usize,
    /// Degenerate records (dispatch failed outright)
    pub failed_businesses: usize,
    /// Stats per source, in dispatch order
    pub sources: Vec<(SourceKind, SourceStats)>,
}

impl ReportSummary {
    pub fn from_records(records: &[AggregatedRecord]) -> Self {
        let mut sources: Vec<(SourceKind, SourceStats)> = SourceKind::ALL
            .iter()
            .map(|kind| (*kind, SourceStats::default()))
            .collect();

        for envelope in records.iter().flat_map(|r| r.envelopes.iter()) {
            if let Some((_, stats)) = sources.iter_mut().find(|(kind, _)| *kind == envelope.source()) {
                stats.record(envelope.status());
            }
        }

        Self {
            total_businesses: records.len(),
            businesses_with_findings: records.iter().filter(|r| r.has_findings()).count(),
            failed_businesses: records.iter().filter(|r| r.is_degenerate()).count(),
            sources,
        }
    }

    pub fn stats_for(&self, kind: SourceKind) -> Option<&SourceStats> {
        self.sources
            .iter()
            .find(|(k, _)| *k == kind)
            .map(|(_, stats)| stats)
    }
}

/// Which artifacts to write and where
#[derive(Debug, Clone)]
pub struct ReportOptions {
    pub output_dir: PathBuf,
    pub html: bool,
    pub json: bool,
}

/// Paths of the artifacts actually written
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WrittenReports {
    pub html: Option<PathBuf>,
    pub json: Option<PathBuf>,
}

pub fn html_file_name(at: DateTime<Utc>) -> String {
    format!("business_search_report_{}.html", bizscan_common::time::file_stamp(at))
}

pub fn json_file_name(at: DateTime<Utc>) -> String {
    format!("business_search_results_{}.json", bizscan_common::time::file_stamp(at))
}

/// Write the timestamped HTML and/or JSON artifacts
pub fn write_reports(
    records: &[AggregatedRecord],
    options: &ReportOptions,
    generated_at: DateTime<Utc>,
) -> SearchResult<WrittenReports> {
    std::fs::create_dir_all(&options.output_dir)?;
    let mut written = WrittenReports::default();

    if options.html {
        let path = options.output_dir.join(html_file_name(generated_at));
        write_file(&path, &render_html(records, generated_at))?;
        info!("HTML Report: {}", path.display());
        written.html = Some(path);
    }

    if options.json {
        let path = options.output_dir.join(json_file_name(generated_at));
        write_file(&path, &render_json(records)?)?;
        info!("JSON Data: {}", path.display());
        written.json = Some(path);
    }

    Ok(written)
}

fn write_file(path: &Path, content: &str) -> SearchResult<()> {
    std::fs::write(path, content)?;
    Ok(())
}
