//! Small-business program datasets (SBA) adapter
//!
//! SBA publishes these datasets only as bulk downloads, so there is nothing to
//! query live. The adapter always answers `RequiresOfflineProcessing` with the
//! list of datasets an operator would have to fetch and search locally.

use super::SourceAdapter;
use crate::models::{BusinessIdentity, OfflineNotice, SourceEnvelope, SourceKind};
use anyhow::Result;
use async_trait::async_trait;

const NOTE: &str = "SBA data requires downloading CSV files and local processing";

/// Bulk datasets to check, in the order they are listed to the operator
pub const DATASETS_TO_CHECK: [&str; 5] = [
    "PPP Loan Data",
    "8(a) Business Development",
    "HUBZone Certified Companies",
    "Women-Owned Small Business",
    "Service-Disabled Veteran-Owned",
];

/// Offline-only SBA stub; issues no network calls
#[derive(Debug, Default, Clone, Copy)]
pub struct SmallBusinessAdapter;

impl SmallBusinessAdapter {
    pub fn new() -> Self {
        Self
    }

    pub fn notice() -> OfflineNotice {
        OfflineNotice {
            note: NOTE.to_string(),
            datasets_to_check: DATASETS_TO_CHECK.iter().map(|d| d.to_string()).collect(),
        }
    }
}

#[async_trait]
impl SourceAdapter for SmallBusinessAdapter {
    fn kind(&self) -> SourceKind {
        SourceKind::SmallBusinessDatasets
    }

    async fn query(&self, _identity: &BusinessIdentity) -> Result<SourceEnvelope> {
        Ok(SourceEnvelope::requires_offline_processing(self.kind(), Self::notice()))
    }
}
