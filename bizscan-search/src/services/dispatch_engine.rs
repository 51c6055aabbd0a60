//! Dispatch engine - queries every source for one business
//!
//! Adapters run one at a time in registration order, each behind its rate
//! class. A failing adapter (error or panic) turns into an `Error` envelope
//! for that source only; the record always has one envelope per adapter.

use super::http_transport::HttpTransport;
use super::panic_message;
use super::rate_governor::RateGovernor;
use crate::config::SearchConfig;
use crate::models::{AggregatedRecord, BusinessIdentity, SourceEnvelope};
use crate::sources::{
    EntityRegistryAdapter, PublicFilingsAdapter, SmallBusinessAdapter, SourceAdapter, SpendingRecordsAdapter,
};
use async_trait::async_trait;
use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tracing::{error, info, warn};

/// Produces one aggregated record per business
#[async_trait]
pub trait Dispatch: Send + Sync {
    async fn dispatch(&self, identity: &BusinessIdentity) -> AggregatedRecord;
}

/// Fixed, ordered list of adapters sharing one rate governor
pub struct DispatchEngine {
    adapters: Vec<Box<dyn SourceAdapter>>,
    governor: Arc<RateGovernor>,
}

impl DispatchEngine {
    /// Engine over an explicit adapter list; dispatch order is list order
    pub fn new(adapters: Vec<Box<dyn SourceAdapter>>, governor: Arc<RateGovernor>) -> Self {
        Self { adapters, governor }
    }

    /// The four standard sources in fixed order
    ///
    /// `entity_registry_key` is the resolved credential; `None` makes the
    /// entity registry adapter report `RequiresCredential`.
    pub fn from_config(
        config: &SearchConfig,
        entity_registry_key: Option<String>,
        transport: Arc<dyn HttpTransport>,
        governor: Arc<RateGovernor>,
    ) -> Self {
        let adapters: Vec<Box<dyn SourceAdapter>> = vec![
            Box::new(EntityRegistryAdapter::new(
                Arc::clone(&transport),
                &config.entity_registry,
                entity_registry_key,
            )),
            Box::new(SpendingRecordsAdapter::new(
                Arc::clone(&transport),
                &config.spending_records,
            )),
            Box::new(PublicFilingsAdapter::new(
                Arc::clone(&transport),
                &config.public_filings,
            )),
            Box::new(SmallBusinessAdapter::new()),
        ];

        Self::new(adapters, governor)
    }

    /// Throttle, query, and isolate one adapter
    async fn invoke(&self, adapter: &dyn SourceAdapter, identity: &BusinessIdentity) -> SourceEnvelope {
        let kind = adapter.kind();
        self.governor.throttle(kind).await;

        let outcome = AssertUnwindSafe(adapter.query(identity)).catch_unwind().await;

        let envelope = match outcome {
            Ok(Ok(envelope)) if envelope.source() == kind => envelope,
            Ok(Ok(envelope)) => {
                warn!(
                    expected = %kind,
                    actual = %envelope.source(),
                    "Adapter returned envelope for wrong source, relabeling"
                );
                SourceEnvelope::new(kind, envelope.outcome().clone())
            }
            Ok(Err(e)) => {
                error!(source = %kind, business = %identity.name(), "Search failed: {:#}", e);
                SourceEnvelope::error(kind, format!("{:#}", e))
            }
            Err(payload) => {
                let message = panic_message(payload.as_ref());
                error!(source = %kind, business = %identity.name(), "Adapter panicked: {}", message);
                SourceEnvelope::error(kind, format!("Adapter panicked: {}", message))
            }
        };

        info!(source = %kind, status = %envelope.status(), "Completed search in {}", kind);
        envelope
    }
}

#[async_trait]
impl Dispatch for DispatchEngine {
    async fn dispatch(&self, identity: &BusinessIdentity) -> AggregatedRecord {
        info!("Searching for: {}", identity.name());
        let timestamp = bizscan_common::time::now();

        let mut envelopes = Vec::with_capacity(self.adapters.len());
        for adapter in &self.adapters {
            envelopes.push(self.invoke(adapter.as_ref(), identity).await);
        }

        AggregatedRecord::new(identity.clone(), timestamp, envelopes)
    }
}
