//! Aggregation pipeline - every business, one record each, input order kept

use super::dispatch_engine::Dispatch;
use super::panic_message;
use super::rate_governor::RateGovernor;
use crate::models::{AggregatedRecord, BusinessIdentity};
use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tracing::{error, info};

/// Runs a dispatcher over the business list with inter-business pauses
pub struct AggregationPipeline<D: Dispatch> {
    dispatcher: D,
    governor: Arc<RateGovernor>,
}

impl<D: Dispatch> AggregationPipeline<D> {
    pub fn new(dispatcher: D, governor: Arc<RateGovernor>) -> Self {
        Self {
            dispatcher,
            governor,
        }
    }

    /// Process every identity sequentially
    ///
    /// Output length always equals input length. If dispatch panics for a
    /// business, that slot holds a degenerate record (no envelopes, error
    /// note set) and processing continues with the next business.
    pub async fn run(&self, identities: &[BusinessIdentity]) -> Vec<AggregatedRecord> {
        let total = identities.len();
        let mut records = Vec::with_capacity(total);

        for (idx, identity) in identities.iter().enumerate() {
            if idx > 0 {
                self.governor.pause_between_businesses().await;
            }

            info!("Processing business {}/{}: {}", idx + 1, total, identity.name());

            let outcome = AssertUnwindSafe(self.dispatcher.dispatch(identity))
                .catch_unwind()
                .await;

            let record = match outcome {
                Ok(record) => {
                    let found = record.envelopes.iter().filter(|e| e.payload().is_some()).count();
                    info!(
                        "Completed {}: found in {} of {} sources",
                        identity.name(),
                        found,
                        record.envelopes.len()
                    );
                    record
                }
                Err(payload) => {
                    let message = panic_message(payload.as_ref());
                    error!("Error processing business {}: {}", identity.name(), message);
                    AggregatedRecord::degenerate(
                        identity.clone(),
                        bizscan_common::time::now(),
                        format!("Dispatch failed: {}", message),
                    )
                }
            };

            records.push(record);
        }

        records
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{SourceEnvelope, SourceKind};
    use async_trait::async_trait;
    use std::time::Duration;
    use tokio::time::Instant;

    /// Panics for names containing "boom", otherwise one NotFound envelope
    struct ScriptedDispatcher;

    #[async_trait]
    impl Dispatch for ScriptedDispatcher {
        async fn dispatch(&self, identity: &BusinessIdentity) -> AggregatedRecord {
            if identity.name().contains("boom") {
                panic!("dispatcher exploded");
            }
            AggregatedRecord::new(
                identity.clone(),
                chrono::Utc::now(),
                vec![SourceEnvelope::not_found(SourceKind::SpendingRecords)],
            )
        }
    }

    fn identities(names: &[&str]) -> Vec<BusinessIdentity> {
        names
            .iter()
            .map(|n| BusinessIdentity::new(*n).unwrap())
            .collect()
    }

    #[tokio::test]
    async fn test_degenerate_record_substituted_on_panic() {
        let pipeline = AggregationPipeline::new(ScriptedDispatcher, Arc::new(RateGovernor::unthrottled()));
        let input = identities(&["Alpha LLC", "boom corp", "Gamma Inc"]);

        let records = pipeline.run(&input).await;

        assert_eq!(records.len(), 3);
        assert_eq!(records[0].identity.name(), "Alpha LLC");
        assert!(!records[0].is_degenerate());

        assert!(records[1].is_degenerate());
        assert!(records[1].envelopes.is_empty());
        assert_eq!(records[1].identity.name(), "boom corp");
        assert!(records[1].error.as_deref().unwrap().contains("dispatcher exploded"));

        assert_eq!(records[2].identity.name(), "Gamma Inc");
        assert_eq!(records[2].envelopes.len(), 1);
    }

    #[tokio::test]
    async fn test_empty_input_yields_empty_output() {
        let pipeline = AggregationPipeline::new(ScriptedDispatcher, Arc::new(RateGovernor::unthrottled()));
        assert!(pipeline.run(&[]).await.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_inter_business_delay_skipped_before_first() {
        let governor = RateGovernor::unthrottled().with_delay(crate::services::RateClass::InterBusiness, Duration::from_secs(1));
        let pipeline = AggregationPipeline::new(ScriptedDispatcher, Arc::new(governor));

        let start = Instant::now();
        pipeline.run(&identities(&["Only One"])).await;
        assert!(start.elapsed() < Duration::from_millis(10));

        let start = Instant::now();
        pipeline.run(&identities(&["A", "B", "C"])).await;
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_secs(2));
        assert!(elapsed < Duration::from_secs(3));
    }
}
