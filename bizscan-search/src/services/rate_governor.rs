//! Per-source courtesy rate limiting
//!
//! One governor instance owns the last-call timestamp of every rate class and
//! is shared by handle (`Arc<RateGovernor>`) between the dispatch engine and
//! the aggregation pipeline. Timestamps use `tokio::time::Instant`, so tests
//! running with paused time observe simulated delays.

use crate::config::RateLimitConfig;
use crate::models::SourceKind;
use bizscan_common::time::secs_f64_to_duration;
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

/// Something whose calls are paced independently
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RateClass {
    Source(SourceKind),
    InterBusiness,
}

impl From<SourceKind> for RateClass {
    fn from(source: SourceKind) -> Self {
        RateClass::Source(source)
    }
}

/// Enforces a minimum delay between successive calls of the same class
#[derive(Debug)]
pub struct RateGovernor {
    delays: HashMap<RateClass, Duration>,
    last_call: Mutex<HashMap<RateClass, Instant>>,
}

impl RateGovernor {
    pub fn from_config(config: &RateLimitConfig) -> Self {
        let delays = HashMap::from([
            (
                RateClass::Source(SourceKind::EntityRegistry),
                secs_f64_to_duration(config.entity_registry_secs),
            ),
            (
                RateClass::Source(SourceKind::SpendingRecords),
                secs_f64_to_duration(config.spending_records_secs),
            ),
            (
                RateClass::Source(SourceKind::PublicFilings),
                secs_f64_to_duration(config.public_filings_secs),
            ),
            (
                RateClass::Source(SourceKind::SmallBusinessDatasets),
                secs_f64_to_duration(config.small_business_secs),
            ),
            (RateClass::InterBusiness, config.inter_business()),
        ]);

        Self {
            delays,
            last_call: Mutex::new(HashMap::new()),
        }
    }

    /// Governor that never waits
    pub fn unthrottled() -> Self {
        Self::from_config(&RateLimitConfig::disabled())
    }

    /// Override the delay of a single class
    pub fn with_delay(mut self, class: impl Into<RateClass>, delay: Duration) -> Self {
        self.delays.insert(class.into(), delay);
        self
    }

    /// Configured minimum delay for a class (zero when unset)
    pub fn delay(&self, class: impl Into<RateClass>) -> Duration {
        self.delays
            .get(&class.into())
            .copied()
            .unwrap_or(Duration::ZERO)
    }

    /// Wait until the class's minimum delay has elapsed since its last call
    ///
    /// The first call for a class never waits. Records the new call time
    /// before returning.
    pub async fn throttle(&self, class: impl Into<RateClass>) {
        let class = class.into();
        let min_interval = self.delay(class);
        let mut last = self.last_call.lock().await;

        if let Some(last_time) = last.get(&class) {
            let elapsed = last_time.elapsed();
            if elapsed < min_interval {
                let wait_time = min_interval - elapsed;
                tracing::debug!(?class, "Rate limiting: waiting {:?}", wait_time);
                tokio::time::sleep(wait_time).await;
            }
        }

        last.insert(class, Instant::now());
    }

    /// Full inter-business courtesy pause
    ///
    /// Unlike [`throttle`](Self::throttle) this always sleeps the configured
    /// delay; the pipeline skips it before the first business.
    pub async fn pause_between_businesses(&self) {
        let delay = self.delay(RateClass::InterBusiness);
        if !delay.is_zero() {
            tracing::debug!("Inter-business delay: {:?}", delay);
            tokio::time::sleep(delay).await;
        }
    }
}
