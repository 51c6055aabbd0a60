//! Search services
//!
//! - [`rate_governor`]: per-source courtesy delays
//! - [`http_transport`]: HTTP seam used by source adapters
//! - [`dispatch_engine`]: all sources for one business
//! - [`aggregation_pipeline`]: all businesses in input order

pub mod aggregation_pipeline;
pub mod dispatch_engine;
pub mod http_transport;
pub mod rate_governor;

pub use aggregation_pipeline::AggregationPipeline;
pub use dispatch_engine::{Dispatch, DispatchEngine};
pub use http_transport::{HttpMethod, HttpRequest, HttpResponse, HttpTransport, ReqwestTransport, TransportError};
pub use rate_governor::{RateClass, RateGovernor};

use std::any::Any;

/// Best-effort text of a caught panic payload
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
