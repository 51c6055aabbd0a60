//! Data model: business identities, per-source envelopes, aggregated records

pub mod business;
pub mod envelope;
pub mod record;

pub use business::BusinessIdentity;
pub use envelope::{EnvelopeStatus, OfflineNotice, SourceEnvelope, SourceKind, SourceOutcome};
pub use record::AggregatedRecord;
