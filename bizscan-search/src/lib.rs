//! bizscan-search library interface
//!
//! Searches a list of businesses against several public data sources and
//! aggregates one record per business. Exposed as a library for the binary
//! and for integration testing.

pub mod config;
pub mod error;
pub mod input;
pub mod models;
pub mod report;
pub mod services;
pub mod sources;

pub use crate::error::{SearchError, SearchResult};
pub use crate::models::{AggregatedRecord, BusinessIdentity, EnvelopeStatus, SourceEnvelope, SourceKind};
