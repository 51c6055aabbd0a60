//! # bizscan Common Library
//!
//! Shared code for the bizscan tools:
//! - Error types
//! - Configuration file resolution and loading
//! - Logging bootstrap
//! - Time utilities

pub mod config;
pub mod error;
pub mod logging;
pub mod time;

pub use error::{Error, Result};
