//! Timestamp utilities

use chrono::{DateTime, Utc};

/// Format used for timestamped output file names
pub const FILE_STAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Get current UTC timestamp
pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// Convert fractional seconds (as written in config files) to a duration
///
/// Negative and non-finite values clamp to zero; values too large for a
/// `Duration` saturate at `Duration::MAX`.
pub fn secs_f64_to_duration(secs: f64) -> std::time::Duration {
    if secs.is_finite() && secs > 0.0 {
        std::time::Duration::try_from_secs_f64(secs).unwrap_or(std::time::Duration::MAX)
    } else {
        std::time::Duration::ZERO
    }
}

/// `YYYYMMDD_HHMMSS` stamp for output file names
pub fn file_stamp(at: DateTime<Utc>) -> String {
    at.format(FILE_STAMP_FORMAT).to_string()
}
