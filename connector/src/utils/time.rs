//! Timestamp rendering
//!
//! The platform and the provider both speak ISO 8601 UTC with millisecond
//! precision and a `Z` suffix; everything here renders that shape.

use chrono::{DateTime, SecondsFormat, Utc};

/// Convert milliseconds since Unix epoch to DateTime<Utc>
pub fn millis_to_datetime(millis: i64) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(millis).unwrap_or_else(|| {
        tracing::warn!(millis, "Invalid timestamp, using epoch");
        DateTime::UNIX_EPOCH
    })
}

/// Convert milliseconds since Unix epoch to ISO 8601 string (millisecond precision)
pub fn millis_to_iso(millis: i64) -> String {
    millis_to_datetime(millis).to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Current UTC time as ISO 8601 string (millisecond precision)
pub fn now_iso() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}
