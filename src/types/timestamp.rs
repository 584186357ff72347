//! Review-service timestamps.
//!
//! Gerrit renders every timestamp as `YYYY-MM-DD hh:mm:ss.fffffffff` in UTC,
//! without a zone designator.

use chrono::{DateTime, NaiveDateTime, Utc};
use thiserror::Error;

/// The `strftime` pattern matching Gerrit timestamps.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

/// A timestamp string that could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid timestamp {input:?}: {reason}")]
pub struct TimestampError {
    pub input: String,
    pub reason: String,
}

/// Parses a Gerrit timestamp as UTC.
pub fn parse_timestamp(input: &str) -> Result<DateTime<Utc>, TimestampError> {
    NaiveDateTime::parse_from_str(input.trim(), TIMESTAMP_FORMAT)
        .map(|naive| naive.and_utc())
        .map_err(|e| TimestampError {
            input: input.to_string(),
            reason: e.to_string(),
        })
}

/// Formats a timestamp in the wire format (nanosecond precision).
pub fn format_timestamp(date: DateTime<Utc>) -> String {
    date.format("%Y-%m-%d %H:%M:%S%.9f").to_string()
}

/// Short weekday + time form used in progress logs, e.g. `Mon 15:04:05`.
pub fn pretty(date: DateTime<Utc>) -> String {
    date.format("%a %H:%M:%S").to_string()
}

/// Serde adapter for timestamp fields in the wire format.
pub mod serde_timestamp {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer, de};

    pub fn serialize<S: Serializer>(date: &DateTime<Utc>, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&super::format_timestamp(*date))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(d)?;
        super::parse_timestamp(&raw).map_err(de::Error::custom)
    }
}
