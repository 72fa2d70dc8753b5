//! Timestamp rendering for encoded entries
//!
//! The development preset writes ISO 8601 strings, the production preset
//! writes epoch milliseconds.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt::Write;

/// How the time element of a record is rendered.
///
/// In JSON output the epoch variants are written as numbers, everything
/// else as strings.
///
/// ```
/// use rust_context_logger::core::TimestampFormat;
///
/// let format: TimestampFormat = serde_json::from_str("\"unix_millis\"").unwrap();
/// assert_eq!(format, TimestampFormat::UnixMillis);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimestampFormat {
    /// `2025-01-08T10:30:45.123Z`
    #[default]
    Iso8601,
    /// `2025-01-08T10:30:45.123456Z`
    Iso8601Micros,
    /// `2025-01-08T10:30:45.123456+00:00`
    Rfc3339,
    /// Epoch seconds
    Unix,
    /// Epoch milliseconds
    UnixMillis,
    /// strftime pattern
    Custom(String),
}

impl TimestampFormat {
    #[must_use]
    pub fn format(&self, at: &DateTime<Utc>) -> String {
        match self {
            TimestampFormat::Iso8601 => at.to_rfc3339_opts(SecondsFormat::Millis, true),
            TimestampFormat::Iso8601Micros => at.to_rfc3339_opts(SecondsFormat::Micros, true),
            TimestampFormat::Rfc3339 => at.to_rfc3339(),
            TimestampFormat::Unix => at.timestamp().to_string(),
            TimestampFormat::UnixMillis => at.timestamp_millis().to_string(),
            TimestampFormat::Custom(pattern) => {
                let mut out = String::new();
                // invalid specifiers surface as fmt errors
                if write!(out, "{}", at.format(pattern)).is_err() {
                    return TimestampFormat::Iso8601.format(at);
                }
                out
            }
        }
    }

    #[must_use]
    pub fn to_json_value(&self, at: &DateTime<Utc>) -> Value {
        match self {
            TimestampFormat::Unix => Value::from(at.timestamp()),
            TimestampFormat::UnixMillis => Value::from(at.timestamp_millis()),
            _ => Value::String(self.format(at)),
        }
    }
}
