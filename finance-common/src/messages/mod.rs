mod inputs;
mod outputs;

pub use inputs::*;
pub use outputs::*;

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Deserializer};

#[derive(Debug)]
pub enum MessageError {
    InvalidTimestamp(String),
}

impl std::error::Error for MessageError {}

impl std::fmt::Display for MessageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MessageError::InvalidTimestamp(value) => write!(f, "Invalid timestamp '{value}'"),
        }
    }
}

const NAIVE_TIMESTAMP_FORMATS: [&str; 3] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
];

/// Parses a client-supplied timestamp into local wall-clock time.
///
/// Accepts RFC 3339 timestamps with an offset (converted to local time), ISO 8601 timestamps
/// without an offset (taken as local time already), and bare `YYYY-MM-DD` dates (midnight).
pub fn parse_timestamp(value: &str) -> Result<NaiveDateTime, MessageError> {
    let trimmed = value.trim();

    if let Ok(with_offset) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(with_offset.with_timezone(&Local).naive_local());
    }

    for format in NAIVE_TIMESTAMP_FORMATS {
        if let Ok(timestamp) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Ok(timestamp);
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Ok(date.and_time(NaiveTime::MIN));
    }

    Err(MessageError::InvalidTimestamp(String::from(value)))
}

pub fn deserialize_optional_timestamp<'de, D>(
    deserializer: D,
) -> Result<Option<NaiveDateTime>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(value) = Option::<String>::deserialize(deserializer)? else {
        return Ok(None);
    };

    parse_timestamp(&value)
        .map(Some)
        .map_err(serde::de::Error::custom)
}

/// Treats an empty query value such as `?category=` as if the filter were not given.
pub fn deserialize_optional_filter<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.filter(|value| !value.is_empty()))
}
