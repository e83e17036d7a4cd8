//! Tolerant decoding for server columns that hold embedded JSON.
//!
//! The server stores `demographics`, `triage_data`, `image_urls` and
//! `ai_analysis` in text columns and echoes them back either as JSON strings
//! or as already-decoded values. These helpers accept both forms, and also
//! read the free-text `risk_level` column. A value that cannot be decoded is
//! logged as a warning and replaced by `None` (or an empty list) so a single
//! bad row never fails a whole listing.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tracing::warn;

use crate::models::risk::RiskLevel;

/// Decode a value that may be a JSON object or a string containing JSON.
pub fn decode_embedded<T: DeserializeOwned>(value: Value) -> Option<T> {
    let value = match value {
        Value::Null => return None,
        Value::String(text) => {
            let text = text.trim();
            if text.is_empty() {
                return None;
            }
            match serde_json::from_str::<Value>(text) {
                Ok(inner) => inner,
                Err(e) => {
                    warn!(error = %e, "embedded field is not valid JSON");
                    return None;
                }
            }
        }
        other => other,
    };

    match serde_json::from_value(value) {
        Ok(decoded) => Some(decoded),
        Err(e) => {
            warn!(
                error = %e,
                target_type = std::any::type_name::<T>(),
                "embedded field does not match expected shape"
            );
            None
        }
    }
}

/// `deserialize_with` adapter for `Option<T>` fields holding embedded JSON.
pub fn embedded<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(raw.and_then(decode_embedded))
}

/// `deserialize_with` adapter for embedded string lists; malformed lists
/// decode as empty.
pub fn embedded_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(embedded::<D, Vec<String>>(deserializer)?.unwrap_or_default())
}

/// Parse an RFC 3339 timestamp, or a naive ISO 8601 datetime interpreted
/// as UTC (the server emits the latter).
pub fn parse_timestamp(raw: &str) -> Option<jiff::Timestamp> {
    let raw = raw.trim();
    if let Ok(ts) = raw.parse::<jiff::Timestamp>() {
        return Some(ts);
    }
    match raw.parse::<jiff::civil::DateTime>() {
        Ok(dt) => dt
            .to_zoned(jiff::tz::TimeZone::UTC)
            .ok()
            .map(|zoned| zoned.timestamp()),
        Err(e) => {
            warn!(error = %e, raw, "unparsable timestamp");
            None
        }
    }
}

pub fn timestamp<'de, D>(deserializer: D) -> Result<Option<jiff::Timestamp>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(parse_timestamp))
}

/// `deserialize_with` adapter for the free-text `risk_level` column.
/// Matching ignores case; anything else is logged and read as `None`.
pub fn risk_level<'de, D>(deserializer: D) -> Result<Option<RiskLevel>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(match raw {
        None | Some(Value::Null) => None,
        Some(Value::String(text)) => match text.parse::<RiskLevel>() {
            Ok(level) => Some(level),
            Err(e) => {
                warn!(error = %e, "unrecognised risk level");
                None
            }
        },
        Some(other) => {
            warn!(value = %other, "risk level is not a string");
            None
        }
    })
}
