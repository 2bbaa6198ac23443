//! Tolerant readers for OMDb-shaped numbers.
//!
//! OMDb reports ratings and runtimes as strings ("7.9", "142 min") or "N/A",
//! and older watchlist stores carry those raw values, sometimes as `null`.
//! Anything unreadable becomes 0.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Leading numeric token of an OMDb runtime such as "142 min". Unparsable values give 0.
pub fn parse_runtime_minutes(runtime: &str) -> u32 {
    runtime
        .split_whitespace()
        .next()
        .and_then(|token| token.parse::<u32>().ok())
        .unwrap_or(0)
}

/// Rating from a number or numeric string; "N/A", null and anything else give 0.
pub fn parse_rating(value: &Value) -> f64 {
    match value {
        Value::Number(n) => n.as_f64().filter(|r| r.is_finite()).unwrap_or(0.0),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|r| r.is_finite()).unwrap_or(0.0),
        _ => 0.0,
    }
}

/// Runtime from a number, a "<N> min" string, or null.
pub fn parse_minutes_value(value: &Value) -> u32 {
    match value {
        Value::Number(n) => n
            .as_u64()
            .map(|m| m.min(u32::MAX as u64) as u32)
            .or_else(|| n.as_f64().filter(|m| m.is_finite() && *m >= 0.0).map(|m| m as u32))
            .unwrap_or(0),
        Value::String(s) => parse_runtime_minutes(s),
        _ => 0,
    }
}

/// `deserialize_with` helper for rating fields
pub fn deserialize_rating<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(parse_rating(&Value::deserialize(deserializer)?))
}

/// `deserialize_with` helper for runtime fields
pub fn deserialize_minutes<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(parse_minutes_value(&Value::deserialize(deserializer)?))
}
