// src/models/timestamp.rs

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, de};

/// Decodes an optional creation time.
///
/// Accepts RFC 3339 timestamps as well as ISO timestamps without an offset,
/// which are read as UTC. A missing or `null` value decodes to `None`.
pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        Some(raw) => parse(&raw).map(Some).map_err(de::Error::custom),
        None => Ok(None),
    }
}

fn parse(raw: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    match DateTime::parse_from_rfc3339(raw) {
        Ok(ts) => Ok(ts.with_timezone(&Utc)),
        Err(_) => NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
            .map(|ts| ts.and_utc()),
    }
}
