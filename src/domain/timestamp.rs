//! Custom serde module for trade-log timestamps.
//!
//! Writes RFC 3339. Reads RFC 3339 as well as naive ISO 8601 strings
//! (`2024-05-01T12:30:00.123456`), which are taken to be UTC.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{self, Deserialize, Deserializer, Serializer};

pub fn serialize<S>(ts: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&ts.to_rfc3339())
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    parse_timestamp(&s).map_err(serde::de::Error::custom)
}

pub(crate) fn parse_timestamp(s: &str) -> Result<DateTime<Utc>, String> {
    let s = s.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(s) {
        return Ok(ts.with_timezone(&Utc));
    }

    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|naive| naive.and_utc())
        .map_err(|e| format!("invalid timestamp {:?}: {}", s, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn test_parse_rfc3339() {
        let ts = parse_timestamp("2024-05-01T12:30:00+02:00").unwrap();
        assert_eq!(ts.hour(), 10);
    }

    #[test]
    fn test_parse_naive_iso_as_utc() {
        let ts = parse_timestamp("2024-05-01T12:30:00.123456").unwrap();
        assert_eq!(ts.day(), 1);
        assert_eq!(ts.hour(), 12);
        assert_eq!(ts.nanosecond(), 123_456_000);
    }

    #[test]
    fn test_parse_garbage() {
        let err = parse_timestamp("yesterday").unwrap_err();
        assert!(err.contains("invalid timestamp"));
    }
}
