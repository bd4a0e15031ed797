//! Timestamp formatting shared by documents and checkpoint state.
//!
//! The search index declares its date fields with the format
//! `YYYY-MM-DD HH:mm:ss.SSSSSS`, and checkpoint values are stored as the same
//! string shape, so a single format lives here.

use chrono::{DateTime, NaiveDateTime, Utc};

/// Format string for all timestamps crossing a process boundary.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

/// Format a timestamp into the wire representation.
pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}

/// Parse a timestamp from the wire representation.
pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    NaiveDateTime::parse_from_str(raw, TIMESTAMP_FORMAT).map(|naive| naive.and_utc())
}

/// Serde adapter serializing `DateTime<Utc>` through [`TIMESTAMP_FORMAT`].
///
/// Use with `#[serde(with = "catalog_indexer_shared::timestamp::serde_format")]`.
pub mod serde_format {
    use chrono::{DateTime, Utc};
    use serde::{self, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(ts: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&super::format_timestamp(ts))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        super::parse_timestamp(&raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_round_trip() {
        let ts = Utc.with_ymd_and_hms(2024, 1, 1, 12, 30, 45).unwrap();
        let formatted = format_timestamp(&ts);
        assert_eq!(formatted, "2024-01-01 12:30:45.000000");
        assert_eq!(parse_timestamp(&formatted).unwrap(), ts);
    }

    #[test]
    fn test_microsecond_precision_preserved() {
        let ts = Utc
            .with_ymd_and_hms(2024, 6, 15, 8, 0, 0)
            .unwrap()
            .checked_add_signed(chrono::Duration::microseconds(123456))
            .unwrap();
        let formatted = format_timestamp(&ts);
        assert_eq!(formatted, "2024-06-15 08:00:00.123456");
        assert_eq!(parse_timestamp(&formatted).unwrap(), ts);
    }

    #[test]
    fn test_parse_rejects_other_shapes() {
        assert!(parse_timestamp("2024-01-01T12:30:45Z").is_err());
        assert!(parse_timestamp("not a timestamp").is_err());
    }
}
