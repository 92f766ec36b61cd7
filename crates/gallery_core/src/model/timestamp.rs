//! ISO 8601 timestamp codec for persisted records.
//!
//! Writes UTC with millisecond precision and a `Z` suffix
//! (`2025-01-15T10:00:00.000Z`). Reads any RFC 3339 offset and normalizes
//! to UTC.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serializer};

pub(crate) fn format(value: &DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub(crate) fn serialize<S>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&format(value))
}

pub(crate) fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    DateTime::parse_from_rfc3339(&raw)
        .map(|parsed| parsed.with_timezone(&Utc))
        .map_err(|err| serde::de::Error::custom(format!("invalid timestamp `{raw}`: {err}")))
}

#[cfg(test)]
mod tests {
    use super::format;
    use chrono::{DateTime, TimeZone, Utc};

    #[test]
    fn format_keeps_millisecond_precision_and_z_suffix() {
        let value = Utc.with_ymd_and_hms(2025, 1, 15, 10, 0, 0).unwrap();
        assert_eq!(format(&value), "2025-01-15T10:00:00.000Z");
    }

    #[test]
    fn offsets_are_normalized_to_utc() {
        let parsed = DateTime::parse_from_rfc3339("2025-01-16T14:30:00.000+03:00")
            .unwrap()
            .with_timezone(&Utc);
        assert_eq!(format(&parsed), "2025-01-16T11:30:00.000Z");
    }
}
