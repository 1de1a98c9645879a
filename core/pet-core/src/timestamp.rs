//! Capture-timestamp parsing and serde adapters.
//!
//! The game has written `lastUpdateTime` in several shapes over time: epoch
//! milliseconds (as a JSON string or number), RFC 3339, and a legacy
//! `yyyy-MM-dd HH:mm:ss` local-time string. All of them decode here.
//! Anything unparseable decodes to the Unix epoch so that corrupt data can
//! never win a freshness comparison.

use chrono::{DateTime, Local, NaiveDateTime, TimeZone, Utc};

const LEGACY_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// The zero instant. Used as the capture time of snapshots with no usable timestamp.
pub fn epoch() -> DateTime<Utc> {
    DateTime::<Utc>::UNIX_EPOCH
}

/// Converts epoch milliseconds to an instant, saturating to the epoch when out of range.
pub fn from_millis(millis: i64) -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp_millis(millis).unwrap_or_else(epoch)
}

/// Parses a capture timestamp in any of the accepted textual formats.
pub fn parse_capture_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(millis) = raw.parse::<i64>() {
        return DateTime::<Utc>::from_timestamp_millis(millis);
    }

    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }

    NaiveDateTime::parse_from_str(raw, LEGACY_FORMAT)
        .ok()
        .and_then(|naive| Local.from_local_datetime(&naive).earliest())
        .map(|local| local.with_timezone(&Utc))
}

/// Serde adapter for `lastUpdateTime`: writes epoch milliseconds as a string,
/// reads any accepted format (string or number, null allowed).
pub mod capture {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawTimestamp {
        Millis(i64),
        Text(String),
    }

    pub fn serialize<S>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&value.timestamp_millis().to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<RawTimestamp>::deserialize(deserializer)?;
        Ok(match raw {
            None => super::epoch(),
            Some(RawTimestamp::Millis(millis)) => super::from_millis(millis),
            Some(RawTimestamp::Text(text)) if text.trim().is_empty() => super::epoch(),
            Some(RawTimestamp::Text(text)) => {
                super::parse_capture_timestamp(&text).unwrap_or_else(|| {
                    tracing::warn!(
                        value = %text,
                        "Unparseable capture timestamp, treating as epoch"
                    );
                    super::epoch()
                })
            }
        })
    }
}

/// Serde adapter for optional epoch-millisecond integers in the baseline record.
pub mod millis_opt {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(instant) => serializer.serialize_some(&instant.timestamp_millis()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(Option::<i64>::deserialize(deserializer)?.map(super::from_millis))
    }
}
