//! Publish timestamps as they arrive from CMS records

use crate::{AgeError, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A `publishedAt` value. Unparseable values are kept so they can be
/// reported, but they never count as a publish instant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublishedAt {
    At(DateTime<Utc>),
    Unparseable(String),
}

impl PublishedAt {
    pub fn parse(value: &str) -> Self {
        match parse_timestamp(value) {
            Ok(instant) => PublishedAt::At(instant),
            Err(_) => PublishedAt::Unparseable(value.to_string()),
        }
    }

    pub fn from_millis(millis: i64) -> Self {
        match Utc.timestamp_millis_opt(millis).single() {
            Some(instant) => PublishedAt::At(instant),
            None => PublishedAt::Unparseable(millis.to_string()),
        }
    }

    /// The publish instant, if the value was parseable
    pub fn instant(&self) -> Option<DateTime<Utc>> {
        match self {
            PublishedAt::At(instant) => Some(*instant),
            PublishedAt::Unparseable(_) => None,
        }
    }
}

impl From<DateTime<Utc>> for PublishedAt {
    fn from(instant: DateTime<Utc>) -> Self {
        PublishedAt::At(instant)
    }
}

/// Parse a timestamp string.
///
/// Accepts RFC 3339 ("2025-11-23T22:58:56.000Z"), naive date-times taken as
/// UTC ("2025-11-23T22:58:56", "2025-11-23 22:58:56"), bare dates at UTC
/// midnight ("2025-11-23"), and epoch milliseconds ("1732402736000").
pub fn parse_timestamp(value: &str) -> Result<DateTime<Utc>> {
    let value = value.trim();

    if let Ok(instant) = DateTime::parse_from_rfc3339(value) {
        return Ok(instant.with_timezone(&Utc));
    }

    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
            return Ok(Utc.from_utc_datetime(&naive));
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        if let Some(midnight) = date.and_hms_opt(0, 0, 0) {
            return Ok(Utc.from_utc_datetime(&midnight));
        }
    }

    if !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit()) {
        if let Some(instant) = value
            .parse::<i64>()
            .ok()
            .and_then(|ms| Utc.timestamp_millis_opt(ms).single())
        {
            return Ok(instant);
        }
    }

    Err(AgeError::InvalidTimestamp(value.to_string()))
}

impl Serialize for PublishedAt {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            PublishedAt::At(instant) => instant.serialize(serializer),
            PublishedAt::Unparseable(raw) => serializer.serialize_str(raw),
        }
    }
}

impl<'de> Deserialize<'de> for PublishedAt {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawPublishedAt {
            Millis(i64),
            FractionalMillis(f64),
            Text(String),
            Other(serde::de::IgnoredAny),
        }

        Ok(match RawPublishedAt::deserialize(deserializer)? {
            // A zero publish date is an unset CMS field, not the 1970 epoch
            RawPublishedAt::Millis(0) => PublishedAt::Unparseable("0".to_string()),
            RawPublishedAt::FractionalMillis(ms) if ms == 0.0 => {
                PublishedAt::Unparseable("0".to_string())
            }
            RawPublishedAt::Millis(ms) => PublishedAt::from_millis(ms),
            RawPublishedAt::FractionalMillis(ms) if ms.is_finite() => {
                PublishedAt::from_millis(ms.trunc() as i64)
            }
            RawPublishedAt::FractionalMillis(ms) => PublishedAt::Unparseable(ms.to_string()),
            RawPublishedAt::Text(text) => PublishedAt::parse(&text),
            RawPublishedAt::Other(_) => PublishedAt::Unparseable(String::new()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utc(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, s).unwrap()
    }

    #[test]
    fn test_parse_rfc3339() {
        assert_eq!(
            parse_timestamp("2025-11-23T22:58:56.000Z").unwrap(),
            utc(2025, 11, 23, 22, 58, 56)
        );
        assert_eq!(
            parse_timestamp("2025-11-23T23:58:56+01:00").unwrap(),
            utc(2025, 11, 23, 22, 58, 56)
        );
    }

    #[test]
    fn test_parse_naive_and_date_only() {
        assert_eq!(
            parse_timestamp("2025-11-23T22:58:56").unwrap(),
            utc(2025, 11, 23, 22, 58, 56)
        );
        assert_eq!(
            parse_timestamp("2025-11-23 22:58:56.250").unwrap(),
            utc(2025, 11, 23, 22, 58, 56) + chrono::Duration::milliseconds(250)
        );
        assert_eq!(parse_timestamp("2025-11-23").unwrap(), utc(2025, 11, 23, 0, 0, 0));
    }

    #[test]
    fn test_parse_epoch_millis() {
        assert_eq!(
            parse_timestamp("1700000000000").unwrap(),
            Utc.timestamp_millis_opt(1_700_000_000_000).unwrap()
        );
    }

    #[test]
    fn test_parse_garbage() {
        assert!(matches!(
            parse_timestamp("next tuesday"),
            Err(AgeError::InvalidTimestamp(_))
        ));
        assert!(parse_timestamp("").is_err());
        assert_eq!(
            PublishedAt::parse("soon"),
            PublishedAt::Unparseable("soon".to_string())
        );
        assert_eq!(PublishedAt::parse("soon").instant(), None);
    }

    #[test]
    fn test_deserialize_variants() {
        let from_str: PublishedAt = serde_json::from_str("\"2025-01-01T00:00:00Z\"").unwrap();
        assert_eq!(from_str.instant(), Some(utc(2025, 1, 1, 0, 0, 0)));

        let from_num: PublishedAt = serde_json::from_str("1700000000000").unwrap();
        assert_eq!(
            from_num.instant(),
            Some(Utc.timestamp_millis_opt(1_700_000_000_000).unwrap())
        );

        let from_bool: PublishedAt = serde_json::from_str("true").unwrap();
        assert_eq!(from_bool.instant(), None);

        let from_garbage: PublishedAt = serde_json::from_str("\"not a date\"").unwrap();
        assert_eq!(from_garbage.instant(), None);
    }

    #[test]
    fn test_zero_millis_is_unset() {
        let zero: PublishedAt = serde_json::from_str("0").unwrap();
        assert_eq!(zero, PublishedAt::Unparseable("0".to_string()));

        let zero_float: PublishedAt = serde_json::from_str("0.0").unwrap();
        assert_eq!(zero_float.instant(), None);

        let one: PublishedAt = serde_json::from_str("1").unwrap();
        assert_eq!(one.instant(), Some(Utc.timestamp_millis_opt(1).unwrap()));
    }
}
