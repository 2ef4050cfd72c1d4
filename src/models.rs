// src/models.rs
use chrono::{Local, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

/// Format written to the record file for `createdAt`: local time, no offset.
/// The fraction is only written when the seconds have one.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";
const TIMESTAMP_FORMAT_MINUTES: &str = "%Y-%m-%dT%H:%M";

/// A saved password as it lives in the store and on disk.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PasswordRecord {
    #[serde(default)]
    pub id: i64,
    pub password: String,
    #[serde(default)]
    pub is_current: bool,
    #[serde(with = "timestamp")]
    pub created_at: NaiveDateTime,
}

/// A record that has not been stored yet. The store assigns the id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPasswordRecord {
    pub password: String,
    pub is_current: bool,
    pub created_at: NaiveDateTime,
}

impl NewPasswordRecord {
    /// Candidate stamped with the current local time, not flagged current.
    pub fn new(password: impl Into<String>) -> Self {
        Self {
            password: password.into(),
            is_current: false,
            created_at: now_to_minute(),
        }
    }

    pub fn at(mut self, created_at: NaiveDateTime) -> Self {
        self.created_at = created_at;
        self
    }

    pub fn current(mut self, is_current: bool) -> Self {
        self.is_current = is_current;
        self
    }

    pub(crate) fn with_id(self, id: i64) -> PasswordRecord {
        PasswordRecord {
            id,
            password: self.password,
            is_current: self.is_current,
            created_at: self.created_at,
        }
    }
}

/// Local wall-clock time truncated to the minute.
pub fn now_to_minute() -> NaiveDateTime {
    let now = Local::now().naive_local();
    now.with_second(0)
        .and_then(|t| t.with_nanosecond(0))
        .unwrap_or(now)
}

/// Accepts `YYYY-MM-DDTHH:MM`, `YYYY-MM-DDTHH:MM:SS` and fractional seconds.
pub fn parse_timestamp(input: &str) -> Result<NaiveDateTime, chrono::ParseError> {
    let input = input.trim();
    input
        .parse::<NaiveDateTime>()
        .or_else(|_| NaiveDateTime::parse_from_str(input, TIMESTAMP_FORMAT_MINUTES))
}

pub fn format_timestamp(value: &NaiveDateTime) -> String {
    value.format(TIMESTAMP_FORMAT).to_string()
}

mod timestamp {
    use chrono::NaiveDateTime;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::format_timestamp(value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDateTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::parse_timestamp(&raw)
            .map_err(|e| de::Error::custom(format!("invalid createdAt '{}': {}", raw, e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn ts(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, s)
            .unwrap()
    }

    #[test]
    fn test_parse_timestamp_accepts_minute_and_second_forms() {
        assert_eq!(parse_timestamp("2025-06-01T09:15").unwrap(), ts(2025, 6, 1, 9, 15, 0));
        assert_eq!(parse_timestamp("2025-06-01T09:15:42").unwrap(), ts(2025, 6, 1, 9, 15, 42));
        assert_eq!(
            parse_timestamp("2025-06-01T09:15:42.123456789").unwrap(),
            ts(2025, 6, 1, 9, 15, 42).with_nanosecond(123_456_789).unwrap()
        );
        assert!(parse_timestamp("yesterday").is_err());
        assert!(parse_timestamp("2025-06-01").is_err());
    }

    #[test]
    fn test_record_json_field_names() {
        let record = PasswordRecord {
            id: 1,
            password: "Ab3fG7kLmN2p".to_string(),
            is_current: true,
            created_at: ts(2025, 6, 1, 9, 15, 0),
        };
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "id": 1,
                "password": "Ab3fG7kLmN2p",
                "isCurrent": true,
                "createdAt": "2025-06-01T09:15:00"
            })
        );
    }

    #[test]
    fn test_format_timestamp_keeps_fraction() {
        let whole = ts(2025, 1, 1, 0, 0, 0);
        assert_eq!(format_timestamp(&whole), "2025-01-01T00:00:00");

        let fractional = parse_timestamp("2025-01-01T00:00:00.5").unwrap();
        let written = format_timestamp(&fractional);
        assert_eq!(written, "2025-01-01T00:00:00.500");
        assert_eq!(parse_timestamp(&written).unwrap(), fractional);
    }

    #[test]
    fn test_record_missing_defaults() {
        let record: PasswordRecord =
            serde_json::from_str(r#"{"password":"abc123","createdAt":"2025-01-01T00:00"}"#).unwrap();
        assert_eq!(record.id, 0);
        assert!(!record.is_current);
        assert_eq!(record.created_at, ts(2025, 1, 1, 0, 0, 0));
    }

    #[test]
    fn test_record_rejects_bad_timestamp() {
        let result: Result<PasswordRecord, _> =
            serde_json::from_str(r#"{"id":1,"password":"x","createdAt":"not a date"}"#);
        let err = result.unwrap_err().to_string();
        assert!(err.contains("invalid createdAt"), "unexpected error: {}", err);
    }

    #[test]
    fn test_new_record_is_minute_precise() {
        let candidate = NewPasswordRecord::new("abc123");
        assert_eq!(candidate.created_at.second(), 0);
        assert_eq!(candidate.created_at.nanosecond(), 0);
        assert!(!candidate.is_current);

        let stored = candidate.current(true).at(ts(2025, 3, 1, 0, 0, 0)).with_id(7);
        assert_eq!(stored.id, 7);
        assert!(stored.is_current);
        assert_eq!(stored.created_at, ts(2025, 3, 1, 0, 0, 0));
    }
}
