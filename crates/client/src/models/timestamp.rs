//! Backend timestamps.
//!
//! The backend serializes dates inconsistently: ISO-8601 strings (with or
//! without an offset, sometimes date-only) on some endpoints and Java
//! `LocalDateTime` arrays (`[2024, 3, 9, 14, 5, 30, 0]`) on others.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer, de};

/// A point in time as reported by the backend. Offsets are folded into UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(NaiveDateTime);

impl Timestamp {
    /// Wrap a naive UTC date-time.
    #[must_use]
    pub const fn new(value: NaiveDateTime) -> Self {
        Self(value)
    }

    /// The current instant.
    #[must_use]
    pub fn now() -> Self {
        Self(Utc::now().naive_utc())
    }

    /// The underlying naive UTC date-time.
    #[must_use]
    pub const fn naive(&self) -> NaiveDateTime {
        self.0
    }

    /// Build from `[year, month, day, hour?, minute?, second?, nanos?]`.
    #[must_use]
    pub fn from_parts(parts: &[i64]) -> Option<Self> {
        let part = |i: usize| parts.get(i).copied().unwrap_or(0);
        if parts.len() < 3 {
            return None;
        }

        let date = NaiveDate::from_ymd_opt(
            i32::try_from(part(0)).ok()?,
            u32::try_from(part(1)).ok()?,
            u32::try_from(part(2)).ok()?,
        )?;
        let time = date.and_hms_nano_opt(
            u32::try_from(part(3)).ok()?,
            u32::try_from(part(4)).ok()?,
            u32::try_from(part(5)).ok()?,
            u32::try_from(part(6)).ok()?,
        )?;
        Some(Self(time))
    }
}

impl From<NaiveDateTime> for Timestamp {
    fn from(value: NaiveDateTime) -> Self {
        Self(value)
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(value: DateTime<Utc>) -> Self {
        Self(value.naive_utc())
    }
}

/// Error for text that is not a recognizable timestamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseTimestampError(String);

impl fmt::Display for ParseTimestampError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid timestamp: {:?}", self.0)
    }
}

impl std::error::Error for ParseTimestampError {}

impl FromStr for Timestamp {
    type Err = ParseTimestampError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();

        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Ok(Self(dt.naive_utc()));
        }
        for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
            if let Ok(dt) = NaiveDateTime::parse_from_str(s, format) {
                return Ok(Self(dt));
            }
        }
        NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(Self)
            .ok_or_else(|| ParseTimestampError(s.to_string()))
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%dT%H:%M:%S%.f"))
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            Parts(Vec<i64>),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Text(text) => text.parse().map_err(de::Error::custom),
            Raw::Parts(parts) => Self::from_parts(&parts)
                .ok_or_else(|| de::Error::custom(format!("invalid date array: {parts:?}"))),
        }
    }
}
