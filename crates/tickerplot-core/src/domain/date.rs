use std::fmt::{Display, Formatter};

use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use time::macros::format_description;
use time::{Date, OffsetDateTime, UtcOffset};

use crate::error::DateBound;
use crate::ValidationError;

/// Calendar date rendered as `YYYY-MM-DD`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TradingDate(Date);

impl TradingDate {
    pub const fn new(date: Date) -> Self {
        Self(date)
    }

    /// Parse `YYYY-MM-DD` text; month and day may omit the leading zero.
    pub fn parse(input: &str) -> Result<Self, time::error::Parse> {
        Date::parse(
            input.trim(),
            format_description!("[year]-[month padding:none]-[day padding:none]"),
        )
        .map(Self)
    }

    /// Exchange-local date of a unix timestamp, given the exchange offset in seconds.
    ///
    /// `None` when the timestamp, the offset, or the shifted local time is out of range.
    pub fn from_unix_timestamp(timestamp: i64, gmt_offset_secs: i32) -> Option<Self> {
        let offset = UtcOffset::from_whole_seconds(gmt_offset_secs).ok()?;
        let instant = OffsetDateTime::from_unix_timestamp(timestamp).ok()?;
        instant
            .checked_to_offset(offset)
            .map(|local| Self(local.date()))
    }

    /// Unix timestamp of 00:00 UTC on this date.
    pub fn midnight_unix_timestamp(self) -> i64 {
        self.0.midnight().assume_utc().unix_timestamp()
    }

    pub const fn into_inner(self) -> Date {
        self.0
    }
}

impl From<Date> for TradingDate {
    fn from(value: Date) -> Self {
        Self(value)
    }
}

impl Display for TradingDate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:04}-{:02}-{:02}",
            self.0.year(),
            u8::from(self.0.month()),
            self.0.day()
        )
    }
}

impl Serialize for TradingDate {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TradingDate {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Self::parse(&value).map_err(D::Error::custom)
    }
}

/// A date as it arrives from the form: either already typed or raw text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateInput {
    Date(TradingDate),
    Text(String),
}

impl DateInput {
    /// Treat an absent or blank form value as missing.
    pub fn from_form(value: Option<&str>) -> Option<Self> {
        value
            .filter(|text| !text.trim().is_empty())
            .map(|text| Self::Text(text.to_owned()))
    }

    pub fn resolve(&self, which: DateBound) -> Result<TradingDate, ValidationError> {
        match self {
            Self::Date(date) => Ok(*date),
            Self::Text(text) => {
                TradingDate::parse(text).map_err(|_| ValidationError::InvalidDate {
                    which,
                    value: text.clone(),
                })
            }
        }
    }
}

impl From<TradingDate> for DateInput {
    fn from(value: TradingDate) -> Self {
        Self::Date(value)
    }
}

impl From<Date> for DateInput {
    fn from(value: Date) -> Self {
        Self::Date(TradingDate(value))
    }
}

impl From<&str> for DateInput {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for DateInput {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}
