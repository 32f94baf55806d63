//! Timezone offsets in the `{+|-}HHMM` form and local <-> UTC conversion.

use super::error::TimeError;
use chrono::{NaiveDateTime, TimeDelta};
use regex::Regex;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

// Hours 00-29 are accepted, matching the format users have always been able to enter.
static RE_TIMEZONE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[+-][0-2][0-9][0-5][0-9]$").expect("valid timezone regex"));

/// A fixed offset of local wall-clock time from UTC (local minus UTC).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimezoneOffset {
    negative: bool,
    hours: u8,
    minutes: u8,
}

impl TimezoneOffset {
    /// Parses an offset like `+0530` or `-0800`. The sign is mandatory.
    pub fn parse(text: &str) -> Result<Self, TimeError> {
        if !RE_TIMEZONE.is_match(text) {
            return Err(TimeError::InvalidTimezoneFormat(text.to_string()));
        }

        // The regex guarantees five ASCII bytes with digits at 1..5.
        let bytes = text.as_bytes();
        let digit = |i: usize| bytes[i] - b'0';
        Ok(Self {
            negative: bytes[0] == b'-',
            hours: digit(1) * 10 + digit(2),
            minutes: digit(3) * 10 + digit(4),
        })
    }

    pub const fn is_negative(&self) -> bool {
        self.negative
    }

    pub const fn hours(&self) -> u8 {
        self.hours
    }

    pub const fn minutes(&self) -> u8 {
        self.minutes
    }

    /// Signed offset in seconds. `-0000` and `+0000` are both zero.
    pub fn seconds(&self) -> i32 {
        let magnitude = i32::from(self.hours) * 3600 + i32::from(self.minutes) * 60;
        if self.negative { -magnitude } else { magnitude }
    }

    pub fn duration(&self) -> TimeDelta {
        TimeDelta::seconds(i64::from(self.seconds()))
    }

    /// Converts a local timestamp to UTC: `local - offset`.
    pub fn to_utc(&self, local: NaiveDateTime) -> Result<NaiveDateTime, TimeError> {
        local.checked_sub_signed(self.duration()).ok_or_else(|| {
            TimeError::OutOfRange(format!("{local} shifted by {self} leaves the calendar"))
        })
    }

    /// Converts a UTC timestamp to local time: `utc + offset`.
    pub fn from_utc(&self, utc: NaiveDateTime) -> Result<NaiveDateTime, TimeError> {
        utc.checked_add_signed(self.duration()).ok_or_else(|| {
            TimeError::OutOfRange(format!("{utc} shifted by {self} leaves the calendar"))
        })
    }
}

impl FromStr for TimezoneOffset {
    type Err = TimeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for TimezoneOffset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.negative { '-' } else { '+' };
        write!(f, "{sign}{:02}{:02}", self.hours, self.minutes)
    }
}

/// Converts a local timestamp to UTC using `offset`.
pub fn to_utc(local: NaiveDateTime, offset: &TimezoneOffset) -> Result<NaiveDateTime, TimeError> {
    offset.to_utc(local)
}
