use chrono::{NaiveDateTime, TimeDelta};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::offset::TimezoneOffset;

/// An EXIF unsigned RATIONAL: two `u32` values.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rational {
    pub numerator: u32,
    pub denominator: u32,
}

impl Rational {
    pub const fn new(numerator: u32, denominator: u32) -> Self {
        Self {
            numerator,
            denominator,
        }
    }

    /// A whole number stored the way EXIF GPS time components are: `(value, 1)`.
    pub const fn whole(value: u32) -> Self {
        Self::new(value, 1)
    }
}

impl From<(u32, u32)> for Rational {
    fn from((numerator, denominator): (u32, u32)) -> Self {
        Self::new(numerator, denominator)
    }
}

impl fmt::Display for Rational {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.numerator, self.denominator)
    }
}

/// The on-disk encoding of the GPS date and time tags.
///
/// `date` is the GPSDateStamp value (`YYYY:MM:DD`, UTC) and `time` holds the
/// GPSTimeStamp hour, minute and second as `(value, 1)` rationals.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GpsStamp {
    pub date: String,
    pub time: [Rational; 3],
}

impl fmt::Display for GpsStamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [h, m, s] = &self.time;
        write!(
            f,
            "{} {:02}:{:02}:{:02}",
            self.date, h.numerator, m.numerator, s.numerator
        )
    }
}

/// The timestamps currently stored in an image.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Correction {
    /// DateTimeOriginal, camera local time.
    pub original: NaiveDateTime,
    /// GPSDateStamp + GPSTimeStamp, nominally UTC.
    pub current_gps: NaiveDateTime,
}

impl Correction {
    /// The UTC timestamp a rewrite with `offset` would store.
    pub fn proposed(&self, offset: &TimezoneOffset) -> Option<NaiveDateTime> {
        offset.to_utc(self.original).ok()
    }

    /// How far the stored GPS time is from the proposed one.
    pub fn drift(&self, offset: &TimezoneOffset) -> Option<TimeDelta> {
        self.proposed(offset)
            .map(|proposed| self.current_gps.signed_duration_since(proposed))
    }

    /// Whether the GPS tags already hold the value a rewrite would produce.
    pub fn is_consistent(&self, offset: &TimezoneOffset) -> bool {
        self.drift(offset).is_some_and(|d| d.is_zero())
    }
}
