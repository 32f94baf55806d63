//! Conversions between EXIF timestamp encodings and `NaiveDateTime`.

use super::error::TimeError;
use super::structs::{GpsStamp, Rational};
use super::tags::ExifTagId;
use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use tracing::warn;

/// Parses a DateTimeOriginal value (`YYYY:MM:DD HH:MM:SS`, camera local time).
pub fn decode_original(raw: &str) -> Result<NaiveDateTime, TimeError> {
    let field = ExifTagId::DateTimeOriginal.name();
    let halves: Vec<&str> = raw.split(' ').collect();
    let [date_str, time_str] = halves.as_slice() else {
        return Err(TimeError::malformed(
            field,
            raw,
            "expected a date and a time separated by a single space",
        ));
    };

    let date = parse_date(field, raw, date_str)?;
    let time = parse_time(field, raw, time_str)?;
    Ok(date.and_time(time))
}

/// Parses a GPSDateStamp string and GPSTimeStamp rationals into one UTC timestamp.
///
/// Only the numerator of each time component is used. A denominator of zero is
/// rejected; any other denominator is ignored.
pub fn decode_gps(raw_date: &str, raw_time: &[Rational]) -> Result<NaiveDateTime, TimeError> {
    let date_field = ExifTagId::GpsDateStamp.name();
    let time_field = ExifTagId::GpsTimeStamp.name();

    let date = parse_date(date_field, raw_date, raw_date)?;

    let [h, m, s] = raw_time else {
        let rendered: Vec<String> = raw_time.iter().map(Rational::to_string).collect();
        return Err(TimeError::malformed(
            time_field,
            &rendered.join(", "),
            format!("expected 3 rationals, found {}", raw_time.len()),
        ));
    };

    for (component, rational) in [h, m, s].into_iter().enumerate() {
        if rational.denominator == 0 {
            return Err(TimeError::InvalidRational {
                field: time_field,
                component,
            });
        }
        if rational.denominator != 1 {
            warn!(
                component,
                numerator = rational.numerator,
                denominator = rational.denominator,
                "GPSTimeStamp component has a non-unit denominator, using the numerator only"
            );
        }
    }

    let time_str = format!(
        "{:02}:{:02}:{:02}",
        h.numerator, m.numerator, s.numerator
    );
    let time = parse_time(time_field, &time_str, &time_str)?;
    Ok(date.and_time(time))
}

/// Renders a UTC timestamp as GPSDateStamp/GPSTimeStamp values.
pub fn encode_gps(ts: NaiveDateTime) -> Result<GpsStamp, TimeError> {
    if !(0..=9999).contains(&ts.year()) {
        return Err(TimeError::OutOfRange(format!(
            "year {} does not fit the YYYY:MM:DD GPS date format",
            ts.year()
        )));
    }

    Ok(GpsStamp {
        date: format!("{:04}:{:02}:{:02}", ts.year(), ts.month(), ts.day()),
        time: [
            Rational::whole(ts.hour()),
            Rational::whole(ts.minute()),
            Rational::whole(ts.second()),
        ],
    })
}

/// Splits `text` into three colon separated numbers, each at most `widths[i]`
/// digits long (exactly four for a year).
fn split_fields(
    field: &'static str,
    raw: &str,
    text: &str,
    names: [&str; 3],
    widths: [usize; 3],
) -> Result<[u32; 3], TimeError> {
    let parts: Vec<&str> = text.split(':').collect();
    if parts.len() != 3 {
        return Err(TimeError::malformed(
            field,
            raw,
            format!(
                "expected {}:{}:{} but found {} colon separated parts in {text:?}",
                names[0],
                names[1],
                names[2],
                parts.len()
            ),
        ));
    }

    let mut values = [0u32; 3];
    for (i, part) in parts.iter().enumerate() {
        let digits_ok = !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit());
        let width_ok = if names[i] == "YYYY" {
            part.len() == widths[i]
        } else {
            part.len() <= widths[i]
        };
        if !digits_ok || !width_ok {
            return Err(TimeError::malformed(
                field,
                raw,
                format!("{} component {part:?} is not numeric", names[i]),
            ));
        }
        values[i] = part
            .parse()
            .map_err(|_| TimeError::malformed(field, raw, format!("{} overflows", names[i])))?;
    }
    Ok(values)
}

fn parse_date(field: &'static str, raw: &str, text: &str) -> Result<NaiveDate, TimeError> {
    let [year, month, day] = split_fields(field, raw, text, ["YYYY", "MM", "DD"], [4, 2, 2])?;
    // `year` is at most four digits, so the cast cannot wrap.
    NaiveDate::from_ymd_opt(year as i32, month, day).ok_or_else(|| {
        TimeError::malformed(
            field,
            raw,
            format!("{year:04}-{month:02}-{day:02} is not a calendar date"),
        )
    })
}

fn parse_time(field: &'static str, raw: &str, text: &str) -> Result<NaiveTime, TimeError> {
    let [hour, minute, second] =
        split_fields(field, raw, text, ["HH", "MM", "SS"], [2, 2, 2])?;
    NaiveTime::from_hms_opt(hour, minute, second).ok_or_else(|| {
        TimeError::malformed(
            field,
            raw,
            format!("{hour:02}:{minute:02}:{second:02} is not a valid time of day"),
        )
    })
}
