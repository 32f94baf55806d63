//! Timestamp encodings and timezone offset arithmetic.
pub mod error;
pub mod offset;
pub mod parsing;
pub mod structs;
pub mod tags;

pub use error::TimeError;
pub use offset::{TimezoneOffset, to_utc};
pub use parsing::{decode_gps, decode_original, encode_gps};
pub use structs::{Correction, GpsStamp, Rational};
pub use tags::ExifTagId;
