//! EXIF tag numbers read and written by this crate (EXIF 2.31).

use std::fmt;

/// Symbolic names for the EXIF tags involved in a GPS timestamp fix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExifTagId {
    /// ASCII, 24h local time, `YYYY:MM:DD HH:MM:SS`.
    DateTimeOriginal,
    /// ASCII, UTC, `YYYY:MM:DD`.
    GpsDateStamp,
    /// Three RATIONALs, 24h UTC, `((H, 1), (M, 1), (S, 1))`.
    GpsTimeStamp,
}

impl ExifTagId {
    pub const fn code(self) -> u16 {
        match self {
            Self::DateTimeOriginal => 0x9003,
            Self::GpsDateStamp => 0x001D,
            Self::GpsTimeStamp => 0x0007,
        }
    }

    /// The IFD the tag lives in.
    pub const fn group(self) -> &'static str {
        match self {
            Self::DateTimeOriginal => "Exif",
            Self::GpsDateStamp | Self::GpsTimeStamp => "GPS",
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::DateTimeOriginal => "DateTimeOriginal",
            Self::GpsDateStamp => "GPSDateStamp",
            Self::GpsTimeStamp => "GPSTimeStamp",
        }
    }
}

impl fmt::Display for ExifTagId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}/0x{:04X})", self.name(), self.group(), self.code())
    }
}
