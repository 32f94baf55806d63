//! Reading and writing the EXIF tags involved in a GPS timestamp fix.
//!
//! The [`MetadataCodec`] trait is the seam between the timestamp logic and the
//! container format. [`LittleExifCodec`] is the implementation used on real files.
pub mod error;
pub mod little;
#[cfg(test)]
pub(crate) mod memory;

pub use error::CodecError;
pub use little::LittleExifCodec;

use crate::time::{ExifTagId, GpsStamp, Rational};
use std::path::Path;

/// The subset of a file's EXIF dictionary this crate cares about.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExifTagSet {
    pub date_time_original: Option<String>,
    pub gps_date_stamp: Option<String>,
    pub gps_time_stamp: Option<Vec<Rational>>,
    /// Number of tags found in the file, of any kind.
    pub tag_count: usize,
}

impl ExifTagSet {
    pub fn date_time_original(&self) -> Result<&str, CodecError> {
        self.date_time_original
            .as_deref()
            .ok_or(CodecError::MissingTag(ExifTagId::DateTimeOriginal))
    }

    pub fn gps_date_stamp(&self) -> Result<&str, CodecError> {
        self.gps_date_stamp
            .as_deref()
            .ok_or(CodecError::MissingTag(ExifTagId::GpsDateStamp))
    }

    pub fn gps_time_stamp(&self) -> Result<&[Rational], CodecError> {
        self.gps_time_stamp
            .as_deref()
            .ok_or(CodecError::MissingTag(ExifTagId::GpsTimeStamp))
    }
}

/// Loads and persists EXIF tag sets for image files.
pub trait MetadataCodec {
    /// Reads the tag set of `path`.
    ///
    /// Fails with [`CodecError::UnsupportedImage`] when the file is not a
    /// recognised container or carries no EXIF tags.
    fn load(&self, path: &Path) -> Result<ExifTagSet, CodecError>;

    /// Replaces GPSDateStamp and GPSTimeStamp in `path`, leaving every other
    /// tag and the image data untouched.
    ///
    /// Either the whole new tag set is written or the file keeps its previous
    /// tags; a failed write never leaves the file half-updated.
    fn store_gps(&self, path: &Path, stamp: &GpsStamp) -> Result<(), CodecError>;
}

/// Strips the NUL terminator (and any padding after it) from an EXIF ASCII value.
pub(crate) fn clean_ascii(value: &str) -> String {
    value
        .split('\0')
        .next()
        .unwrap_or_default()
        .trim_end()
        .to_string()
}
