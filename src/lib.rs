//! # EXIF GPS Fix
//!
//! Rewrite the EXIF GPS date and time of photos from their original capture time.
//!
//! Cameras and GPS loggers often disagree about the time a photo was taken. This
//! crate reads the camera's local `DateTimeOriginal`, shifts it to UTC with a
//! user supplied `{+|-}HHMM` offset, and stores the result as `GPSDateStamp` and
//! `GPSTimeStamp`, encoded the way EXIF 2.31 requires.
//!
//! ## Key Features
//!
//! - **Timestamp codec**: Strict decoding of EXIF date/time strings and GPS rationals, and the exact inverse encoding.
//! - **Timezone offsets**: Validation of `{+|-}HHMM` offsets and local <-> UTC conversion without a timezone database.
//! - **Safe rewrites**: Only the two GPS tags change, written through a temporary file and an atomic rename.
//! - **Backups**: Optional byte-identical copies of the originals before they are touched.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::path::Path;
//! use exif_gps_fix::{GpsRewriter, GpsFixError};
//! use exif_gps_fix::exif::LittleExifCodec;
//! use exif_gps_fix::time::TimezoneOffset;
//!
//! fn main() -> Result<(), GpsFixError> {
//!     let photo = Path::new("photos/IMG_0001.jpg");
//!     let rewriter = GpsRewriter::builder().codec(LittleExifCodec::new()).build();
//!
//!     let correction = rewriter.compute_correction(photo)?;
//!     println!("Original: {}, GPS: {}", correction.original, correction.current_gps);
//!
//!     let offset = TimezoneOffset::parse("-0700")?;
//!     let stamp = rewriter.apply(photo, correction.original, &offset)?;
//!     println!("New GPS timestamp: {stamp}");
//!
//!     Ok(())
//! }
//! ```

pub mod backup;
pub mod exif;
mod rewriter;
pub mod time;
pub mod utils;

pub use rewriter::GpsRewriter;
use thiserror::Error;

/// The primary error type for the exif-gps-fix crate.
#[derive(Error, Debug)]
pub enum GpsFixError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Directory traversal failed: {0}")]
    Walk(#[from] walkdir::Error),

    // --- Custom Module Errors ---
    #[error(transparent)]
    Time(#[from] crate::time::error::TimeError),

    #[error(transparent)]
    Codec(#[from] crate::exif::error::CodecError),

    #[error(transparent)]
    Backup(#[from] crate::backup::BackupError),
}
