use crate::time::ExifTagId;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CodecError {
    #[error("{path:?} is not an image with EXIF metadata: {reason}")]
    UnsupportedImage { path: PathBuf, reason: String },

    #[error("Missing required EXIF tag {0}")]
    MissingTag(ExifTagId),

    #[error("Failed to write EXIF metadata to {path:?}")]
    Persist {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
