use super::error::CodecError;
use super::{ExifTagSet, MetadataCodec, clean_ascii};
use crate::time::{GpsStamp, Rational};
use little_exif::exif_tag::ExifTag;
use little_exif::metadata::Metadata;
use little_exif::rational::uR64;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::path::Path;
use tracing::debug;

/// [`MetadataCodec`] backed by the `little_exif` crate.
///
/// Writes go to a temporary copy of the image in the same directory which is
/// then renamed over the original. The rewritten file is a new inode: hard
/// links to the old file keep the old tags, and ownership and extended
/// attributes are not carried over (permission bits are).
#[derive(Debug, Clone, Copy, Default)]
pub struct LittleExifCodec;

impl LittleExifCodec {
    pub const fn new() -> Self {
        Self
    }
}

/// `little_exif` panics on some malformed containers, so panics count as parse failures.
fn read_metadata(path: &Path) -> Result<Metadata, CodecError> {
    let unsupported = |reason: String| CodecError::UnsupportedImage {
        path: path.to_path_buf(),
        reason,
    };
    match catch_unwind(|| Metadata::new_from_path(path)) {
        Ok(Ok(metadata)) => Ok(metadata),
        Ok(Err(e)) => Err(unsupported(e.to_string())),
        Err(_) => Err(unsupported("EXIF container could not be parsed".to_string())),
    }
}

fn to_rationals(values: &[uR64]) -> Vec<Rational> {
    values
        .iter()
        .map(|r| Rational::new(r.nominator, r.denominator))
        .collect()
}

fn to_ur64(values: &[Rational]) -> Vec<uR64> {
    values
        .iter()
        .map(|r| uR64 {
            nominator: r.numerator,
            denominator: r.denominator,
        })
        .collect()
}

impl MetadataCodec for LittleExifCodec {
    fn load(&self, path: &Path) -> Result<ExifTagSet, CodecError> {
        let metadata = read_metadata(path)?;

        let mut tags = ExifTagSet::default();
        for tag in &metadata {
            tags.tag_count += 1;
            match tag {
                ExifTag::DateTimeOriginal(value) => {
                    tags.date_time_original = Some(clean_ascii(value));
                }
                ExifTag::GPSDateStamp(value) => {
                    tags.gps_date_stamp = Some(clean_ascii(value));
                }
                ExifTag::GPSTimeStamp(values) => {
                    tags.gps_time_stamp = Some(to_rationals(values));
                }
                _ => {}
            }
        }

        if tags.tag_count == 0 {
            return Err(CodecError::UnsupportedImage {
                path: path.to_path_buf(),
                reason: "no EXIF tags found".to_string(),
            });
        }
        debug!(path = %path.display(), tag_count = tags.tag_count, "Loaded EXIF tags");
        Ok(tags)
    }

    fn store_gps(&self, path: &Path, stamp: &GpsStamp) -> Result<(), CodecError> {
        let mut metadata = read_metadata(path)?;
        metadata.set_tag(ExifTag::GPSDateStamp(stamp.date.clone()));
        metadata.set_tag(ExifTag::GPSTimeStamp(to_ur64(&stamp.time)));

        let persist = |source: std::io::Error| CodecError::Persist {
            path: path.to_path_buf(),
            source,
        };

        // The temporary file keeps the extension, little_exif picks the container from it.
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let suffix = path
            .extension()
            .map(|ext| format!(".{}", ext.to_string_lossy()))
            .unwrap_or_default();
        let temp = tempfile::Builder::new()
            .prefix(".exif-gps-fix-")
            .suffix(&suffix)
            .tempfile_in(dir)
            .map_err(persist)?;

        // fs::copy carries the permission bits over as well as the content.
        std::fs::copy(path, temp.path()).map_err(persist)?;

        match catch_unwind(AssertUnwindSafe(|| metadata.write_to_file(temp.path()))) {
            Ok(Ok(())) => {}
            Ok(Err(e)) => return Err(persist(e)),
            Err(_) => {
                return Err(persist(std::io::Error::other(
                    "EXIF writer panicked while serializing the tag set",
                )));
            }
        }

        temp.persist(path).map_err(|e| persist(e.error))?;
        debug!(path = %path.display(), gps = %stamp, "Persisted GPS tags");
        Ok(())
    }
}
