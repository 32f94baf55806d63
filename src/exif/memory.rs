//! In-memory [`MetadataCodec`] for exercising the rewrite flow without image fixtures.

use super::error::CodecError;
use super::{ExifTagSet, MetadataCodec};
use crate::time::{GpsStamp, Rational};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

#[derive(Debug, Default)]
pub struct MemoryCodec {
    files: RefCell<HashMap<PathBuf, ExifTagSet>>,
    fail_writes: Cell<bool>,
    writes: Cell<usize>,
}

impl MemoryCodec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an image with the given DateTimeOriginal and GPS stamps.
    pub fn with_image(
        self,
        path: impl Into<PathBuf>,
        original: &str,
        gps_date: &str,
        gps_time: [(u32, u32); 3],
    ) -> Self {
        let tags = ExifTagSet {
            date_time_original: Some(original.to_string()),
            gps_date_stamp: Some(gps_date.to_string()),
            gps_time_stamp: Some(gps_time.into_iter().map(Rational::from).collect()),
            tag_count: 12,
        };
        self.files.borrow_mut().insert(path.into(), tags);
        self
    }

    pub fn with_tags(self, path: impl Into<PathBuf>, tags: ExifTagSet) -> Self {
        self.files.borrow_mut().insert(path.into(), tags);
        self
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.set(fail);
    }

    pub fn writes(&self) -> usize {
        self.writes.get()
    }

    pub fn tags(&self, path: &Path) -> Option<ExifTagSet> {
        self.files.borrow().get(path).cloned()
    }
}

impl MetadataCodec for MemoryCodec {
    fn load(&self, path: &Path) -> Result<ExifTagSet, CodecError> {
        self.files
            .borrow()
            .get(path)
            .filter(|tags| tags.tag_count > 0)
            .cloned()
            .ok_or_else(|| CodecError::UnsupportedImage {
                path: path.to_path_buf(),
                reason: "no EXIF tags found".to_string(),
            })
    }

    fn store_gps(&self, path: &Path, stamp: &GpsStamp) -> Result<(), CodecError> {
        let mut tags = self.load(path)?;
        if self.fail_writes.get() {
            return Err(CodecError::Persist {
                path: path.to_path_buf(),
                source: std::io::Error::new(std::io::ErrorKind::StorageFull, "disk full"),
            });
        }
        tags.gps_date_stamp = Some(stamp.date.clone());
        tags.gps_time_stamp = Some(stamp.time.to_vec());
        self.files.borrow_mut().insert(path.to_path_buf(), tags);
        self.writes.set(self.writes.get() + 1);
        Ok(())
    }
}
