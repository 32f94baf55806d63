use crate::GpsFixError;
use crate::backup::Backup;
use crate::exif::MetadataCodec;
use crate::time::{Correction, GpsStamp, TimezoneOffset, decode_gps, decode_original, encode_gps};
use bon::bon;
use chrono::NaiveDateTime;
use std::path::Path;
use tracing::{debug, info};

/// Reads image timestamps and rewrites GPS date/time tags from the original capture time.
///
/// Use the builder to construct an instance:
/// ```rust
/// # use exif_gps_fix::GpsRewriter;
/// # use exif_gps_fix::backup::Backup;
/// # use exif_gps_fix::exif::LittleExifCodec;
/// let rewriter = GpsRewriter::builder()
///     .codec(LittleExifCodec::new())
///     .backup(Backup::new("exif-gps-backup"))
///     .build();
/// ```
#[derive(Debug)]
pub struct GpsRewriter<C> {
    codec: C,
    backup: Option<Backup>,
}

#[bon]
impl<C: MetadataCodec> GpsRewriter<C> {
    /// Constructs a `GpsRewriter`.
    ///
    /// # Builder Arguments
    ///
    /// * `codec: C` - Reads and writes the EXIF tag set of image files.
    /// * `backup: Option<Backup>` - When set, every file is copied into the backup
    ///   directory before its tags are rewritten.
    #[builder]
    pub fn new(codec: C, backup: Option<Backup>) -> Self {
        Self { codec, backup }
    }

    pub fn codec(&self) -> &C {
        &self.codec
    }

    pub fn backup(&self) -> Option<&Backup> {
        self.backup.as_ref()
    }

    /// Whether `path` is an image carrying EXIF metadata.
    pub fn is_image(&self, path: &Path) -> bool {
        self.codec.load(path).is_ok()
    }

    /// Reads DateTimeOriginal and the GPS date/time of `path`. Never writes.
    ///
    /// # Errors
    ///
    /// * [`GpsFixError::Codec`] when the file is not an image with EXIF data or a tag is missing.
    /// * [`GpsFixError::Time`] when a stored timestamp cannot be decoded.
    pub fn compute_correction(&self, path: &Path) -> Result<Correction, GpsFixError> {
        let tags = self.codec.load(path)?;
        let original = decode_original(tags.date_time_original()?)?;
        let current_gps = decode_gps(tags.gps_date_stamp()?, tags.gps_time_stamp()?)?;
        debug!(
            path = %path.display(),
            %original,
            %current_gps,
            "Read capture and GPS timestamps"
        );
        Ok(Correction {
            original,
            current_gps,
        })
    }

    /// Stores `original - offset` as the GPS date/time of `path`.
    ///
    /// The backup, when configured, is taken before anything is written. Only
    /// GPSDateStamp and GPSTimeStamp change. Applying the same arguments twice
    /// stores the same tags both times.
    ///
    /// # Errors
    ///
    /// * [`GpsFixError::Time`] when the shifted timestamp cannot be encoded.
    /// * [`GpsFixError::Backup`] when the backup copy fails; the file is not touched.
    /// * [`GpsFixError::Codec`] when the file is unsupported or the write-back fails;
    ///   the file keeps its previous tags.
    pub fn apply(
        &self,
        path: &Path,
        original: NaiveDateTime,
        offset: &TimezoneOffset,
    ) -> Result<GpsStamp, GpsFixError> {
        let utc = offset.to_utc(original)?;
        let stamp = encode_gps(utc)?;

        if let Some(backup) = &self.backup {
            backup.copy(path)?;
        }
        self.codec.store_gps(path, &stamp)?;

        info!(path = %path.display(), %original, %offset, gps = %stamp, "Rewrote GPS timestamp");
        Ok(stamp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exif::memory::MemoryCodec;
    use crate::exif::{CodecError, ExifTagSet};
    use crate::time::{ExifTagId, Rational, TimeError};
    use chrono::NaiveDate;
    use std::fs;
    use std::path::PathBuf;

    fn dt(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, mo, d)
            .unwrap()
            .and_hms_opt(h, mi, s)
            .unwrap()
    }

    fn rewriter(codec: MemoryCodec) -> GpsRewriter<MemoryCodec> {
        GpsRewriter::builder().codec(codec).build()
    }

    #[test]
    fn test_end_to_end_fix() -> Result<(), GpsFixError> {
        let path = PathBuf::from("trip/IMG_0001.jpg");
        let codec = MemoryCodec::new().with_image(
            &path,
            "2023:06:01 14:00:00",
            "2023:06:01",
            [(5, 1), (0, 1), (0, 1)],
        );
        let rewriter = rewriter(codec);

        let correction = rewriter.compute_correction(&path)?;
        assert_eq!(correction.original, dt(2023, 6, 1, 14, 0, 0));
        assert_eq!(correction.current_gps, dt(2023, 6, 1, 5, 0, 0));

        let offset = TimezoneOffset::parse("-0900")?;
        let stamp = rewriter.apply(&path, correction.original, &offset)?;
        assert_eq!(stamp.date, "2023:06:01");
        assert_eq!(
            stamp.time,
            [Rational::new(23, 1), Rational::new(0, 1), Rational::new(0, 1)]
        );

        let stored = rewriter.codec().tags(&path).unwrap();
        assert_eq!(stored.gps_date_stamp.as_deref(), Some("2023:06:01"));
        assert_eq!(stored.gps_time_stamp, Some(stamp.time.to_vec()));
        assert_eq!(
            stored.date_time_original.as_deref(),
            Some("2023:06:01 14:00:00"),
            "the original capture time is never rewritten"
        );

        let after = rewriter.compute_correction(&path)?;
        assert!(after.is_consistent(&offset));
        Ok(())
    }

    #[test]
    fn test_apply_is_idempotent() -> Result<(), GpsFixError> {
        let path = PathBuf::from("a.jpg");
        let rewriter = rewriter(MemoryCodec::new().with_image(
            &path,
            "2021:12:31 20:15:00",
            "2021:12:31",
            [(0, 1), (0, 1), (0, 1)],
        ));
        let offset = TimezoneOffset::parse("-0500")?;
        let original = rewriter.compute_correction(&path)?.original;

        let first = rewriter.apply(&path, original, &offset)?;
        let tags_after_first = rewriter.codec().tags(&path);
        let second = rewriter.apply(&path, original, &offset)?;

        assert_eq!(first, second);
        assert_eq!(first.date, "2022:01:01");
        assert_eq!(rewriter.codec().tags(&path), tags_after_first);
        assert_eq!(rewriter.codec().writes(), 2);
        Ok(())
    }

    #[test]
    fn test_persist_failure_leaves_tags_intact() {
        let path = PathBuf::from("a.jpg");
        let codec = MemoryCodec::new().with_image(
            &path,
            "2023:06:01 14:00:00",
            "2023:06:01",
            [(5, 1), (0, 1), (0, 1)],
        );
        codec.fail_writes(true);
        let rewriter = rewriter(codec);
        let before = rewriter.codec().tags(&path);

        let offset = TimezoneOffset::parse("+0200").unwrap();
        let result = rewriter.apply(&path, dt(2023, 6, 1, 14, 0, 0), &offset);

        assert!(matches!(
            result,
            Err(GpsFixError::Codec(CodecError::Persist { .. }))
        ));
        assert_eq!(rewriter.codec().tags(&path), before);
    }

    #[test]
    fn test_unsupported_image() {
        let rewriter = rewriter(MemoryCodec::new().with_tags("empty.jpg", ExifTagSet::default()));

        assert!(!rewriter.is_image(Path::new("empty.jpg")));
        assert!(!rewriter.is_image(Path::new("unknown.jpg")));
        assert!(matches!(
            rewriter.compute_correction(Path::new("empty.jpg")),
            Err(GpsFixError::Codec(CodecError::UnsupportedImage { .. }))
        ));
        let offset = TimezoneOffset::parse("+0000").unwrap();
        assert!(matches!(
            rewriter.apply(Path::new("unknown.jpg"), dt(2023, 1, 1, 0, 0, 0), &offset),
            Err(GpsFixError::Codec(CodecError::UnsupportedImage { .. }))
        ));
    }

    #[test]
    fn test_missing_gps_tags() {
        let tags = ExifTagSet {
            date_time_original: Some("2023:06:01 14:00:00".to_string()),
            tag_count: 3,
            ..Default::default()
        };
        let rewriter = rewriter(MemoryCodec::new().with_tags("no_gps.jpg", tags));

        assert!(rewriter.is_image(Path::new("no_gps.jpg")));
        assert!(matches!(
            rewriter.compute_correction(Path::new("no_gps.jpg")),
            Err(GpsFixError::Codec(CodecError::MissingTag(
                ExifTagId::GpsDateStamp
            )))
        ));
    }

    #[test]
    fn test_malformed_and_invalid_rational_propagate() {
        let rewriter = rewriter(
            MemoryCodec::new()
                .with_image(
                    "bad_original.jpg",
                    "2023/06/01 14:00:00",
                    "2023:06:01",
                    [(5, 1), (0, 1), (0, 1)],
                )
                .with_image(
                    "bad_rational.jpg",
                    "2023:06:01 14:00:00",
                    "2023:06:01",
                    [(5, 1), (0, 0), (0, 1)],
                ),
        );

        assert!(matches!(
            rewriter.compute_correction(Path::new("bad_original.jpg")),
            Err(GpsFixError::Time(TimeError::MalformedTimestamp {
                field: "DateTimeOriginal",
                ..
            }))
        ));
        assert!(matches!(
            rewriter.compute_correction(Path::new("bad_rational.jpg")),
            Err(GpsFixError::Time(TimeError::InvalidRational { component: 1, .. }))
        ));
    }

    #[test]
    fn test_backup_taken_before_rewrite() -> Result<(), GpsFixError> {
        let source_dir = tempfile::tempdir()?;
        let backup_dir = tempfile::tempdir()?;
        let path = source_dir.path().join("a.jpg");
        fs::write(&path, b"pixels")?;

        let backup = Backup::new(backup_dir.path());
        let expected_copy = backup.destination(&path);
        let rewriter = GpsRewriter::builder()
            .codec(MemoryCodec::new().with_image(
                &path,
                "2023:06:01 14:00:00",
                "2023:06:01",
                [(5, 1), (0, 1), (0, 1)],
            ))
            .backup(backup)
            .build();

        let offset = TimezoneOffset::parse("+0100")?;
        rewriter.apply(&path, dt(2023, 6, 1, 14, 0, 0), &offset)?;

        assert_eq!(fs::read(&expected_copy)?, b"pixels");
        Ok(())
    }

    #[test]
    fn test_failed_backup_prevents_rewrite() {
        let path = PathBuf::from("/definitely/not/here/a.jpg");
        let backup_dir = tempfile::tempdir().unwrap();
        let rewriter = GpsRewriter::builder()
            .codec(MemoryCodec::new().with_image(
                &path,
                "2023:06:01 14:00:00",
                "2023:06:01",
                [(5, 1), (0, 1), (0, 1)],
            ))
            .backup(Backup::new(backup_dir.path()))
            .build();
        let before = rewriter.codec().tags(&path);

        let offset = TimezoneOffset::parse("+0100").unwrap();
        let result = rewriter.apply(&path, dt(2023, 6, 1, 14, 0, 0), &offset);

        assert!(matches!(result, Err(GpsFixError::Backup(_))));
        assert_eq!(rewriter.codec().writes(), 0);
        assert_eq!(rewriter.codec().tags(&path), before);
    }
}
