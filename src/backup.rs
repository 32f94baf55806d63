//! Byte-identical copies of images taken before their tags are rewritten.

use filetime::FileTime;
use std::fs;
use std::path::{Component, Path, PathBuf};
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum BackupError {
    #[error("Could not back up {path:?} to {destination:?}")]
    Io {
        path: PathBuf,
        destination: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Mirrors original files under a backup directory.
///
/// `/photos/2023/a.jpg` is copied to `<dir>/photos/2023/a.jpg`; relative paths
/// keep their components, `..` and `.` are dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Backup {
    dir: PathBuf,
}

impl Backup {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Where the backup of `path` lives.
    pub fn destination(&self, path: &Path) -> PathBuf {
        let relative: PathBuf = path
            .components()
            .filter_map(|c| match c {
                Component::Normal(part) => Some(part),
                _ => None,
            })
            .collect();
        self.dir.join(relative)
    }

    /// Copies `path` into the backup directory and returns the copy's path.
    ///
    /// An existing backup is kept as is, so a second run never replaces the
    /// untouched original with an already rewritten file.
    pub fn copy(&self, path: &Path) -> Result<PathBuf, BackupError> {
        let destination = self.destination(path);
        let err = |source: std::io::Error| BackupError::Io {
            path: path.to_path_buf(),
            destination: destination.clone(),
            source,
        };

        if destination.exists() {
            debug!(path = %path.display(), backup = %destination.display(), "Backup already present");
            return Ok(destination);
        }
        if let Some(parent) = destination.parent() {
            fs::create_dir_all(parent).map_err(err)?;
        }
        fs::copy(path, &destination).map_err(err)?;

        let metadata = fs::metadata(path).map_err(err)?;
        filetime::set_file_mtime(&destination, FileTime::from_last_modification_time(&metadata))
            .map_err(err)?;

        debug!(path = %path.display(), backup = %destination.display(), "Backed up original");
        Ok(destination)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_destination_mirrors_path() {
        let backup = Backup::new("/backups");
        assert_eq!(
            backup.destination(Path::new("/photos/2023/a.jpg")),
            PathBuf::from("/backups/photos/2023/a.jpg")
        );
        assert_eq!(
            backup.destination(Path::new("./trip/../b.jpg")),
            PathBuf::from("/backups/trip/b.jpg")
        );
    }

    #[test]
    fn test_copy_is_byte_identical_and_keeps_mtime() {
        let source_dir = tempfile::tempdir().unwrap();
        let backup_dir = tempfile::tempdir().unwrap();
        let photo = source_dir.path().join("album").join("a.jpg");
        fs::create_dir_all(photo.parent().unwrap()).unwrap();
        fs::write(&photo, [0xFF, 0xD8, 0x00, 0x01, 0xFF, 0xD9]).unwrap();
        let mtime = FileTime::from_unix_time(1_600_000_000, 0);
        filetime::set_file_mtime(&photo, mtime).unwrap();

        let backup = Backup::new(backup_dir.path());
        let copy = backup.copy(&photo).unwrap();

        assert!(copy.starts_with(backup_dir.path()));
        assert!(copy.ends_with("album/a.jpg"));
        assert_eq!(fs::read(&copy).unwrap(), fs::read(&photo).unwrap());
        let copied_meta = fs::metadata(&copy).unwrap();
        assert_eq!(FileTime::from_last_modification_time(&copied_meta), mtime);
    }

    #[test]
    fn test_existing_backup_is_not_overwritten() {
        let source_dir = tempfile::tempdir().unwrap();
        let backup_dir = tempfile::tempdir().unwrap();
        let photo = source_dir.path().join("a.jpg");
        fs::write(&photo, b"original").unwrap();

        let backup = Backup::new(backup_dir.path());
        let first = backup.copy(&photo).unwrap();
        fs::write(&photo, b"rewritten").unwrap();
        let second = backup.copy(&photo).unwrap();

        assert_eq!(first, second);
        assert_eq!(fs::read(&second).unwrap(), b"original");
    }

    #[test]
    fn test_copy_missing_file_fails() {
        let backup_dir = tempfile::tempdir().unwrap();
        let backup = Backup::new(backup_dir.path());
        let result = backup.copy(Path::new("/definitely/not/here.jpg"));
        assert!(matches!(result, Err(BackupError::Io { .. })));
    }
}
