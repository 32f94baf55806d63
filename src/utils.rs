use std::path::{Path, PathBuf};
use tracing::warn;
use walkdir::{DirEntry, WalkDir};

/// How directories given on the command line are expanded into files.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WalkOptions {
    /// Descend into subdirectories instead of only listing direct children.
    pub recursive: bool,
    pub follow_symlinks: bool,
    pub include_hidden: bool,
}

/// Checks if a directory entry is hidden (starts with '.').
fn is_hidden(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .is_some_and(|s| s.starts_with('.'))
}

/// Lists the files below `dir`, sorted by name.
///
/// Errors from unreadable entries are propagated. The root itself is never
/// treated as hidden.
pub fn list_files_walkdir_filtered(
    dir: &Path,
    options: WalkOptions,
) -> Result<Vec<PathBuf>, walkdir::Error> {
    let mut walker = WalkDir::new(dir)
        .follow_links(options.follow_symlinks)
        .sort_by_file_name();
    if !options.recursive {
        walker = walker.max_depth(1);
    }

    walker
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || options.include_hidden || !is_hidden(e))
        .filter_map(|entry_result| match entry_result {
            Ok(entry) if entry.file_type().is_file() => Some(Ok(entry.into_path())),
            Ok(_) => None,
            Err(e) => Some(Err(e)),
        })
        .collect()
}

/// Expands command line paths into candidate files, in argument order.
///
/// Paths that do not exist are logged and skipped. Files are kept as given,
/// directories are expanded with [`list_files_walkdir_filtered`] and only the
/// files accepted by `keep` are returned from them.
pub fn collect_candidates(
    paths: &[PathBuf],
    options: WalkOptions,
    mut keep: impl FnMut(&Path) -> bool,
) -> Result<Vec<PathBuf>, walkdir::Error> {
    let mut candidates = Vec::new();
    for path in paths {
        if path.is_dir() {
            let files = list_files_walkdir_filtered(path, options)?;
            candidates.extend(files.into_iter().filter(|f| keep(f)));
        } else if path.is_file() {
            candidates.push(path.clone());
        } else {
            warn!(
                path = %path.display(),
                "Path does not exist or this program does not have permission to access it"
            );
        }
    }
    Ok(candidates)
}
