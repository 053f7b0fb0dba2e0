//! Discovery of candidate files below a parser's ROM directory.

pub mod error;

use crate::error::{ErrorKind as LibraryErrorKind, Result as LibraryResult};
use crate::scan::error::{ErrorKind as ScanErrorKind, Result as ScanResult};
use exn::ResultExt;
use std::path::{Path, PathBuf};
use tracing::instrument;
use walkdir::WalkDir;

/// A file found by [`scan`].
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct ScannedFile {
    pub path: PathBuf,
    /// Path below the scan root, always `/`-separated.
    pub relative: String,
}
impl ScannedFile {
    pub fn new(root: impl AsRef<Path>, path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let relative = path
            .strip_prefix(root.as_ref())
            .unwrap_or(&path)
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");
        Self { path, relative }
    }
}

/// Lists every file below `root` whose extension is in `extensions`
/// (compared case-insensitively, without the dot). An empty `extensions`
/// accepts every file. Results are sorted by path.
///
/// Symbolic links are followed.
pub fn scan(root: impl AsRef<Path>, extensions: &[String]) -> LibraryResult<Vec<ScannedFile>> {
    scan_inner(root.as_ref(), extensions).or_raise(|| LibraryErrorKind::Scan)
}

#[instrument(skip(extensions), fields(root = %root.display()))]
fn scan_inner(root: &Path, extensions: &[String]) -> ScanResult<Vec<ScannedFile>> {
    if !root.is_dir() {
        exn::bail!(ScanErrorKind::RootNotFound(root.display().to_string()));
    }
    let extensions: Vec<String> = extensions
        .iter()
        .map(|e| e.trim_start_matches('.').to_lowercase())
        .collect();

    let mut files = Vec::new();
    for entry in WalkDir::new(root).follow_links(true) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                let path = e.path().unwrap_or(root).display().to_string();
                return Err(e).or_raise(|| ScanErrorKind::Unreadable(path));
            },
        };
        if !entry.file_type().is_file() {
            continue;
        }
        let matches = extensions.is_empty()
            || entry
                .path()
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| extensions.contains(&e.to_lowercase()));
        if matches {
            files.push(ScannedFile::new(root, entry.into_path()));
        }
    }
    files.sort();
    tracing::debug!(files = files.len(), "Scan complete");
    Ok(files)
}
