//! Recursive listing of the distfiles directory.

use super::DistFile;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised by [`scan_distfiles`].
#[derive(Error, Debug)]
pub enum ScanError {
    /// The distfiles directory itself could not be read.
    #[error("cannot read distfiles directory {}", path.display())]
    Unreadable {
        /// Scan root.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: io::Error,
    },
    /// The scan root exists but is not a directory.
    #[error("{} is not a directory", path.display())]
    NotADirectory {
        /// Scan root.
        path: PathBuf,
    },
}

/// List every regular file below `root` with its size and mtime.
///
/// Entries that vanish or cannot be stat'ed during the walk are logged and
/// skipped. Symlinks are not followed.
///
/// # Errors
///
/// Returns [`ScanError`] if `root` is missing, unreadable or not a directory.
pub fn scan_distfiles(root: &Path) -> Result<Vec<DistFile>, ScanError> {
    let meta = fs::metadata(root).map_err(|source| ScanError::Unreadable {
        path: root.to_path_buf(),
        source,
    })?;
    if !meta.is_dir() {
        return Err(ScanError::NotADirectory {
            path: root.to_path_buf(),
        });
    }
    fs::read_dir(root).map_err(|source| ScanError::Unreadable {
        path: root.to_path_buf(),
        source,
    })?;

    let mut files = Vec::new();
    for entry in walkdir::WalkDir::new(root).min_depth(1) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!("skipping unreadable entry: {e}");
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }

        let meta = match entry.metadata() {
            Ok(meta) => meta,
            Err(e) => {
                tracing::warn!("cannot stat {}: {e}", entry.path().display());
                continue;
            }
        };
        let modified = match meta.modified() {
            Ok(t) => t,
            Err(e) => {
                tracing::warn!("no mtime for {}: {e}", entry.path().display());
                continue;
            }
        };

        files.push(DistFile {
            path: entry.into_path(),
            modified,
            size: meta.len(),
        });
    }

    tracing::debug!("scanned {} files under {}", files.len(), root.display());
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_scan_lists_files_recursively() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("foo-1.0.tar.gz"), b"12345").unwrap();
        fs::create_dir(dir.path().join("git3-src")).unwrap();
        fs::write(dir.path().join("git3-src").join("bar-2.0.tar.gz"), b"1").unwrap();

        let mut files = scan_distfiles(dir.path()).unwrap();
        files.sort_by(|a, b| a.path.cmp(&b.path));

        assert_eq!(files.len(), 2);
        assert_eq!(files[0].path, dir.path().join("foo-1.0.tar.gz"));
        assert_eq!(files[0].size, 5);
        assert_eq!(files[1].path, dir.path().join("git3-src").join("bar-2.0.tar.gz"));
    }

    #[test]
    fn test_missing_root_is_an_error() {
        let dir = TempDir::new().unwrap();
        let err = scan_distfiles(&dir.path().join("absent")).unwrap_err();
        assert!(matches!(err, ScanError::Unreadable { .. }));
    }

    #[test]
    fn test_file_root_is_an_error() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("plain");
        fs::write(&file, b"").unwrap();
        let err = scan_distfiles(&file).unwrap_err();
        assert!(matches!(err, ScanError::NotADirectory { .. }));
    }

    #[test]
    fn test_empty_directory() {
        let dir = TempDir::new().unwrap();
        assert!(scan_distfiles(dir.path()).unwrap().is_empty());
    }
}
