//! Attribute lists and their on-disk store.
//!
//! An attribute list is a Portage configuration file with one record per
//! line. [`AttributeList`] is the in-memory form; [`AttributeStore`] ties a
//! list to its path and handles loading, the legacy flat-file layout and
//! atomic rewrites.

use crate::tokenize;
use std::fmt;
use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Failures while reading or writing an attribute file.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The file exists but could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Read {
        /// File that failed.
        path: PathBuf,
        /// Underlying error.
        source: io::Error,
    },

    /// The destination directory could not be created.
    #[error("failed to create directory {}: {source}", path.display())]
    CreateDir {
        /// Directory that failed.
        path: PathBuf,
        /// Underlying error.
        source: io::Error,
    },

    /// No temporary file could be created next to the destination.
    #[error("failed to create temporary file in {}: {source}", path.display())]
    TempFile {
        /// Directory the temp file was requested in.
        path: PathBuf,
        /// Underlying error.
        source: io::Error,
    },

    /// Flushing the temporary file failed.
    #[error("failed to write {}: {source}", path.display())]
    Write {
        /// Destination path.
        path: PathBuf,
        /// Underlying error.
        source: io::Error,
    },

    /// Renaming the temporary file over the destination failed.
    #[error("failed to replace {}: {source}", path.display())]
    Persist {
        /// Destination path.
        path: PathBuf,
        /// Underlying error.
        source: io::Error,
    },

    /// Moving a flat `package.*` file out of the way failed.
    #[error("failed to convert {} into a directory: {source}", path.display())]
    Migrate {
        /// The flat file.
        path: PathBuf,
        /// Underlying error.
        source: io::Error,
    },
}

/// One line of an attribute file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeRecord {
    text: String,
    tombstoned: bool,
}

impl AttributeRecord {
    fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            tombstoned: false,
        }
    }

    /// Raw line text, without the newline.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Marked for deletion on the next write.
    pub fn is_tombstoned(&self) -> bool {
        self.tombstoned
    }

    /// Blank, whitespace-only or a `#` comment.
    pub fn is_inert(&self) -> bool {
        let trimmed = self.text.trim_start();
        trimmed.is_empty() || trimmed.starts_with('#')
    }

    /// Counts toward the live set: not inert and not tombstoned.
    pub fn is_live(&self) -> bool {
        !self.tombstoned && !self.is_inert()
    }

    /// Package identity without relational operators.
    pub fn identity(&self) -> Option<&str> {
        if self.is_inert() {
            return None;
        }
        tokenize::identity(self.text.trim_start())
    }
}

/// Ordered records of one attribute file plus a live counter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttributeList {
    records: Vec<AttributeRecord>,
    live: usize,
}

impl AttributeList {
    /// An empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a list from file contents, one record per line.
    pub fn parse(content: &str) -> Self {
        let mut list = Self::new();
        for line in content.lines() {
            list.push(line.trim_end_matches('\r'));
        }
        list
    }

    /// Number of live records.
    pub fn live_count(&self) -> usize {
        self.live
    }

    /// Every record, inert and tombstoned ones included.
    pub fn records(&self) -> &[AttributeRecord] {
        &self.records
    }

    /// Iterate over live records in file order.
    pub fn live(&self) -> impl Iterator<Item = &AttributeRecord> {
        self.records.iter().filter(|r| r.is_live())
    }

    /// Append a record. Returns its position.
    pub fn push(&mut self, text: impl Into<String>) -> usize {
        let record = AttributeRecord::new(text);
        if record.is_live() {
            self.live += 1;
        }
        self.records.push(record);
        self.records.len() - 1
    }

    /// Record at `index`.
    pub fn get(&self, index: usize) -> Option<&AttributeRecord> {
        self.records.get(index)
    }

    /// Replace the text of the record at `index`, keeping the live count
    /// consistent. Returns `false` when the index is out of range.
    pub fn set_text(&mut self, index: usize, text: impl Into<String>) -> bool {
        let Some(record) = self.records.get_mut(index) else {
            return false;
        };
        let was_live = record.is_live();
        record.text = text.into();
        match (was_live, record.is_live()) {
            (false, true) => self.live += 1,
            (true, false) => self.live -= 1,
            _ => {}
        }
        true
    }

    /// Position of the first live record whose identity is exactly `name`.
    ///
    /// Relational operators are ignored on both sides.
    pub fn find_identity(&self, name: &str) -> Option<usize> {
        let name = tokenize::strip_relational(name);
        self.records
            .iter()
            .position(|r| r.is_live() && r.identity() == Some(name))
    }

    /// Whether a live record has exactly this text.
    pub fn contains_text(&self, text: &str) -> bool {
        self.live().any(|r| r.text.trim() == text.trim())
    }

    /// Tombstone every live record whose text contains any of `keys`.
    ///
    /// Returns the texts of the records that were marked.
    pub fn mark_matching<S: AsRef<str>>(&mut self, keys: &[S]) -> Vec<String> {
        let mut marked = Vec::new();
        for record in &mut self.records {
            if !record.is_live() {
                continue;
            }
            if keys.iter().any(|k| record.text.contains(k.as_ref())) {
                record.tombstoned = true;
                self.live -= 1;
                marked.push(record.text.clone());
            }
        }
        marked
    }

    /// Live records whose identity contains any of `keys`, or every live
    /// record when `keys` is empty.
    pub fn filter<S: AsRef<str>>(&self, keys: &[S]) -> Vec<&AttributeRecord> {
        self.live()
            .filter(|r| {
                keys.is_empty()
                    || r.identity()
                        .is_some_and(|id| keys.iter().any(|k| id.contains(k.as_ref())))
            })
            .collect()
    }

    /// Lines that a rewrite emits: everything except tombstoned records.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.records
            .iter()
            .filter(|r| !r.tombstoned)
            .map(AttributeRecord::text)
    }
}

impl fmt::Display for AttributeList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in self.lines() {
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}

/// An [`AttributeList`] bound to the file it came from.
#[derive(Debug)]
pub struct AttributeStore {
    path: PathBuf,
    list: AttributeList,
    existed: bool,
    legacy: Option<PathBuf>,
}

impl AttributeStore {
    /// Load the list stored at `path`.
    ///
    /// A missing file gives an empty list. When the parent of `path` is a
    /// regular file (Portage also accepts `package.use` as a flat file), its
    /// records are loaded instead and [`AttributeStore::save`] converts the
    /// layout.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Read`] if an existing file cannot be read.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let legacy = path
            .parent()
            .filter(|parent| parent.is_file())
            .map(Path::to_path_buf);

        let source = legacy.as_deref().unwrap_or(&path);
        let (list, existed) = match fs::read_to_string(source) {
            Ok(content) => (AttributeList::parse(&content), true),
            Err(e) if e.kind() == io::ErrorKind::NotFound => (AttributeList::new(), false),
            Err(source_err) => {
                return Err(StoreError::Read {
                    path: source.to_path_buf(),
                    source: source_err,
                });
            }
        };

        if let Some(flat) = &legacy {
            tracing::debug!("{} is a flat file; loaded {} records", flat.display(), list.live_count());
        }

        Ok(Self {
            path,
            list,
            existed,
            legacy,
        })
    }

    /// Destination path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether anything was on disk when the store was opened.
    pub fn existed(&self) -> bool {
        self.existed
    }

    /// The loaded list.
    pub fn list(&self) -> &AttributeList {
        &self.list
    }

    /// Mutable access to the loaded list.
    pub fn list_mut(&mut self) -> &mut AttributeList {
        &mut self.list
    }

    /// Write the list back to [`AttributeStore::path`].
    ///
    /// # Errors
    ///
    /// Any [`StoreError`] except `Read`. On error the previous file contents
    /// are left in place.
    pub fn save(&mut self) -> Result<(), StoreError> {
        let Some(flat) = self.legacy.clone() else {
            if let Some(dir) = parent_dir(&self.path) {
                fs::create_dir_all(dir).map_err(|source| StoreError::CreateDir {
                    path: dir.to_path_buf(),
                    source,
                })?;
            }
            return write_atomic(&self.list, &self.path);
        };

        let mut backup = flat.clone().into_os_string();
        backup.push(".backup");
        let backup = PathBuf::from(backup);

        fs::rename(&flat, &backup).map_err(|source| StoreError::Migrate {
            path: flat.clone(),
            source,
        })?;

        let written = fs::create_dir_all(&flat)
            .map_err(|source| StoreError::CreateDir {
                path: flat.clone(),
                source,
            })
            .and_then(|()| write_atomic(&self.list, &self.path));

        match written {
            Ok(()) => {
                if let Err(e) = fs::remove_file(&backup) {
                    tracing::warn!("could not remove {}: {e}", backup.display());
                }
                tracing::debug!("converted {} into a directory", flat.display());
                self.legacy = None;
                Ok(())
            }
            Err(err) => {
                let _ = fs::remove_dir(&flat);
                if let Err(e) = fs::rename(&backup, &flat) {
                    tracing::warn!("could not restore {}: {e}", flat.display());
                }
                Err(err)
            }
        }
    }
}

fn parent_dir(path: &Path) -> Option<&Path> {
    path.parent().filter(|p| !p.as_os_str().is_empty())
}

/// Replace `path` with the serialised `list` via a temp file and rename.
///
/// A line that fails to write is logged and skipped.
///
/// # Errors
///
/// [`StoreError::TempFile`], [`StoreError::Write`] or [`StoreError::Persist`].
pub fn write_atomic(list: &AttributeList, path: &Path) -> Result<(), StoreError> {
    let dir = parent_dir(path).unwrap_or_else(|| Path::new("."));

    let mut tmp = tempfile::Builder::new()
        .prefix(".kmu-")
        .tempfile_in(dir)
        .map_err(|source| StoreError::TempFile {
            path: dir.to_path_buf(),
            source,
        })?;

    {
        let mut writer = BufWriter::new(tmp.as_file_mut());
        for line in list.lines() {
            if let Err(e) = writeln!(writer, "{line}") {
                tracing::warn!("failed to write '{line}': {e}");
            }
        }
        writer.flush().map_err(|source| StoreError::Write {
            path: path.to_path_buf(),
            source,
        })?;
    }

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(tmp.path(), fs::Permissions::from_mode(0o644)).map_err(|source| {
            StoreError::Write {
                path: path.to_path_buf(),
                source,
            }
        })?;
    }

    tmp.persist(path).map_err(|e| StoreError::Persist {
        path: path.to_path_buf(),
        source: e.error,
    })?;

    Ok(())
}
