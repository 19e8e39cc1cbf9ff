//! Name fragments that protect distfiles from cleanup.

use super::name::name_contains;
use std::path::Path;

/// File-name fragments protected from cleanup by default.
pub const DEFAULT_RESERVED: [&str; 4] = ["samba", "patch", "linux", "firefox"];

/// Predicate excluding files from cleanup regardless of duplication.
///
/// A file is reserved when its name contains any configured fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReservationFilter {
    patterns: Vec<String>,
}

impl ReservationFilter {
    /// Build a filter from name fragments. Empty fragments are ignored.
    pub fn new<I, S>(patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            patterns: patterns
                .into_iter()
                .map(Into::into)
                .filter(|p: &String| !p.is_empty())
                .collect(),
        }
    }

    /// Whether `path` must be left alone. The file name is compared byte
    /// for byte.
    pub fn is_reserved(&self, path: &Path) -> bool {
        let Some(name) = path.file_name() else {
            return false;
        };
        self.patterns.iter().any(|p| name_contains(name, p))
    }
}

impl Default for ReservationFilter {
    fn default() -> Self {
        Self::new(DEFAULT_RESERVED)
    }
}
