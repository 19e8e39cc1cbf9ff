//! Distfile cleanup.
//!
//! The download cache accumulates one archive per fetched version. Cleanup
//! groups archives by package identity, keeps the most recently modified
//! file of each group and plans the rest for deletion.
//!
//! Pipeline:
//! 1. [`scan_distfiles`] lists candidate files with size and mtime.
//! 2. [`CleanupPlanner::plan`] filters reserved files, extracts identities
//!    and feeds a [`DuplicateIndex`].
//! 3. [`apply`] removes what the resulting [`CleanupPlan`] marked.

mod index;
mod name;
mod planner;
mod reserve;
mod scan;

pub use index::{DuplicateIndex, Group, Growth, IndexError, Observation};
pub use name::{extract_identity, is_stale_fetch};
pub use planner::{ApplyReport, CleanupPlan, CleanupPlanner, apply};
pub use reserve::{DEFAULT_RESERVED, ReservationFilter};
pub use scan::{ScanError, scan_distfiles};

use std::path::PathBuf;
use std::time::SystemTime;

/// A file seen by the scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DistFile {
    /// Full path.
    pub path: PathBuf,
    /// Last modification time; newer wins.
    pub modified: SystemTime,
    /// Size in bytes.
    pub size: u64,
}

/// A file displaced by a newer copy, or otherwise planned for deletion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Superseded {
    /// Full path.
    pub path: PathBuf,
    /// Size in bytes.
    pub size: u64,
}

impl From<DistFile> for Superseded {
    fn from(file: DistFile) -> Self {
        Self {
            path: file.path,
            size: file.size,
        }
    }
}
