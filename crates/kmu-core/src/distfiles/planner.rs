//! Turns scanned distfiles into a keep/delete plan and carries it out.

use super::index::{DuplicateIndex, Group, Growth, IndexError, Observation};
use super::name::{extract_identity, is_stale_fetch};
use super::{DistFile, Superseded};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Builds a [`CleanupPlan`] from scanned files.
#[derive(Debug, Clone, Copy)]
pub struct CleanupPlanner {
    capacity: usize,
    growth: Growth,
}

impl Default for CleanupPlanner {
    fn default() -> Self {
        Self::new(1024, Growth::Grow)
    }
}

impl CleanupPlanner {
    /// Planner whose index starts with `capacity` slots.
    pub fn new(capacity: usize, growth: Growth) -> Self {
        Self { capacity, growth }
    }

    /// Partition `files` into kept and deletable sets.
    ///
    /// Reserved files never enter the index. Unversioned files, including
    /// names that are not valid UTF-8, are kept.
    /// Stale fetch leftovers are always deleted. Everything else is grouped
    /// by identity and only the newest file of each group is kept.
    ///
    /// # Errors
    ///
    /// [`IndexError::CapacityExhausted`] from a fixed-size index. No plan is
    /// produced in that case, so nothing gets deleted on partial data.
    pub fn plan<I, R>(&self, files: I, is_reserved: R) -> Result<CleanupPlan, IndexError>
    where
        I: IntoIterator<Item = DistFile>,
        R: Fn(&Path) -> bool,
    {
        let mut index = DuplicateIndex::with_capacity(self.capacity, self.growth);
        let mut plan = CleanupPlan::default();

        for file in files {
            if is_reserved(&file.path) {
                tracing::debug!("reserved: {}", file.path.display());
                plan.reserved.push(file.path);
                continue;
            }

            let name = file.path.file_name().unwrap_or_default();

            if is_stale_fetch(name) {
                tracing::debug!("stale fetch: {}", file.path.display());
                plan.stale.push(file.into());
                continue;
            }

            // Names that are not UTF-8 have no comparable identity.
            let Some(identity) = name.to_str().and_then(extract_identity).map(str::to_owned) else {
                tracing::debug!("unversioned, keeping: {}", file.path.display());
                plan.unversioned.push(file.path);
                continue;
            };

            if let Observation::Replaced { previous } = index.observe(&identity, file)? {
                tracing::trace!("{identity}: displaced {}", previous.display());
            }
        }

        plan.reclaimable = index.reclaimable_bytes() + plan.stale.iter().map(|s| s.size).sum::<u64>();
        plan.groups = index.into_groups();
        Ok(plan)
    }
}

/// Outcome of [`CleanupPlanner::plan`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CleanupPlan {
    groups: Vec<Group>,
    unversioned: Vec<PathBuf>,
    reserved: Vec<PathBuf>,
    stale: Vec<Superseded>,
    reclaimable: u64,
}

impl CleanupPlan {
    /// Identity groups, sorted by identity.
    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    /// Groups that have something to delete.
    pub fn groups_with_duplicates(&self) -> impl Iterator<Item = &Group> {
        self.groups.iter().filter(|g| !g.superseded().is_empty())
    }

    /// Files kept because no version could be read from their name.
    pub fn unversioned(&self) -> &[PathBuf] {
        &self.unversioned
    }

    /// Files skipped by the reservation filter.
    pub fn reserved(&self) -> &[PathBuf] {
        &self.reserved
    }

    /// Leftovers of failed fetches.
    pub fn stale(&self) -> &[Superseded] {
        &self.stale
    }

    /// Every file that stays: the newest of each group, unversioned and
    /// reserved files.
    pub fn keep_set(&self) -> Vec<&Path> {
        self.groups
            .iter()
            .map(|g| g.kept().path.as_path())
            .chain(self.unversioned.iter().map(PathBuf::as_path))
            .chain(self.reserved.iter().map(PathBuf::as_path))
            .collect()
    }

    /// Every file to remove.
    pub fn delete_plan(&self) -> Vec<&Superseded> {
        self.groups
            .iter()
            .flat_map(Group::superseded)
            .chain(self.stale.iter())
            .collect()
    }

    /// Number of files to remove.
    pub fn delete_count(&self) -> usize {
        self.groups.iter().map(|g| g.superseded().len()).sum::<usize>() + self.stale.len()
    }

    /// Total size of [`CleanupPlan::delete_plan`].
    pub fn reclaimable_bytes(&self) -> u64 {
        self.reclaimable
    }

    /// Nothing to delete.
    pub fn is_empty(&self) -> bool {
        self.delete_count() == 0
    }
}

/// Result of [`apply`].
#[derive(Debug, Default)]
pub struct ApplyReport {
    /// Files removed (or that would be, on a dry run).
    pub removed: Vec<PathBuf>,
    /// Bytes freed by `removed`.
    pub freed_bytes: u64,
    /// Files already gone before we got to them.
    pub missing: Vec<PathBuf>,
    /// Files that could not be removed.
    pub failed: Vec<(PathBuf, io::Error)>,
}

impl ApplyReport {
    /// Whether any removal failed for a reason other than the file missing.
    pub fn has_failures(&self) -> bool {
        !self.failed.is_empty()
    }
}

/// Remove every file in the plan's delete set.
///
/// With `dry_run` nothing is touched and every planned file is reported as
/// removed. A file that vanished in the meantime is logged and counted in
/// [`ApplyReport::missing`]; other failures are collected, not fatal.
pub fn apply(plan: &CleanupPlan, dry_run: bool) -> ApplyReport {
    let mut report = ApplyReport::default();

    for entry in plan.delete_plan() {
        if dry_run {
            report.removed.push(entry.path.clone());
            report.freed_bytes += entry.size;
            continue;
        }

        match fs::remove_file(&entry.path) {
            Ok(()) => {
                tracing::debug!("removed {}", entry.path.display());
                report.removed.push(entry.path.clone());
                report.freed_bytes += entry.size;
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::warn!("{} already removed", entry.path.display());
                report.missing.push(entry.path.clone());
            }
            Err(e) => {
                tracing::warn!("failed to remove {}: {e}", entry.path.display());
                report.failed.push((entry.path.clone(), e));
            }
        }
    }

    report
}
