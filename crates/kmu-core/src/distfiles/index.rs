//! Open-addressing table of package groups.
//!
//! Slots are located by hashing the identity and probing linearly, wrapping
//! at the end of the table. Each occupied slot owns one [`Group`]: the
//! newest file seen for that identity plus every file it displaced.

use super::{DistFile, Superseded};
use serde::Deserialize;
use std::mem;
use std::path::PathBuf;
use thiserror::Error;

/// Minimum slot count after growth.
const MIN_CAPACITY: usize = 16;

/// What the index does when no free slot is left.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Growth {
    /// Double the table once it is three quarters full.
    #[default]
    Grow,
    /// Never resize; report [`IndexError::CapacityExhausted`] instead.
    Fixed,
}

/// Errors raised by [`DuplicateIndex::observe`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IndexError {
    /// A fixed-size table has no slot left for a new identity.
    #[error("duplicate index is full ({capacity} slots), cannot track '{identity}'")]
    CapacityExhausted {
        /// Table size.
        capacity: usize,
        /// Identity that did not fit.
        identity: String,
    },
}

/// What happened to a candidate passed to [`DuplicateIndex::observe`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Observation {
    /// First file for this identity; it is now kept.
    Inserted,
    /// Newer than the kept file (or as new with a greater path), which
    /// moved to the superseded chain.
    Replaced {
        /// The file that lost its kept status.
        previous: PathBuf,
    },
    /// Older than the kept file, or as new with a lesser path; appended to
    /// the superseded chain.
    Superseded,
}

/// All files seen for one identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    identity: String,
    kept: DistFile,
    superseded: Vec<Superseded>,
}

impl Group {
    fn new(identity: String, kept: DistFile) -> Self {
        Self {
            identity,
            kept,
            superseded: Vec::new(),
        }
    }

    /// Package identity shared by every file in the group.
    pub fn identity(&self) -> &str {
        &self.identity
    }

    /// The newest file.
    pub fn kept(&self) -> &DistFile {
        &self.kept
    }

    /// Older files, in the order they were displaced.
    pub fn superseded(&self) -> &[Superseded] {
        &self.superseded
    }

    /// Bytes held by the superseded files.
    pub fn superseded_bytes(&self) -> u64 {
        self.superseded.iter().map(|s| s.size).sum()
    }

    fn absorb(&mut self, candidate: DistFile, reclaimable: &mut u64) -> Observation {
        // Equal mtimes fall back to the path so arrival order never matters.
        if (candidate.modified, &candidate.path) > (self.kept.modified, &self.kept.path) {
            let previous = mem::replace(&mut self.kept, candidate);
            let path = previous.path.clone();
            tracing::debug!(
                "{}: {} supersedes {}",
                self.identity,
                self.kept.path.display(),
                path.display()
            );
            *reclaimable += previous.size;
            self.superseded.push(previous.into());
            Observation::Replaced { previous: path }
        } else {
            tracing::debug!(
                "{}: {} is older than {}",
                self.identity,
                candidate.path.display(),
                self.kept.path.display()
            );
            *reclaimable += candidate.size;
            self.superseded.push(candidate.into());
            Observation::Superseded
        }
    }
}

/// Identity-keyed table tracking the newest file per package.
#[derive(Debug, Clone)]
pub struct DuplicateIndex {
    slots: Vec<Option<Group>>,
    len: usize,
    growth: Growth,
    reclaimable: u64,
}

impl DuplicateIndex {
    /// A table with `capacity` slots (at least one).
    pub fn with_capacity(capacity: usize, growth: Growth) -> Self {
        Self {
            slots: empty_slots(capacity.max(1)),
            len: 0,
            growth,
            reclaimable: 0,
        }
    }

    /// Number of distinct identities.
    pub fn len(&self) -> usize {
        self.len
    }

    /// No identity seen yet.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Current slot count.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Sum of every superseded file size so far.
    pub fn reclaimable_bytes(&self) -> u64 {
        self.reclaimable
    }

    /// Record `candidate` under `identity`.
    ///
    /// After every call the group's kept file has the greatest mtime among
    /// all files observed for that identity; among equal mtimes the greatest
    /// path wins, whatever the order of observation.
    ///
    /// # Errors
    ///
    /// [`IndexError::CapacityExhausted`] when the table uses
    /// [`Growth::Fixed`] and the identity is new but no slot is free.
    pub fn observe(&mut self, identity: &str, candidate: DistFile) -> Result<Observation, IndexError> {
        if self.growth == Growth::Grow && (self.len + 1) * 4 > self.slots.len() * 3 {
            self.grow();
        }

        let Some(at) = self.probe(identity) else {
            return Err(IndexError::CapacityExhausted {
                capacity: self.slots.len(),
                identity: identity.to_owned(),
            });
        };

        let slot = &mut self.slots[at];
        if let Some(group) = slot {
            return Ok(group.absorb(candidate, &mut self.reclaimable));
        }

        tracing::trace!("new group '{identity}' in slot {at}");
        *slot = Some(Group::new(identity.to_owned(), candidate));
        self.len += 1;
        Ok(Observation::Inserted)
    }

    /// Look up the group for `identity`.
    pub fn get(&self, identity: &str) -> Option<&Group> {
        let at = self.probe(identity)?;
        self.slots[at].as_ref()
    }

    /// Iterate over groups in slot order.
    pub fn groups(&self) -> impl Iterator<Item = &Group> {
        self.slots.iter().flatten()
    }

    /// Consume the index, returning groups sorted by identity.
    pub fn into_groups(self) -> Vec<Group> {
        let mut groups: Vec<Group> = self.slots.into_iter().flatten().collect();
        groups.sort_by(|a, b| a.identity.cmp(&b.identity));
        groups
    }

    /// Slot holding `identity`, or the first free slot on its probe path.
    fn probe(&self, identity: &str) -> Option<usize> {
        let capacity = self.slots.len();
        let start = home_slot(identity, capacity);
        (0..capacity)
            .map(|step| (start + step) % capacity)
            .find(|&at| match &self.slots[at] {
                None => true,
                Some(group) => group.identity == identity,
            })
    }

    fn grow(&mut self) {
        let capacity = (self.slots.len() * 2).max(MIN_CAPACITY);
        tracing::trace!("growing duplicate index to {capacity} slots");
        let old = mem::replace(&mut self.slots, empty_slots(capacity));
        for group in old.into_iter().flatten() {
            let mut at = home_slot(&group.identity, capacity);
            while self.slots[at].is_some() {
                at = (at + 1) % capacity;
            }
            self.slots[at] = Some(group);
        }
    }
}

fn empty_slots(capacity: usize) -> Vec<Option<Group>> {
    std::iter::repeat_with(|| None).take(capacity).collect()
}

/// Multiply-rotate string hash. Not cryptographic.
fn hash_identity(identity: &str) -> u64 {
    identity
        .bytes()
        .fold(0x9E37_79B9_7F4A_7C15, |hash: u64, byte| {
            (hash ^ u64::from(byte))
                .wrapping_mul(0x0000_0100_0000_01B3)
                .rotate_left(5)
        })
}

fn home_slot(identity: &str, capacity: usize) -> usize {
    (hash_identity(identity) % capacity as u64) as usize
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, UNIX_EPOCH};

    fn file(path: &str, secs: u64, size: u64) -> DistFile {
        DistFile {
            path: PathBuf::from(path),
            modified: UNIX_EPOCH + Duration::from_secs(secs),
            size,
        }
    }

    #[test]
    fn test_first_sighting_is_kept() {
        let mut index = DuplicateIndex::with_capacity(8, Growth::Grow);
        let obs = index.observe("a", file("a-1.0", 100, 10)).unwrap();
        assert_eq!(obs, Observation::Inserted);
        assert_eq!(index.get("a").unwrap().kept().path, PathBuf::from("a-1.0"));
        assert_eq!(index.reclaimable_bytes(), 0);
    }

    #[test]
    fn test_newer_candidate_displaces_kept() {
        let mut index = DuplicateIndex::with_capacity(8, Growth::Grow);
        index.observe("a", file("a-1.0", 100, 10)).unwrap();
        let obs = index.observe("a", file("a-2.0", 200, 20)).unwrap();

        assert_eq!(obs, Observation::Replaced { previous: PathBuf::from("a-1.0") });
        let group = index.get("a").unwrap();
        assert_eq!(group.kept().path, PathBuf::from("a-2.0"));
        assert_eq!(group.superseded(), &[Superseded { path: PathBuf::from("a-1.0"), size: 10 }]);
        assert_eq!(index.reclaimable_bytes(), 10);
    }

    #[test]
    fn test_older_candidate_is_superseded() {
        let mut index = DuplicateIndex::with_capacity(8, Growth::Grow);
        index.observe("a", file("a-2.0", 200, 20)).unwrap();
        let obs = index.observe("a", file("a-1.0", 100, 10)).unwrap();

        assert_eq!(obs, Observation::Superseded);
        assert_eq!(index.get("a").unwrap().kept().path, PathBuf::from("a-2.0"));
        assert_eq!(index.reclaimable_bytes(), 10);
    }

    #[test]
    fn test_equal_mtime_keeps_greater_path() {
        let mut index = DuplicateIndex::with_capacity(8, Growth::Grow);
        index.observe("a", file("a-1.0", 100, 10)).unwrap();
        let obs = index.observe("a", file("a-1.1", 100, 11)).unwrap();
        assert_eq!(obs, Observation::Replaced { previous: PathBuf::from("a-1.0") });
        assert_eq!(index.get("a").unwrap().kept().path, PathBuf::from("a-1.1"));

        let mut index = DuplicateIndex::with_capacity(8, Growth::Grow);
        index.observe("a", file("a-1.1", 100, 11)).unwrap();
        let obs = index.observe("a", file("a-1.0", 100, 10)).unwrap();
        assert_eq!(obs, Observation::Superseded);
        let group = index.get("a").unwrap();
        assert_eq!(group.kept().path, PathBuf::from("a-1.1"));
        assert_eq!(group.superseded(), &[Superseded { path: PathBuf::from("a-1.0"), size: 10 }]);
        assert_eq!(index.reclaimable_bytes(), 10);
    }

    #[test]
    fn test_kept_is_newest_in_any_order() {
        let files = [("a-1", 30), ("a-2", 10), ("a-3", 50), ("a-4", 20)];
        // Every rotation of the arrival order ends with the same partition.
        for shift in 0..files.len() {
            let mut index = DuplicateIndex::with_capacity(4, Growth::Grow);
            for i in 0..files.len() {
                let (name, t) = files[(i + shift) % files.len()];
                index.observe("a", file(name, t, 1)).unwrap();
            }
            let group = index.get("a").unwrap();
            assert_eq!(group.kept().path, PathBuf::from("a-3"));

            let mut gone: Vec<_> = group.superseded().iter().map(|s| s.path.clone()).collect();
            gone.sort();
            assert_eq!(gone, vec![PathBuf::from("a-1"), PathBuf::from("a-2"), PathBuf::from("a-4")]);
            assert_eq!(index.reclaimable_bytes(), 3);
        }
    }

    #[test]
    fn test_fixed_capacity_is_reported() {
        let mut index = DuplicateIndex::with_capacity(2, Growth::Fixed);
        index.observe("a", file("a-1", 1, 1)).unwrap();
        index.observe("b", file("b-1", 1, 1)).unwrap();
        // Existing identities still fit.
        index.observe("a", file("a-2", 2, 1)).unwrap();

        let err = index.observe("c", file("c-1", 1, 1)).unwrap_err();
        assert_eq!(
            err,
            IndexError::CapacityExhausted { capacity: 2, identity: "c".to_string() }
        );
        assert_eq!(index.len(), 2);
    }

    #[test]
    fn test_growth_keeps_every_group() {
        let mut index = DuplicateIndex::with_capacity(1, Growth::Grow);
        for i in 0..200 {
            let id = format!("pkg{i}");
            index.observe(&id, file(&format!("{id}-1"), 1, 1)).unwrap();
            index.observe(&id, file(&format!("{id}-2"), 2, 1)).unwrap();
        }
        assert_eq!(index.len(), 200);
        assert!(index.capacity() >= 200);
        for i in 0..200 {
            let group = index.get(&format!("pkg{i}")).unwrap();
            assert_eq!(group.kept().path, PathBuf::from(format!("pkg{i}-2")));
            assert_eq!(group.superseded().len(), 1);
        }
        assert_eq!(index.reclaimable_bytes(), 200);
    }

    #[test]
    fn test_into_groups_sorted() {
        let mut index = DuplicateIndex::with_capacity(8, Growth::Grow);
        for id in ["zlib", "curl", "openssl"] {
            index.observe(id, file(id, 1, 1)).unwrap();
        }
        let ids: Vec<_> = index.into_groups().iter().map(|g| g.identity().to_owned()).collect();
        assert_eq!(ids, vec!["curl", "openssl", "zlib"]);
    }
}
