//! Identifier allocation — strictly increasing integer ids per record kind
//!
//! Pure counter semantics: the first id is 1, every later id is strictly
//! greater than every id issued before it, nothing is ever reused or
//! decremented. Each registry owns its own allocator; the kinds' sequences
//! are independently observable.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The record kinds managed by the ledger, one allocator sequence each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RecordKind {
    Project,
    Construct,
    Experiment,
}

impl RecordKind {
    pub fn name(&self) -> &'static str {
        match self {
            RecordKind::Project => "project",
            RecordKind::Construct => "construct",
            RecordKind::Experiment => "experiment",
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Monotonic id source for a single record kind.
///
/// `last` is the high-water mark: 0 before the first allocation, N after N.
/// The increment and the corresponding record insertion happen inside one
/// `&mut` registry operation, so an id can never be observed without its
/// record nor handed out twice.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdAllocator {
    kind: RecordKind,
    last: u64,
}

impl IdAllocator {
    pub fn new(kind: RecordKind) -> Self {
        Self { kind, last: 0 }
    }

    /// Issue the next identifier for this kind.
    pub fn next_id(&mut self) -> u64 {
        self.last += 1;
        self.last
    }

    /// Highest identifier issued so far (0 if none).
    pub fn last_id(&self) -> u64 {
        self.last
    }

    pub fn kind(&self) -> RecordKind {
        self.kind
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_id_is_one() {
        let mut ids = IdAllocator::new(RecordKind::Project);
        assert_eq!(ids.last_id(), 0);
        assert_eq!(ids.next_id(), 1);
        assert_eq!(ids.last_id(), 1);
    }

    #[test]
    fn test_strictly_increasing_never_repeats() {
        let mut ids = IdAllocator::new(RecordKind::Construct);
        let mut prev = 0;
        for _ in 0..1000 {
            let id = ids.next_id();
            assert!(id > prev);
            prev = id;
        }
        assert_eq!(ids.last_id(), 1000);
    }

    #[test]
    fn test_kinds_count_independently() {
        let mut projects = IdAllocator::new(RecordKind::Project);
        let mut experiments = IdAllocator::new(RecordKind::Experiment);
        projects.next_id();
        projects.next_id();
        assert_eq!(experiments.next_id(), 1);
        assert_eq!(projects.last_id(), 2);
        assert_eq!(experiments.last_id(), 1);
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(RecordKind::Project.to_string(), "project");
        assert_eq!(RecordKind::Construct.to_string(), "construct");
        assert_eq!(RecordKind::Experiment.to_string(), "experiment");
    }
}
