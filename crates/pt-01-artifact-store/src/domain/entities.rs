//! Store entries and sweep results.

use std::time::SystemTime;

use crate::domain::ids::ArtifactId;

/// A point-in-time listing entry: the artifact id and its last write time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArtifactEntry {
    pub id: ArtifactId,
    pub last_modified: SystemTime,
}

impl ArtifactEntry {
    pub fn new(id: ArtifactId, last_modified: SystemTime) -> Self {
        Self { id, last_modified }
    }
}

/// Outcome of a single sweep run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SweepReport {
    /// Entries seen in the listing snapshot.
    pub scanned: usize,
    /// Entries older than the retention window.
    pub expired: usize,
    /// Expired entries that were deleted.
    pub evicted: Vec<ArtifactId>,
    /// Expired entries whose deletion failed (left for the next run).
    pub failed: Vec<ArtifactId>,
    /// Expired leftovers of interrupted writes that were removed.
    pub staging_removed: usize,
}

impl SweepReport {
    /// Number of artifacts removed by this run.
    pub fn evicted_count(&self) -> usize {
        self.evicted.len()
    }

    /// True if nothing was eligible for eviction.
    pub fn is_noop(&self) -> bool {
        self.expired == 0 && self.staging_removed == 0
    }
}
