use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::SystemTime;

use crate::adapters::infra::SystemTimeSource;
use crate::domain::entities::ArtifactEntry;
use crate::domain::errors::{StoreError, StoreResult};
use crate::domain::ids::ArtifactId;
use crate::ports::outbound::{ArtifactStore, TimeSource};

/// In-memory artifact store for unit tests.
///
/// Entries are stamped from an injectable clock so sweeper tests can age
/// artifacts without sleeping. Failure switches let tests drive the
/// storage-unavailable paths.
pub struct InMemoryArtifactStore {
    entries: RwLock<HashMap<ArtifactId, (Arc<Vec<u8>>, SystemTime)>>,
    clock: Arc<dyn TimeSource>,
    ready: AtomicBool,
    fail_ready: AtomicBool,
    fail_writes: AtomicBool,
    failing_deletes: RwLock<HashSet<ArtifactId>>,
}

impl Default for InMemoryArtifactStore {
    fn default() -> Self {
        Self::with_clock(Arc::new(SystemTimeSource))
    }
}

impl InMemoryArtifactStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_clock(clock: Arc<dyn TimeSource>) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            clock,
            ready: AtomicBool::new(false),
            fail_ready: AtomicBool::new(false),
            fail_writes: AtomicBool::new(false),
            failing_deletes: RwLock::new(HashSet::new()),
        }
    }

    /// Make `ensure_ready` fail (e.g. permissions).
    pub fn set_fail_ready(&self, fail: bool) {
        self.fail_ready.store(fail, Ordering::SeqCst);
    }

    /// Make every `write` fail (e.g. disk full).
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Make `delete` of a specific id fail.
    pub fn fail_delete_of(&self, id: ArtifactId) {
        self.failing_deletes.write().insert(id);
    }

    /// Insert an artifact with an explicit timestamp.
    pub fn insert_at(&self, id: ArtifactId, bytes: Vec<u8>, last_modified: SystemTime) {
        self.ready.store(true, Ordering::SeqCst);
        self.entries
            .write()
            .insert(id, (Arc::new(bytes), last_modified));
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

#[async_trait]
impl ArtifactStore for InMemoryArtifactStore {
    async fn ensure_ready(&self) -> StoreResult<()> {
        if self.fail_ready.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable {
                operation: "ensure_ready",
                message: "simulated permission denied".into(),
            });
        }
        self.ready.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn write(&self, id: &ArtifactId, bytes: &[u8]) -> StoreResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) || !self.ready.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable {
                operation: "write",
                message: "simulated disk full".into(),
            });
        }

        let mut entries = self.entries.write();
        if entries.contains_key(id) {
            return Err(StoreError::AlreadyExists { id: *id });
        }
        entries.insert(*id, (Arc::new(bytes.to_vec()), self.clock.now()));
        Ok(())
    }

    async fn exists(&self, id: &ArtifactId) -> bool {
        self.entries.read().contains_key(id)
    }

    async fn read(&self, id: &ArtifactId) -> StoreResult<Vec<u8>> {
        self.entries
            .read()
            .get(id)
            .map(|(bytes, _)| bytes.as_ref().clone())
            .ok_or(StoreError::NotFound { id: *id })
    }

    async fn list_entries(&self) -> StoreResult<Vec<ArtifactEntry>> {
        if !self.ready.load(Ordering::SeqCst) {
            return Ok(Vec::new());
        }
        Ok(self
            .entries
            .read()
            .iter()
            .map(|(id, (_, modified))| ArtifactEntry::new(*id, *modified))
            .collect())
    }

    async fn delete(&self, id: &ArtifactId) -> StoreResult<()> {
        if self.failing_deletes.read().contains(id) {
            return Err(StoreError::Unavailable {
                operation: "delete",
                message: "simulated I/O error".into(),
            });
        }
        self.entries.write().remove(id);
        Ok(())
    }
}
