//! # Outbound Ports (Driven Ports)
//!
//! Production: `FsArtifactStore`, `UuidGenerator`, `SystemTimeSource`
//! Testing: `InMemoryArtifactStore`, `ManualTimeSource`

use async_trait::async_trait;
use std::time::SystemTime;

use crate::domain::entities::ArtifactEntry;
use crate::domain::errors::StoreResult;
use crate::domain::ids::ArtifactId;
use crate::domain::retention::RetentionPolicy;

/// Key → blob store for processed artifacts.
///
/// Shared by every request handler and the sweeper, so implementations must
/// be safe under concurrent create/read/delete of the same id without
/// in-process locking of the blob bytes.
#[async_trait]
pub trait ArtifactStore: Send + Sync {
    /// Ensure the backing location exists. Idempotent.
    async fn ensure_ready(&self) -> StoreResult<()>;

    /// Persist `bytes` under `id`.
    ///
    /// ## Write-Once Guarantee
    ///
    /// Fails with `AlreadyExists` rather than replacing an existing artifact.
    /// On any failure nothing is visible under `id`.
    async fn write(&self, id: &ArtifactId, bytes: &[u8]) -> StoreResult<()>;

    /// Existence probe. Never fails; a missing backing location is "absent".
    async fn exists(&self, id: &ArtifactId) -> bool;

    /// Read the full blob, or `NotFound`.
    async fn read(&self, id: &ArtifactId) -> StoreResult<Vec<u8>>;

    /// Snapshot of all stored artifacts with their last write time.
    ///
    /// Returns an empty list when the backing location does not exist.
    async fn list_entries(&self) -> StoreResult<Vec<ArtifactEntry>>;

    /// Remove an artifact. Absent ids are a no-op.
    async fn delete(&self, id: &ArtifactId) -> StoreResult<()>;

    /// Remove leftovers of interrupted writes that `policy` considers expired.
    ///
    /// A write whose future is dropped mid-way (client disconnect, request
    /// timeout) cannot clean up after itself. Returns the number of files
    /// removed; stores that never stage are a no-op.
    async fn purge_stale_staging(
        &self,
        _policy: RetentionPolicy,
        _now: SystemTime,
    ) -> StoreResult<usize> {
        Ok(0)
    }
}

/// Source of fresh artifact identifiers.
pub trait IdGenerator: Send + Sync {
    /// Produce an id with negligible collision probability.
    fn generate(&self) -> ArtifactId;
}

/// Abstract interface for time operations (for testability).
pub trait TimeSource: Send + Sync {
    /// Current wall-clock time.
    fn now(&self) -> SystemTime;
}
