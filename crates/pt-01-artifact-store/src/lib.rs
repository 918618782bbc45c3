//! # Artifact Store (pt-01)
//!
//! Temporary storage for the binary results produced by the downstream
//! processing service. Every artifact is written once under a freshly
//! generated identifier, read any number of times, and evicted by a
//! background sweeper once it outlives the retention window.
//!
//! ## Lifecycle
//!
//! ```text
//! Upload Proxy ──write(id, bytes)──→ ┐
//!                                    │
//! Download Server ──read(id)───────→ ├──→ Artifact Store ──→ <dir>/<id>.zip
//!                                    │
//! Eviction Sweeper ──delete(id)────→ ┘
//!        ↑
//!   every sweep period: list_entries() + age check
//! ```
//!
//! ## Domain Invariants
//!
//! | ID | Invariant | Description |
//! |----|-----------|-------------|
//! | 1 | Write Once | An id is never overwritten; a colliding write is rejected |
//! | 2 | Atomic Placement | Readers observe either the full blob or nothing |
//! | 3 | Idempotent Delete | Deleting an absent artifact is a no-op |
//! | 4 | Non-destructive Read | Reads never mutate or remove the artifact |
//! | 5 | Bounded Lifetime | Artifacts older than the retention window are evicted |
//!
//! ## Crate Structure (Hexagonal Architecture)
//!
//! - `domain/` - Identifiers, entries, retention policy and errors
//! - `ports/` - Driven ports (`ArtifactStore`, `IdGenerator`, `TimeSource`)
//! - `adapters/` - Filesystem and in-memory stores, clocks, UUID generator
//! - `sweeper.rs` - Periodic eviction task with an explicit stop handle
//!
//! ## Usage
//!
//! ```ignore
//! use pt_01_artifact_store::{ArtifactStore, FsArtifactStore, IdGenerator, UuidGenerator};
//!
//! let store = FsArtifactStore::new("/tmp/practice-tracks");
//! store.ensure_ready().await?;
//!
//! let id = UuidGenerator.generate();
//! store.write(&id, &payload).await?;
//! let bytes = store.read(&id).await?;
//! ```

#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod sweeper;

// Re-export key types for convenience
pub use adapters::infra::{SystemTimeSource, UuidGenerator};
pub use adapters::storage::FsArtifactStore;
#[cfg(any(test, feature = "test-utils"))]
pub use adapters::infra::ManualTimeSource;
#[cfg(any(test, feature = "test-utils"))]
pub use adapters::storage::InMemoryArtifactStore;
pub use domain::entities::{ArtifactEntry, SweepReport};
pub use domain::errors::{StoreError, StoreResult};
pub use domain::ids::ArtifactId;
pub use domain::retention::RetentionPolicy;
pub use ports::outbound::{ArtifactStore, IdGenerator, TimeSource};
pub use sweeper::{EvictionSweeper, SweeperConfig, SweeperHandle, SweeperStats, DEFAULT_SWEEP_PERIOD};
