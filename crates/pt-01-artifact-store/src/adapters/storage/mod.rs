//! Storage Adapters
//!
//! Implementations of the `ArtifactStore` trait.

mod fs;
#[cfg(any(test, feature = "test-utils"))]
mod memory;

pub use fs::{FsArtifactStore, DEFAULT_ARTIFACT_EXTENSION};
#[cfg(any(test, feature = "test-utils"))]
pub use memory::InMemoryArtifactStore;
