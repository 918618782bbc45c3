//! Artifact identifiers.
//!
//! An `ArtifactId` wraps a random 128-bit UUID and renders as the canonical
//! 36-character hyphenated form. Parsing only accepts that form, which keeps
//! client-supplied ids from ever naming anything outside the store directory.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::domain::errors::StoreError;

/// Length of the rendered identifier (`8-4-4-4-12`).
pub const ARTIFACT_ID_LEN: usize = 36;

/// Opaque, globally unique artifact identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ArtifactId(Uuid);

impl ArtifactId {
    /// Wrap an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl From<Uuid> for ArtifactId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl fmt::Display for ArtifactId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

impl FromStr for ArtifactId {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Uuid::parse_str also accepts simple, braced and urn forms
        if s.len() != ARTIFACT_ID_LEN {
            return Err(StoreError::InvalidId {
                value: truncate(s),
            });
        }
        Uuid::try_parse(s)
            .map(Self)
            .map_err(|_| StoreError::InvalidId { value: truncate(s) })
    }
}

fn truncate(s: &str) -> String {
    s.chars().take(64).collect()
}
