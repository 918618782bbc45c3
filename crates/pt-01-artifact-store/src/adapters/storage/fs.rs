use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::domain::entities::ArtifactEntry;
use crate::domain::errors::{StoreError, StoreResult};
use crate::domain::ids::ArtifactId;
use crate::domain::retention::RetentionPolicy;
use crate::ports::outbound::ArtifactStore;

/// Extension given to every artifact file.
pub const DEFAULT_ARTIFACT_EXTENSION: &str = "zip";

/// Prefix of in-flight files. Never matches an artifact name.
const STAGING_PREFIX: &str = ".staging-";

/// Directory-backed artifact store: one `<id>.<ext>` file per artifact.
///
/// Writes are staged under a private name, flushed, then hard-linked into
/// place. `link(2)` fails if the destination exists, which gives atomic
/// placement and write-once semantics in one step.
/// Readers that opened a file before it was unlinked keep reading the full
/// contents, so eviction never truncates a download in progress.
#[derive(Debug, Clone)]
pub struct FsArtifactStore {
    root: PathBuf,
    extension: String,
}

impl FsArtifactStore {
    /// Create a store rooted at `root`. Nothing is touched on disk until
    /// `ensure_ready` or the first write.
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self::with_extension(root, DEFAULT_ARTIFACT_EXTENSION)
    }

    pub fn with_extension<P: AsRef<Path>>(root: P, extension: impl Into<String>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            extension: extension.into(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Final location of an artifact.
    pub fn artifact_path(&self, id: &ArtifactId) -> PathBuf {
        self.root.join(format!("{}.{}", id, self.extension))
    }

    fn staging_path(&self, id: &ArtifactId) -> PathBuf {
        // Unique per write attempt so two writers never share a staging file
        self.root.join(format!(
            "{}{}-{}.tmp",
            STAGING_PREFIX,
            id,
            Uuid::new_v4().simple()
        ))
    }

    fn parse_file_name(&self, name: &str) -> Option<ArtifactId> {
        let stem = name
            .strip_suffix(self.extension.as_str())?
            .strip_suffix('.')?;
        stem.parse().ok()
    }

    async fn stage(&self, staging: &Path, bytes: &[u8]) -> std::io::Result<()> {
        let mut file = fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(staging)
            .await?;
        file.write_all(bytes).await?;
        file.sync_all().await?;
        Ok(())
    }

    async fn discard_staging(&self, staging: &Path) {
        if let Err(e) = fs::remove_file(staging).await {
            if e.kind() != ErrorKind::NotFound {
                warn!(path = %staging.display(), error = %e, "Failed to remove staging file");
            }
        }
    }
}

#[async_trait]
impl ArtifactStore for FsArtifactStore {
    async fn ensure_ready(&self) -> StoreResult<()> {
        fs::create_dir_all(&self.root)
            .await
            .map_err(|e| StoreError::io("ensure_ready", e))?;

        let metadata = fs::metadata(&self.root)
            .await
            .map_err(|e| StoreError::io("ensure_ready", e))?;
        if !metadata.is_dir() {
            return Err(StoreError::Unavailable {
                operation: "ensure_ready",
                message: format!("{} is not a directory", self.root.display()),
            });
        }
        Ok(())
    }

    async fn write(&self, id: &ArtifactId, bytes: &[u8]) -> StoreResult<()> {
        let dest = self.artifact_path(id);
        if fs::symlink_metadata(&dest).await.is_ok() {
            return Err(StoreError::AlreadyExists { id: *id });
        }

        let staging = self.staging_path(id);
        if let Err(e) = self.stage(&staging, bytes).await {
            self.discard_staging(&staging).await;
            return Err(StoreError::io("write", e));
        }

        let placed = fs::hard_link(&staging, &dest).await;
        self.discard_staging(&staging).await;

        match placed {
            Ok(()) => {
                debug!(artifact_id = %id, bytes = bytes.len(), "Artifact written");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                Err(StoreError::AlreadyExists { id: *id })
            }
            Err(e) => Err(StoreError::io("write", e)),
        }
    }

    async fn exists(&self, id: &ArtifactId) -> bool {
        matches!(fs::metadata(self.artifact_path(id)).await, Ok(m) if m.is_file())
    }

    async fn read(&self, id: &ArtifactId) -> StoreResult<Vec<u8>> {
        match fs::read(self.artifact_path(id)).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(StoreError::NotFound { id: *id }),
            Err(e) => Err(StoreError::io("read", e)),
        }
    }

    async fn list_entries(&self) -> StoreResult<Vec<ArtifactEntry>> {
        let mut dir = match fs::read_dir(&self.root).await {
            Ok(dir) => dir,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(StoreError::io("list", e)),
        };

        let mut entries = Vec::new();
        while let Some(entry) = dir
            .next_entry()
            .await
            .map_err(|e| StoreError::io("list", e))?
        {
            let file_name = entry.file_name();
            let Some(id) = file_name.to_str().and_then(|n| self.parse_file_name(n)) else {
                continue;
            };

            // The entry may be evicted between read_dir and stat
            let metadata = match entry.metadata().await {
                Ok(m) => m,
                Err(e) if e.kind() == ErrorKind::NotFound => continue,
                Err(e) => {
                    warn!(artifact_id = %id, error = %e, "Skipping unreadable entry");
                    continue;
                }
            };
            if !metadata.is_file() {
                continue;
            }
            match metadata.modified() {
                Ok(modified) => entries.push(ArtifactEntry::new(id, modified)),
                Err(e) => warn!(artifact_id = %id, error = %e, "Entry has no modification time"),
            }
        }

        Ok(entries)
    }

    async fn delete(&self, id: &ArtifactId) -> StoreResult<()> {
        match fs::remove_file(self.artifact_path(id)).await {
            Ok(()) => {
                debug!(artifact_id = %id, "Artifact deleted");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StoreError::io("delete", e)),
        }
    }

    async fn purge_stale_staging(
        &self,
        policy: RetentionPolicy,
        now: SystemTime,
    ) -> StoreResult<usize> {
        let mut dir = match fs::read_dir(&self.root).await {
            Ok(dir) => dir,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(0),
            Err(e) => return Err(StoreError::io("purge_staging", e)),
        };

        let mut removed = 0;
        while let Some(entry) = dir
            .next_entry()
            .await
            .map_err(|e| StoreError::io("purge_staging", e))?
        {
            let file_name = entry.file_name();
            if !file_name
                .to_str()
                .is_some_and(|n| n.starts_with(STAGING_PREFIX))
            {
                continue;
            }

            // An in-flight write keeps touching its file, so only abandoned
            // ones age past the window
            let modified = match entry.metadata().await.and_then(|m| m.modified()) {
                Ok(modified) => modified,
                Err(_) => continue,
            };
            if !policy.is_expired(modified, now) {
                continue;
            }

            let path = entry.path();
            match fs::remove_file(&path).await {
                Ok(()) => {
                    debug!(path = %path.display(), "Removed abandoned staging file");
                    removed += 1;
                }
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Failed to remove staging file")
                }
            }
        }

        Ok(removed)
    }
}
