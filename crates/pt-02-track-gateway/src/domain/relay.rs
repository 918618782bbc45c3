//! # Track Relay
//!
//! The upload/download flow shared by every route:
//!
//! ```text
//! upload:   payload ──▶ ProcessingService ──▶ fresh id ──▶ ensure_ready ──▶ write ──▶ id
//! download: raw id  ──▶ parse ──▶ read ──▶ bytes | NotFound
//! ```
//!
//! An id is returned only after its artifact has been fully written. A failed
//! or rejected downstream exchange never touches the store.

use pt_01_artifact_store::{ArtifactId, ArtifactStore, IdGenerator, StoreError, StoreResult};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use crate::domain::error::UploadError;
use crate::domain::types::{StoredArtifact, UploadPayload};
use crate::ports::outbound::ProcessingService;

/// Upload/download flow over a processing service and an artifact store.
pub struct TrackRelay {
    processing: Arc<dyn ProcessingService>,
    store: Arc<dyn ArtifactStore>,
    ids: Arc<dyn IdGenerator>,
}

impl TrackRelay {
    pub fn new(
        processing: Arc<dyn ProcessingService>,
        store: Arc<dyn ArtifactStore>,
        ids: Arc<dyn IdGenerator>,
    ) -> Self {
        Self {
            processing,
            store,
            ids,
        }
    }

    pub fn store(&self) -> Arc<dyn ArtifactStore> {
        Arc::clone(&self.store)
    }

    /// Forward an upload and persist the processed archive.
    pub async fn upload(&self, payload: UploadPayload) -> Result<StoredArtifact, UploadError> {
        if !payload.is_multipart() {
            warn!(content_type = ?payload.content_type, "Rejected non-multipart upload");
            return Err(UploadError::InvalidRequest(
                "expected multipart/form-data with a boundary".into(),
            ));
        }
        if payload.body.is_empty() {
            warn!("Rejected empty upload");
            return Err(UploadError::InvalidRequest("empty body".into()));
        }

        let forwarded = payload.body.len();
        let archive = match self.processing.process(payload).await {
            Ok(archive) => archive,
            Err(e @ UploadError::Transport(_)) => {
                error!(error = %e, "Error communicating with processing service");
                return Err(e);
            }
            Err(e) => {
                warn!(error = %e, "Processing service did not accept upload");
                return Err(e);
            }
        };

        let id = self.ids.generate();
        if let Err(e) = self.persist(&id, &archive).await {
            error!(artifact_id = %id, error = %e, "Failed to persist processed archive");
            return Err(UploadError::Storage(e));
        }

        info!(
            artifact_id = %id,
            forwarded_bytes = forwarded,
            bytes = archive.len(),
            "Stored processed archive"
        );
        Ok(StoredArtifact {
            id,
            size: archive.len(),
        })
    }

    async fn persist(&self, id: &ArtifactId, archive: &[u8]) -> StoreResult<()> {
        self.store.ensure_ready().await?;
        self.store.write(id, archive).await
    }

    /// Read the artifact named by a client-supplied id.
    ///
    /// A missing or malformed id is reported like an unknown one.
    pub async fn download(&self, raw_id: Option<&str>) -> StoreResult<Vec<u8>> {
        let raw_id = raw_id.ok_or_else(|| StoreError::InvalidId {
            value: String::new(),
        })?;
        let id: ArtifactId = raw_id.parse()?;

        match self.store.read(&id).await {
            Ok(bytes) => {
                debug!(artifact_id = %id, bytes = bytes.len(), "Serving artifact");
                Ok(bytes)
            }
            Err(e) if e.is_not_found() => {
                debug!(artifact_id = %id, "Download request for unknown artifact");
                Err(e)
            }
            Err(e) => {
                error!(artifact_id = %id, error = %e, "Failed to read artifact");
                Err(e)
            }
        }
    }
}
