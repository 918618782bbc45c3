//! Wire types for the upload and download endpoints.

use bytes::Bytes;
use pt_01_artifact_store::ArtifactId;
use serde::{Deserialize, Serialize};

/// Content type of a served artifact.
pub const ARCHIVE_CONTENT_TYPE: &str = "application/zip";

/// Disposition hint of a served artifact.
pub const ARCHIVE_DISPOSITION: &str = "attachment; filename=practice_tracks.zip";

/// Plain-text body of a download miss.
pub const NOT_FOUND_BODY: &str = "File not found";

/// Outcome marker of an upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UploadStatus {
    Success,
    Error,
}

/// Body returned by `POST /upload`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadResponse {
    pub status: UploadStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ArtifactId>,
}

impl UploadResponse {
    pub fn success(id: ArtifactId) -> Self {
        Self {
            status: UploadStatus::Success,
            id: Some(id),
        }
    }

    pub fn error() -> Self {
        Self {
            status: UploadStatus::Error,
            id: None,
        }
    }
}

/// An artifact written by a successful upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoredArtifact {
    pub id: ArtifactId,
    pub size: usize,
}

/// Query of `GET /download`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DownloadQuery {
    pub id: Option<String>,
}

/// Client upload, forwarded byte-for-byte.
#[derive(Debug, Clone)]
pub struct UploadPayload {
    /// Original `Content-Type`, including the multipart boundary
    pub content_type: Option<String>,
    pub body: Bytes,
}

impl UploadPayload {
    pub fn new(content_type: Option<String>, body: Bytes) -> Self {
        Self { content_type, body }
    }

    /// True if the declared content type is `multipart/form-data` with a boundary.
    pub fn is_multipart(&self) -> bool {
        self.content_type.as_deref().is_some_and(|ct| {
            let mut parts = ct.split(';').map(str::trim);
            let essence = parts.next().unwrap_or_default();
            essence.eq_ignore_ascii_case("multipart/form-data")
                && parts.any(|p| {
                    p.get(..9)
                        .is_some_and(|key| key.eq_ignore_ascii_case("boundary="))
                        && p.len() > 9
                })
        })
    }
}
