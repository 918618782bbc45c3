//! Relay metrics.
//!
//! Plain atomic counters, exported as JSON on `GET /metrics`.

use pt_01_artifact_store::SweeperStats;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::domain::error::UploadError;

/// Track Gateway metrics
#[derive(Debug, Default)]
pub struct RelayMetrics {
    // Upload counters
    pub uploads_total: AtomicU64,
    pub uploads_success: AtomicU64,
    pub uploads_invalid: AtomicU64,
    pub uploads_transport_failed: AtomicU64,
    pub uploads_rejected: AtomicU64,
    pub uploads_storage_failed: AtomicU64,
    pub bytes_stored: AtomicU64,

    // Download counters
    pub downloads_served: AtomicU64,
    pub downloads_not_found: AtomicU64,
    pub downloads_failed: AtomicU64,
    pub bytes_served: AtomicU64,
}

impl RelayMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a stored upload
    pub fn record_upload_success(&self, bytes: usize) {
        self.uploads_total.fetch_add(1, Ordering::Relaxed);
        self.uploads_success.fetch_add(1, Ordering::Relaxed);
        self.bytes_stored.fetch_add(bytes as u64, Ordering::Relaxed);
    }

    /// Record a failed upload by cause
    pub fn record_upload_failure(&self, error: &UploadError) {
        self.uploads_total.fetch_add(1, Ordering::Relaxed);
        let counter = match error {
            UploadError::InvalidRequest(_) => &self.uploads_invalid,
            UploadError::Transport(_) => &self.uploads_transport_failed,
            UploadError::DownstreamRejected { .. } => &self.uploads_rejected,
            UploadError::Storage(_) => &self.uploads_storage_failed,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_download_served(&self, bytes: usize) {
        self.downloads_served.fetch_add(1, Ordering::Relaxed);
        self.bytes_served.fetch_add(bytes as u64, Ordering::Relaxed);
    }

    pub fn record_download_not_found(&self) {
        self.downloads_not_found.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_download_failed(&self) {
        self.downloads_failed.fetch_add(1, Ordering::Relaxed);
    }

    /// Export metrics as JSON
    pub fn to_json(&self, sweeper: Option<&SweeperStats>) -> serde_json::Value {
        let sweeper = sweeper.map(|s| {
            serde_json::json!({
                "runs": s.runs.load(Ordering::Relaxed),
                "evicted": s.evicted.load(Ordering::Relaxed),
                "delete_failures": s.delete_failures.load(Ordering::Relaxed),
                "list_failures": s.list_failures.load(Ordering::Relaxed),
                "staging_removed": s.staging_removed.load(Ordering::Relaxed),
            })
        });

        serde_json::json!({
            "uploads": {
                "total": self.uploads_total.load(Ordering::Relaxed),
                "success": self.uploads_success.load(Ordering::Relaxed),
                "invalid": self.uploads_invalid.load(Ordering::Relaxed),
                "transport_failed": self.uploads_transport_failed.load(Ordering::Relaxed),
                "rejected": self.uploads_rejected.load(Ordering::Relaxed),
                "storage_failed": self.uploads_storage_failed.load(Ordering::Relaxed),
                "bytes_stored": self.bytes_stored.load(Ordering::Relaxed),
            },
            "downloads": {
                "served": self.downloads_served.load(Ordering::Relaxed),
                "not_found": self.downloads_not_found.load(Ordering::Relaxed),
                "failed": self.downloads_failed.load(Ordering::Relaxed),
                "bytes_served": self.bytes_served.load(Ordering::Relaxed),
            },
            "sweeper": sweeper,
        })
    }
}
