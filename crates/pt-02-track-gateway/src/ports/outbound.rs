//! Outbound ports for the Track Gateway.

use async_trait::async_trait;
use bytes::Bytes;

use crate::domain::error::UploadError;
use crate::domain::types::UploadPayload;

/// The downstream service that turns an upload into an archive.
///
/// Implementations return the complete response body; nothing is streamed
/// into the store before the exchange has finished.
#[async_trait]
pub trait ProcessingService: Send + Sync {
    /// Forward `upload` unmodified and return the processed payload.
    ///
    /// Errors are `Transport` (no response) or `DownstreamRejected`
    /// (non-success status).
    async fn process(&self, upload: UploadPayload) -> Result<Bytes, UploadError>;
}
