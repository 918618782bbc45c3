//! Gateway error types.
//!
//! `UploadError` separates the failure causes of one upload so the logs can
//! tell them apart; clients only ever see `{"status":"error"}`.

use axum::http::StatusCode;
use pt_01_artifact_store::StoreError;

use crate::domain::config::ConfigError;

/// Why an upload did not yield an artifact id.
#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    /// The client request cannot be forwarded (not multipart, empty body)
    #[error("invalid upload: {0}")]
    InvalidRequest(String),

    /// No response from the processing service (connect error, timeout)
    #[error("processing service unreachable: {0}")]
    Transport(String),

    /// The processing service answered with a non-success status
    #[error("processing service rejected upload with status {status}")]
    DownstreamRejected { status: u16 },

    /// The processed artifact could not be persisted
    #[error("artifact storage failed: {0}")]
    Storage(#[from] StoreError),
}

impl UploadError {
    /// HTTP status reported to the client alongside `{"status":"error"}`.
    pub fn status_code(&self) -> StatusCode {
        match self {
            UploadError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            UploadError::Transport(_) | UploadError::DownstreamRejected { .. } => {
                StatusCode::BAD_GATEWAY
            }
            UploadError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Gateway-level errors (startup and serving)
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Server socket bind error
    #[error("server bind error: {0}")]
    Bind(String),

    /// Internal server error
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<ConfigError> for GatewayError {
    fn from(e: ConfigError) -> Self {
        GatewayError::Config(e.to_string())
    }
}
