// Allow missing docs for internal items in development
#![allow(missing_docs)]

//! PT-02 Track Gateway - upload/download proxy for practice-track archives.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────────┐
//! │                        TRACK GATEWAY (pt-02)                         │
//! ├──────────────────────────────────────────────────────────────────────┤
//! │   POST /upload        GET /download?id=      GET /health  /metrics   │
//! │         │                    │                                       │
//! │  ┌──────┴────────────────────┴──────────────┐                        │
//! │  │             Middleware Stack              │                        │
//! │  │   CORS → Tracing → Timeout → BodyLimit    │                        │
//! │  └──────────────────┬────────────────────────┘                        │
//! │                     │                                                 │
//! │  ┌──────────────────┴────────────────────────┐   ┌─────────────────┐  │
//! │  │               TrackRelay                  │──▶│ ProcessingService│──▶ downstream
//! │  └──────────────────┬────────────────────────┘   └─────────────────┘  │
//! │                     │                                                 │
//! └─────────────────────┼─────────────────────────────────────────────────┘
//!                       ▼
//!        pt-01 ArtifactStore  ◀── EvictionSweeper (owned by the service)
//! ```
//!
//! # Client Contract
//!
//! - Upload: `200 {"status":"success","id":"<uuid>"}` or `{"status":"error"}`
//!   with 400 (not multipart), 502 (downstream unreachable or rejected) or
//!   500 (storage failure)
//! - Download: `200` with `application/zip` and
//!   `attachment; filename=practice_tracks.zip`, or `404 File not found`
//!
//! # Usage
//!
//! ```ignore
//! use pt_02_track_gateway::{TrackGatewayConfig, TrackGatewayService};
//!
//! let service = TrackGatewayService::new(config)?;
//! service.run(async { let _ = tokio::signal::ctrl_c().await; }).await?;
//! ```

#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod adapters;
pub mod domain;
pub mod handlers;
pub mod middleware;
pub mod ports;
pub mod service;

// Re-exports for public API
pub use adapters::HttpProcessingClient;
pub use domain::config::{ConfigError, TrackGatewayConfig};
pub use domain::error::{GatewayError, UploadError};
pub use domain::relay::TrackRelay;
pub use domain::types::{StoredArtifact, UploadPayload, UploadResponse, UploadStatus};
pub use middleware::RelayMetrics;
pub use ports::outbound::ProcessingService;
pub use service::TrackGatewayService;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
