//! HTTP handlers.

pub mod download;
pub mod upload;

use axum::{extract::State, Json};
use pt_01_artifact_store::SweeperStats;
use std::sync::Arc;

use crate::domain::relay::TrackRelay;
use crate::middleware::RelayMetrics;

pub use download::handle_download;
pub use upload::handle_upload;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub relay: Arc<TrackRelay>,
    pub metrics: Arc<RelayMetrics>,
    pub sweeper_stats: Option<Arc<SweeperStats>>,
}

/// `GET /health`
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

/// `GET /metrics`
pub async fn metrics_snapshot(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(state.metrics.to_json(state.sweeper_stats.as_deref()))
}
