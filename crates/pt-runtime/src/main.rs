//! # Practice-Tracks Runtime
//!
//! Entry point: configuration, logging, then the Track Gateway until Ctrl+C.

use anyhow::{Context, Result};
use tracing::{error, info};

use pt_02_track_gateway::TrackGatewayService;
use pt_runtime::load_config;
use pt_telemetry::{init_telemetry, TelemetryConfig};

#[tokio::main]
async fn main() -> Result<()> {
    init_telemetry(&TelemetryConfig::from_env()).context("failed to initialize logging")?;

    let config = load_config().context("failed to load configuration")?;

    info!("===========================================");
    info!("  Practice-Tracks Gateway v{}", pt_02_track_gateway::VERSION);
    info!("===========================================");

    let service = TrackGatewayService::new(config).context("failed to create gateway")?;
    service
        .run(async {
            match tokio::signal::ctrl_c().await {
                Ok(()) => info!("Received Ctrl+C, shutting down"),
                Err(e) => error!(error = %e, "Failed to listen for Ctrl+C"),
            }
        })
        .await
        .context("gateway terminated with an error")?;

    Ok(())
}
