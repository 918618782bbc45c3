//! # Practice-Tracks Runtime
//!
//! Process configuration for the Track Gateway.
//!
//! ## Environment Variables
//!
//! | Variable | Required | Default | Description |
//! |----------|----------|---------|-------------|
//! | `AUDIOPROCESSING_API_URL` / `PT_DOWNSTREAM_URL` | yes | | Processing service base URL |
//! | `TEMP_DOWNLOAD_DIR` / `PT_TEMP_DIR` | yes | | Artifact directory |
//! | `PT_HTTP_HOST` | no | `0.0.0.0` | Listen address |
//! | `PT_HTTP_PORT` | no | `3000` | Listen port |
//! | `PT_RETENTION_SECS` | no | `60` | Minimum artifact lifetime |
//! | `PT_SWEEP_PERIOD_SECS` | no | `60` | Sweep interval |
//! | `PT_DOWNSTREAM_TIMEOUT_SECS` | no | `300` | Processing request timeout |
//! | `PT_MAX_UPLOAD_BYTES` | no | `536870912` | Upload size cap |
//!
//! Missing or unparsable values fail startup.

use anyhow::{anyhow, Context, Result};
use pt_02_track_gateway::TrackGatewayConfig;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// Load configuration from the process environment.
pub fn load_config() -> Result<TrackGatewayConfig> {
    load_config_from(|key| std::env::var(key).ok())
}

/// Load configuration from an arbitrary variable lookup.
pub fn load_config_from<F>(lookup: F) -> Result<TrackGatewayConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = TrackGatewayConfig::default();

    config.downstream.base_url = required(&lookup, &["AUDIOPROCESSING_API_URL", "PT_DOWNSTREAM_URL"])?;
    config.storage.temp_dir = PathBuf::from(required(&lookup, &["TEMP_DOWNLOAD_DIR", "PT_TEMP_DIR"])?);

    if let Some(host) = optional(&lookup, "PT_HTTP_HOST")? {
        config.http.host = host;
    }
    if let Some(port) = optional(&lookup, "PT_HTTP_PORT")? {
        config.http.port = port;
    }
    if let Some(secs) = optional::<u64, _>(&lookup, "PT_RETENTION_SECS")? {
        config.retention.window = Duration::from_secs(secs);
    }
    if let Some(secs) = optional::<u64, _>(&lookup, "PT_SWEEP_PERIOD_SECS")? {
        config.retention.sweep_period = Duration::from_secs(secs);
    }
    if let Some(secs) = optional::<u64, _>(&lookup, "PT_DOWNSTREAM_TIMEOUT_SECS")? {
        config.downstream.request_timeout = Duration::from_secs(secs);
        // Keep the overall bound just above the downstream one
        config.timeouts.request = config
            .timeouts
            .request
            .max(Duration::from_secs(secs.saturating_add(30)));
    }
    if let Some(bytes) = optional(&lookup, "PT_MAX_UPLOAD_BYTES")? {
        config.limits.max_upload_size = bytes;
    }

    config
        .validate()
        .context("invalid gateway configuration")?;
    Ok(config)
}

/// First non-empty value among `keys`.
fn required<F>(lookup: &F, keys: &[&str]) -> Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    keys.iter()
        .find_map(|key| lookup(key).filter(|v| !v.trim().is_empty()))
        .ok_or_else(|| anyhow!("missing required environment variable {}", keys.join(" or ")))
}

fn optional<T, F>(lookup: &F, key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|raw| {
            raw.trim()
                .parse::<T>()
                .with_context(|| format!("{key}={raw:?} is not valid"))
        })
        .transpose()
}
