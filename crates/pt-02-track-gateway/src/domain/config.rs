//! Gateway configuration with validation.

use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

/// Main gateway configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackGatewayConfig {
    /// HTTP server configuration
    pub http: HttpConfig,
    /// Processing service the uploads are forwarded to
    pub downstream: DownstreamConfig,
    /// Temporary artifact directory
    pub storage: StorageConfig,
    /// Retention window and sweep schedule
    pub retention: RetentionConfig,
    /// Request size limits
    pub limits: LimitsConfig,
    /// Overall request timeout
    pub timeouts: TimeoutConfig,
    /// CORS configuration
    pub cors: CorsConfig,
}

impl TrackGatewayConfig {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.downstream.endpoint_url()?;

        if self.storage.temp_dir.as_os_str().is_empty() {
            return Err(ConfigError::InvalidStorage(
                "temp_dir cannot be empty".into(),
            ));
        }

        if self.storage.extension.is_empty()
            || !self
                .storage
                .extension
                .chars()
                .all(|c| c.is_ascii_alphanumeric())
        {
            return Err(ConfigError::InvalidStorage(format!(
                "extension must be non-empty ascii alphanumeric, got {:?}",
                self.storage.extension
            )));
        }

        if self.retention.window.is_zero() {
            return Err(ConfigError::InvalidRetention(
                "retention window cannot be 0".into(),
            ));
        }

        if self.retention.sweep_period.is_zero() {
            return Err(ConfigError::InvalidRetention(
                "sweep period cannot be 0".into(),
            ));
        }

        if self.limits.max_upload_size == 0 {
            return Err(ConfigError::InvalidLimit(
                "max_upload_size cannot be 0".into(),
            ));
        }

        if self.downstream.request_timeout.is_zero() {
            return Err(ConfigError::InvalidTimeout(
                "downstream request timeout cannot be 0".into(),
            ));
        }

        // The downstream call must be able to time out before the request does
        if self.timeouts.request <= self.downstream.request_timeout {
            return Err(ConfigError::InvalidTimeout(format!(
                "request timeout ({}s) must exceed downstream timeout ({}s)",
                self.timeouts.request.as_secs(),
                self.downstream.request_timeout.as_secs()
            )));
        }

        Ok(())
    }

    /// Get HTTP server bind address
    pub fn http_addr(&self) -> SocketAddr {
        SocketAddr::new(self.http.host, self.http.port)
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Bind address
    pub host: IpAddr,
    /// Port (default: 3000)
    pub port: u16,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::new(0, 0, 0, 0)),
            port: 3000,
        }
    }
}

/// Downstream processing service
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DownstreamConfig {
    /// Base URL of the processing service
    pub base_url: String,
    /// Path appended to the base URL
    pub endpoint: String,
    /// Bound on the whole downstream exchange
    #[serde(with = "humantime_serde")]
    pub request_timeout: Duration,
    /// Bound on establishing the connection
    #[serde(with = "humantime_serde")]
    pub connect_timeout: Duration,
}

impl Default for DownstreamConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_string(),
            endpoint: "practice_tracks".to_string(),
            // Track separation is slow; five minutes
            request_timeout: Duration::from_secs(300),
            connect_timeout: Duration::from_secs(10),
        }
    }
}

impl DownstreamConfig {
    /// Full URL uploads are POSTed to: `{base_url}/{endpoint}`.
    pub fn endpoint_url(&self) -> Result<Url, ConfigError> {
        let base = Url::parse(&self.base_url)
            .map_err(|e| ConfigError::InvalidDownstream(format!("{}: {}", self.base_url, e)))?;

        if !matches!(base.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidDownstream(format!(
                "unsupported scheme {:?}",
                base.scheme()
            )));
        }
        if base.host_str().is_none() {
            return Err(ConfigError::InvalidDownstream(format!(
                "{} has no host",
                self.base_url
            )));
        }

        let joined = format!(
            "{}/{}",
            base.as_str().trim_end_matches('/'),
            self.endpoint.trim_start_matches('/')
        );
        Url::parse(&joined).map_err(|e| ConfigError::InvalidDownstream(format!("{joined}: {e}")))
    }
}

/// Temporary artifact directory
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory holding one file per artifact
    pub temp_dir: PathBuf,
    /// File extension of stored artifacts
    pub extension: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            temp_dir: PathBuf::from("./downloads"),
            extension: "zip".to_string(),
        }
    }
}

/// Retention window and sweep schedule
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetentionConfig {
    /// Minimum lifetime of every artifact
    #[serde(with = "humantime_serde")]
    pub window: Duration,
    /// Interval between sweeps
    #[serde(with = "humantime_serde")]
    pub sweep_period: Duration,
    /// Run the background sweeper
    pub sweep_enabled: bool,
}

impl Default for RetentionConfig {
    fn default() -> Self {
        Self {
            window: Duration::from_secs(60),
            sweep_period: Duration::from_secs(60),
            sweep_enabled: true,
        }
    }
}

/// Request limits configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Max upload body size in bytes (default: 512MB)
    pub max_upload_size: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_upload_size: 512 * 1024 * 1024,
        }
    }
}

/// Timeout configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Overall bound on any request
    #[serde(with = "humantime_serde")]
    pub request: Duration,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            request: Duration::from_secs(330),
        }
    }
}

/// CORS configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CorsConfig {
    /// Enable CORS
    pub enabled: bool,
    /// Allowed origins ("*" for all)
    pub allowed_origins: Vec<String>,
    /// Allowed methods
    pub allowed_methods: Vec<String>,
    /// Allowed headers
    pub allowed_headers: Vec<String>,
    /// Expose headers
    pub expose_headers: Vec<String>,
    /// Max age for preflight cache
    pub max_age: u64,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            allowed_origins: vec!["*".to_string()],
            allowed_methods: vec!["GET".to_string(), "POST".to_string(), "OPTIONS".to_string()],
            allowed_headers: vec!["Content-Type".to_string()],
            expose_headers: vec!["Content-Disposition".to_string()],
            max_age: 86400, // 24 hours
        }
    }
}

/// Configuration errors
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfigError {
    /// Downstream URL missing or malformed
    #[error("invalid downstream url: {0}")]
    InvalidDownstream(String),
    /// Invalid storage settings
    #[error("invalid storage: {0}")]
    InvalidStorage(String),
    /// Invalid retention settings
    #[error("invalid retention: {0}")]
    InvalidRetention(String),
    /// Invalid size limit
    #[error("invalid limit: {0}")]
    InvalidLimit(String),
    /// Invalid timeout value
    #[error("invalid timeout: {0}")]
    InvalidTimeout(String),
}

/// Humantime serde module for Duration serialization
mod humantime_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        if duration.subsec_millis() == 0 {
            serializer.serialize_str(&format!("{}s", duration.as_secs()))
        } else {
            serializer.serialize_str(&format!("{}ms", duration.as_millis()))
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        parse_duration(&s).map_err(serde::de::Error::custom)
    }

    pub(super) fn parse_duration(s: &str) -> Result<Duration, &'static str> {
        let s = s.trim();
        // "ms" before "m" and "s"
        if let Some(ms) = s.strip_suffix("ms") {
            ms.trim()
                .parse::<u64>()
                .map(Duration::from_millis)
                .map_err(|_| "invalid milliseconds")
        } else if let Some(secs) = s.strip_suffix('s') {
            secs.trim()
                .parse::<u64>()
                .map(Duration::from_secs)
                .map_err(|_| "invalid seconds")
        } else if let Some(mins) = s.strip_suffix('m') {
            mins.trim()
                .parse::<u64>()
                .ok()
                .and_then(|m| m.checked_mul(60))
                .map(Duration::from_secs)
                .ok_or("invalid minutes")
        } else {
            s.parse::<u64>()
                .map(Duration::from_secs)
                .map_err(|_| "invalid duration format")
        }
    }
}
