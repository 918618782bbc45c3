//! Track Gateway service - router, background sweeper and server lifecycle.

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use pt_01_artifact_store::{
    ArtifactStore, EvictionSweeper, FsArtifactStore, IdGenerator, SweeperConfig, UuidGenerator,
};
use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::limit::RequestBodyLimitLayer;
use tracing::{info, warn};

use crate::adapters::HttpProcessingClient;
use crate::domain::config::TrackGatewayConfig;
use crate::domain::error::GatewayError;
use crate::domain::relay::TrackRelay;
use crate::handlers::{handle_download, handle_upload, health_check, metrics_snapshot, AppState};
use crate::middleware::{create_cors_layer, RelayMetrics, TimeoutLayer, TracingLayer};
use crate::ports::outbound::ProcessingService;

/// Track Gateway service state
pub struct TrackGatewayService {
    config: TrackGatewayConfig,
    state: AppState,
    sweeper: Option<EvictionSweeper>,
}

impl TrackGatewayService {
    /// Create the service with the directory store and HTTP processing client.
    pub fn new(config: TrackGatewayConfig) -> Result<Self, GatewayError> {
        config.validate()?;

        let store = Arc::new(FsArtifactStore::with_extension(
            &config.storage.temp_dir,
            config.storage.extension.clone(),
        ));
        let processing = Arc::new(HttpProcessingClient::new(&config.downstream)?);

        Ok(Self::with_components(
            config,
            processing,
            store,
            Arc::new(UuidGenerator),
        ))
    }

    /// Create the service over explicit collaborators.
    pub fn with_components(
        config: TrackGatewayConfig,
        processing: Arc<dyn ProcessingService>,
        store: Arc<dyn ArtifactStore>,
        ids: Arc<dyn IdGenerator>,
    ) -> Self {
        let sweeper = config.retention.sweep_enabled.then(|| {
            EvictionSweeper::new(
                Arc::clone(&store),
                SweeperConfig {
                    retention: config.retention.window,
                    period: config.retention.sweep_period,
                },
            )
        });

        let state = AppState {
            relay: Arc::new(TrackRelay::new(processing, store, ids)),
            metrics: Arc::new(RelayMetrics::new()),
            sweeper_stats: sweeper.as_ref().map(EvictionSweeper::stats),
        };

        Self {
            config,
            state,
            sweeper,
        }
    }

    pub fn config(&self) -> &TrackGatewayConfig {
        &self.config
    }

    /// Get metrics
    pub fn metrics(&self) -> Arc<RelayMetrics> {
        Arc::clone(&self.state.metrics)
    }

    /// Build the HTTP router
    pub fn router(&self) -> Router {
        let middleware = ServiceBuilder::new()
            .layer(create_cors_layer(&self.config.cors))
            .layer(TracingLayer::new())
            .layer(TimeoutLayer::new(self.config.timeouts.request));

        Router::new()
            .route("/upload", post(handle_upload))
            .route("/download", get(handle_download))
            .route("/health", get(health_check))
            .route("/metrics", get(metrics_snapshot))
            .layer(DefaultBodyLimit::disable())
            .layer(RequestBodyLimitLayer::new(self.config.limits.max_upload_size))
            .layer(middleware)
            .with_state(self.state.clone())
    }

    /// Bind the configured HTTP address
    pub async fn bind(&self) -> Result<TcpListener, GatewayError> {
        let addr = self.config.http_addr();
        TcpListener::bind(addr)
            .await
            .map_err(|e| GatewayError::Bind(format!("{addr}: {e}")))
    }

    /// Bind and serve until `shutdown` resolves.
    pub async fn run<F>(self, shutdown: F) -> Result<(), GatewayError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let listener = self.bind().await?;
        self.serve(listener, shutdown).await
    }

    /// Serve on `listener` until `shutdown` resolves.
    ///
    /// The sweeper runs for exactly as long as the server does.
    pub async fn serve<F>(mut self, listener: TcpListener, shutdown: F) -> Result<(), GatewayError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        info!("Starting Track Gateway...");

        // Uploads retry this; a failure here is not fatal
        if let Err(e) = self.state.relay.store().ensure_ready().await {
            warn!(error = %e, "Artifact directory not ready at startup");
        }

        let router = self.router();
        let sweeper = self.sweeper.take().map(EvictionSweeper::spawn);

        let addr = listener
            .local_addr()
            .map_err(|e| GatewayError::Bind(e.to_string()))?;
        info!(
            addr = %addr,
            downstream = %self.config.downstream.base_url,
            temp_dir = %self.config.storage.temp_dir.display(),
            "Track Gateway listening"
        );

        let result = axum::serve(listener, router)
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(|e| GatewayError::Internal(format!("server error: {e}")));

        if let Some(handle) = sweeper {
            handle.stop().await;
        }

        info!("Track Gateway stopped");
        result
    }
}
