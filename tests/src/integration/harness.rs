//! Test fixtures: a mock processing service and a gateway on a real socket.

use axum::{body::Bytes, http::StatusCode, routing::post, Router};
use pt_02_track_gateway::{GatewayError, RelayMetrics, TrackGatewayConfig, TrackGatewayService};
use reqwest::multipart::{Form, Part};
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tempfile::TempDir;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

/// What the mock processing service answers.
#[derive(Clone, Copy)]
pub enum Downstream {
    /// Fixed status and body
    Fixed(StatusCode, &'static [u8]),
    /// 200 with the received request body
    Echo,
}

pub struct MockDownstream {
    pub base_url: String,
    hits: Arc<AtomicUsize>,
}

impl MockDownstream {
    pub async fn spawn(behaviour: Downstream) -> Self {
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&hits);
        let app = Router::new().route(
            "/practice_tracks",
            post(move |body: Bytes| {
                let counter = Arc::clone(&counter);
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    match behaviour {
                        Downstream::Fixed(status, payload) => (status, Bytes::from_static(payload)),
                        Downstream::Echo => (StatusCode::OK, body),
                    }
                }
            }),
        );

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: format!("http://{addr}"),
            hits,
        }
    }

    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }
}

/// A gateway served on an ephemeral port over a temporary directory.
pub struct RunningGateway {
    pub base_url: String,
    pub metrics: Arc<RelayMetrics>,
    dir: TempDir,
    shutdown: Option<oneshot::Sender<()>>,
    server: Option<JoinHandle<Result<(), GatewayError>>>,
}

impl RunningGateway {
    pub async fn start(downstream_url: &str) -> Self {
        Self::start_with(downstream_url, |_| {}).await
    }

    pub async fn start_with<F>(downstream_url: &str, tweak: F) -> Self
    where
        F: FnOnce(&mut TrackGatewayConfig),
    {
        let dir = TempDir::new().unwrap();
        let mut config = TrackGatewayConfig::default();
        config.downstream.base_url = downstream_url.to_string();
        config.storage.temp_dir = dir.path().join("downloads");
        config.http.host = "127.0.0.1".parse().unwrap();
        config.http.port = 0;
        tweak(&mut config);

        let service = TrackGatewayService::new(config).unwrap();
        let metrics = service.metrics();
        let listener = service.bind().await.unwrap();
        let addr = listener.local_addr().unwrap();

        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        let server = tokio::spawn(service.serve(listener, async move {
            let _ = shutdown_rx.await;
        }));

        Self {
            base_url: format!("http://{addr}"),
            metrics,
            dir,
            shutdown: Some(shutdown_tx),
            server: Some(server),
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub fn artifact_dir(&self) -> PathBuf {
        self.dir.path().join("downloads")
    }

    /// Files currently in the artifact directory.
    pub fn stored_files(&self) -> usize {
        std::fs::read_dir(self.artifact_dir())
            .map(|entries| entries.count())
            .unwrap_or(0)
    }

    pub async fn stop(mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        if let Some(server) = self.server.take() {
            server.await.unwrap().unwrap();
        }
    }
}

/// Upload `files` as the `files` parts of a multipart form.
pub async fn upload(
    client: &reqwest::Client,
    gateway: &RunningGateway,
    files: &[(&str, Vec<u8>)],
) -> (reqwest::StatusCode, serde_json::Value) {
    let mut form = Form::new();
    for (name, bytes) in files {
        form = form.part("files", Part::bytes(bytes.clone()).file_name(name.to_string()));
    }

    let response = client
        .post(gateway.url("/upload"))
        .multipart(form)
        .send()
        .await
        .unwrap();
    let status = response.status();
    (status, response.json().await.unwrap())
}

/// `GET /download?id=...`
pub async fn download(
    client: &reqwest::Client,
    gateway: &RunningGateway,
    id: &str,
) -> reqwest::Response {
    client
        .get(gateway.url("/download"))
        .query(&[("id", id)])
        .send()
        .await
        .unwrap()
}
