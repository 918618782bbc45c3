//! End-to-end flows over real sockets: client → gateway → processing service.

use super::harness::{download, upload, Downstream, MockDownstream, RunningGateway};
use axum::http::StatusCode;
use futures::future::join_all;
use std::sync::atomic::Ordering;
use std::time::Duration;

const ARCHIVE: &[u8] = b"PK\x03\x04zip!!";

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    haystack.windows(needle.len()).any(|w| w == needle)
}

#[tokio::test]
async fn test_upload_then_download_returns_processed_archive() {
    let downstream = MockDownstream::spawn(Downstream::Fixed(StatusCode::OK, ARCHIVE)).await;
    let gateway = RunningGateway::start(&downstream.base_url).await;
    let client = reqwest::Client::new();

    let (status, body) = upload(
        &client,
        &gateway,
        &[
            ("guitar.wav", b"RIFF....WAVE".to_vec()),
            ("drums.wav", b"RIFF....drum".to_vec()),
        ],
    )
    .await;
    assert_eq!(status, reqwest::StatusCode::OK);
    assert_eq!(body["status"], "success");
    let id = body["id"].as_str().unwrap().to_string();
    assert_eq!(id.len(), 36);
    assert_eq!(downstream.hits(), 1);
    assert_eq!(gateway.stored_files(), 1);

    let response = download(&client, &gateway, &id).await;
    assert_eq!(response.status(), reqwest::StatusCode::OK);
    assert_eq!(response.headers()["content-type"], "application/zip");
    assert_eq!(
        response.headers()["content-disposition"],
        "attachment; filename=practice_tracks.zip"
    );
    assert_eq!(response.bytes().await.unwrap().as_ref(), ARCHIVE);

    // Not consumed by a download
    let again = download(&client, &gateway, &id).await;
    assert_eq!(again.status(), reqwest::StatusCode::OK);
    assert_eq!(again.bytes().await.unwrap().as_ref(), ARCHIVE);

    assert_eq!(gateway.metrics.downloads_served.load(Ordering::Relaxed), 2);
    gateway.stop().await;
}

#[tokio::test]
async fn test_downstream_failure_returns_error_and_writes_nothing() {
    let downstream = MockDownstream::spawn(Downstream::Fixed(
        StatusCode::INTERNAL_SERVER_ERROR,
        b"boom",
    ))
    .await;
    let gateway = RunningGateway::start(&downstream.base_url).await;
    let client = reqwest::Client::new();

    let (status, body) = upload(&client, &gateway, &[("a.wav", b"RIFF".to_vec())]).await;
    assert_eq!(status, reqwest::StatusCode::BAD_GATEWAY);
    assert_eq!(body, serde_json::json!({ "status": "error" }));
    assert_eq!(downstream.hits(), 1);
    assert_eq!(gateway.stored_files(), 0);
    assert_eq!(gateway.metrics.uploads_rejected.load(Ordering::Relaxed), 1);

    gateway.stop().await;
}

#[tokio::test]
async fn test_unreachable_downstream_returns_error() {
    // Grab a free port, then release it so nothing listens there
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let gateway = RunningGateway::start(&format!("http://127.0.0.1:{port}")).await;
    let client = reqwest::Client::new();

    let (status, body) = upload(&client, &gateway, &[("a.wav", b"RIFF".to_vec())]).await;
    assert_eq!(status, reqwest::StatusCode::BAD_GATEWAY);
    assert_eq!(body["status"], "error");
    assert!(body.get("id").is_none());
    assert_eq!(gateway.stored_files(), 0);

    gateway.stop().await;
}

#[tokio::test]
async fn test_unknown_id_is_not_found() {
    let downstream = MockDownstream::spawn(Downstream::Fixed(StatusCode::OK, ARCHIVE)).await;
    let gateway = RunningGateway::start(&downstream.base_url).await;
    let client = reqwest::Client::new();

    let response = download(&client, &gateway, "00000000-0000-4000-8000-000000000000").await;
    assert_eq!(response.status(), reqwest::StatusCode::NOT_FOUND);
    assert_eq!(response.text().await.unwrap(), "File not found");

    let response = download(&client, &gateway, "../../etc/passwd").await;
    assert_eq!(response.status(), reqwest::StatusCode::NOT_FOUND);

    let response = client.get(gateway.url("/download")).send().await.unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::NOT_FOUND);
    assert_eq!(response.text().await.unwrap(), "File not found");

    gateway.stop().await;
}

#[tokio::test]
async fn test_concurrent_uploads_get_distinct_ids_and_own_contents() {
    const UPLOADS: usize = 50;

    let downstream = MockDownstream::spawn(Downstream::Echo).await;
    let gateway = RunningGateway::start(&downstream.base_url).await;
    let client = reqwest::Client::new();

    let results = join_all((0..UPLOADS).map(|n| {
        let client = client.clone();
        let gateway = &gateway;
        async move {
            let token = format!("<<track-{n:03}>>");
            let (status, body) =
                upload(&client, gateway, &[("take.wav", token.clone().into_bytes())]).await;
            assert_eq!(status, reqwest::StatusCode::OK);
            (token, body["id"].as_str().unwrap().to_string())
        }
    }))
    .await;

    let mut ids: Vec<&str> = results.iter().map(|(_, id)| id.as_str()).collect();
    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids.len(), UPLOADS);
    assert_eq!(gateway.stored_files(), UPLOADS);

    for (n, (token, id)) in results.iter().enumerate() {
        let bytes = download(&client, &gateway, id).await.bytes().await.unwrap();
        assert!(contains(&bytes, token.as_bytes()), "upload {n} lost its contents");
        for (other, _) in results.iter().filter(|(t, _)| t != token) {
            assert!(!contains(&bytes, other.as_bytes()), "upload {n} contains {other}");
        }
    }

    gateway.stop().await;
}

#[tokio::test]
async fn test_artifact_is_evicted_after_window_and_period() {
    let downstream = MockDownstream::spawn(Downstream::Fixed(StatusCode::OK, ARCHIVE)).await;
    let gateway = RunningGateway::start_with(&downstream.base_url, |config| {
        config.retention.window = Duration::from_millis(300);
        config.retention.sweep_period = Duration::from_millis(200);
    })
    .await;
    let client = reqwest::Client::new();

    let (_, body) = upload(&client, &gateway, &[("a.wav", b"RIFF".to_vec())]).await;
    let id = body["id"].as_str().unwrap().to_string();

    let fresh = download(&client, &gateway, &id).await;
    assert_eq!(fresh.status(), reqwest::StatusCode::OK);

    // window + period, plus slack for a loaded machine
    tokio::time::sleep(Duration::from_millis(300 + 200 + 700)).await;

    let gone = download(&client, &gateway, &id).await;
    assert_eq!(gone.status(), reqwest::StatusCode::NOT_FOUND);
    assert_eq!(gateway.stored_files(), 0);

    gateway.stop().await;
}

#[tokio::test]
async fn test_health_endpoint() {
    let downstream = MockDownstream::spawn(Downstream::Fixed(StatusCode::OK, ARCHIVE)).await;
    let gateway = RunningGateway::start(&downstream.base_url).await;

    let response = reqwest::get(gateway.url("/health")).await.unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::OK);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["status"], "ok");

    gateway.stop().await;
}
