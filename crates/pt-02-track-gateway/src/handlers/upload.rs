//! `POST /upload`

use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use bytes::Bytes;

use super::AppState;
use crate::domain::types::{UploadPayload, UploadResponse};

/// Forward a multipart upload and answer `{status, id}`.
pub async fn handle_upload(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned);

    match state
        .relay
        .upload(UploadPayload::new(content_type, body))
        .await
    {
        Ok(stored) => {
            state.metrics.record_upload_success(stored.size);
            (StatusCode::OK, Json(UploadResponse::success(stored.id))).into_response()
        }
        Err(e) => {
            state.metrics.record_upload_failure(&e);
            (e.status_code(), Json(UploadResponse::error())).into_response()
        }
    }
}
