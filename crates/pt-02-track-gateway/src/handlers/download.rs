//! `GET /download?id=<id>`

use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};

use super::AppState;
use crate::domain::types::{
    DownloadQuery, ARCHIVE_CONTENT_TYPE, ARCHIVE_DISPOSITION, NOT_FOUND_BODY,
};

/// Serve a stored archive, or `404 File not found`.
///
/// Reads are non-destructive; the artifact stays until the sweeper evicts it.
/// An unparsable query is treated like a missing id.
pub async fn handle_download(
    State(state): State<AppState>,
    query: Option<Query<DownloadQuery>>,
) -> Response {
    let id = query.and_then(|Query(q)| q.id);
    match state.relay.download(id.as_deref()).await {
        Ok(bytes) => {
            state.metrics.record_download_served(bytes.len());
            (
                StatusCode::OK,
                [
                    (header::CONTENT_TYPE, ARCHIVE_CONTENT_TYPE),
                    (header::CONTENT_DISPOSITION, ARCHIVE_DISPOSITION),
                ],
                bytes,
            )
                .into_response()
        }
        Err(e) if e.is_not_found() => {
            state.metrics.record_download_not_found();
            (StatusCode::NOT_FOUND, NOT_FOUND_BODY).into_response()
        }
        Err(_) => {
            state.metrics.record_download_failed();
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
        }
    }
}
