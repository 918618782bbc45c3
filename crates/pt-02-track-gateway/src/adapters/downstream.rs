//! HTTP client for the processing service.

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Url};
use tracing::debug;

use crate::domain::config::DownstreamConfig;
use crate::domain::error::{GatewayError, UploadError};
use crate::domain::types::UploadPayload;
use crate::ports::outbound::ProcessingService;

/// POSTs uploads to `{base_url}/{endpoint}` and buffers the whole response.
#[derive(Debug, Clone)]
pub struct HttpProcessingClient {
    client: Client,
    endpoint: Url,
}

impl HttpProcessingClient {
    pub fn new(config: &DownstreamConfig) -> Result<Self, GatewayError> {
        let endpoint = config.endpoint_url()?;
        let client = Client::builder()
            .timeout(config.request_timeout)
            .connect_timeout(config.connect_timeout)
            .build()
            .map_err(|e| GatewayError::Internal(format!("http client: {e}")))?;

        Ok(Self { client, endpoint })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl ProcessingService for HttpProcessingClient {
    async fn process(&self, upload: UploadPayload) -> Result<Bytes, UploadError> {
        let mut request = self.client.post(self.endpoint.clone()).body(upload.body);
        if let Some(content_type) = upload.content_type {
            request = request.header(CONTENT_TYPE, content_type);
        }

        let response = request.send().await.map_err(transport_error)?;
        let status = response.status();
        if !status.is_success() {
            return Err(UploadError::DownstreamRejected {
                status: status.as_u16(),
            });
        }

        // Fully buffered: the store only ever sees complete payloads
        let body = response.bytes().await.map_err(transport_error)?;
        debug!(status = status.as_u16(), bytes = body.len(), "Processing service responded");
        Ok(body)
    }
}

fn transport_error(e: reqwest::Error) -> UploadError {
    if e.is_timeout() {
        UploadError::Transport(format!("timed out: {e}"))
    } else {
        UploadError::Transport(e.to_string())
    }
}
