//! HTTP client for a content-addressed pinning service

use std::time::Duration;

use async_trait::async_trait;
use launchpad_sdk::{StorageUploader, UploadError};
use reqwest::{header, Client, StatusCode};
use serde::Deserialize;
use tracing::debug;

use crate::config::StorageConfig;

/// Body returned by the pinning service
#[derive(Debug, Deserialize)]
struct PinResponse {
    id: String,
}

/// Uploads raw bytes and resolves them against a public gateway
pub struct HttpStorageUploader {
    client: Client,
    upload_url: String,
    gateway_url: String,
    api_key: Option<String>,
    timeout: Duration,
}

impl HttpStorageUploader {
    pub fn new(config: &StorageConfig) -> anyhow::Result<Self> {
        let timeout = Duration::from_secs(config.timeout_secs);
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            upload_url: config.upload_url.clone(),
            gateway_url: config.gateway_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            timeout,
        })
    }

    pub fn gateway_uri(&self, id: &str) -> String {
        format!("{}/{}", self.gateway_url, id)
    }

    fn classify(&self, err: reqwest::Error) -> UploadError {
        if err.is_timeout() {
            UploadError::Timeout(self.timeout)
        } else {
            UploadError::Unreachable(err.to_string())
        }
    }
}

/// Map a non-success status onto the retry classification
fn status_error(status: StatusCode, message: String) -> UploadError {
    if status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS {
        UploadError::Unavailable {
            status: status.as_u16(),
            message,
        }
    } else {
        UploadError::Rejected {
            status: status.as_u16(),
            message,
        }
    }
}

#[async_trait]
impl StorageUploader for HttpStorageUploader {
    async fn upload(
        &self,
        bytes: Vec<u8>,
        file_name: &str,
        content_type: &str,
    ) -> Result<String, UploadError> {
        let size = bytes.len();
        let mut request = self
            .client
            .post(&self.upload_url)
            .header(header::CONTENT_TYPE, content_type)
            .header("X-File-Name", file_name)
            .body(bytes);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await.map_err(|e| self.classify(e))?;
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(status_error(status, message));
        }

        let pinned: PinResponse = response
            .json()
            .await
            .map_err(|e| UploadError::InvalidResponse(e.to_string()))?;
        if pinned.id.is_empty() {
            return Err(UploadError::InvalidResponse("empty content id".into()));
        }

        debug!("Pinned {} ({} bytes) as {}", file_name, size, pinned.id);
        Ok(self.gateway_uri(&pinned.id))
    }
}
