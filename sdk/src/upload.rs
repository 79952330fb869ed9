//! Pinning of the token image and its JSON metadata document
//!
//! The image is uploaded first; its URI is embedded in the metadata
//! document, which is uploaded second. Transient storage failures are
//! retried with exponential backoff. Storage is content-addressed, so a
//! retried upload of identical bytes resolves to the same URI.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::core::{
    constants::{MAX_URI_LENGTH, METADATA_CONTENT_TYPE, METADATA_FILE_NAME},
    ImageAsset, MetadataFields, SdkError, SdkResult,
};

/// Storage collaborator failures
#[derive(Error, Debug, Clone, PartialEq)]
pub enum UploadError {
    #[error("storage unreachable: {0}")]
    Unreachable(String),

    #[error("storage timed out after {0:?}")]
    Timeout(Duration),

    #[error("storage unavailable (status {status}): {message}")]
    Unavailable { status: u16, message: String },

    #[error("storage rejected payload (status {status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("malformed storage response: {0}")]
    InvalidResponse(String),
}

impl UploadError {
    /// Whether another attempt could succeed
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            UploadError::Unreachable(_) | UploadError::Timeout(_) | UploadError::Unavailable { .. }
        )
    }
}

/// Decentralized storage port: pins bytes and returns their URI
#[async_trait]
pub trait StorageUploader: Send + Sync {
    async fn upload(
        &self,
        bytes: Vec<u8>,
        file_name: &str,
        content_type: &str,
    ) -> Result<String, UploadError>;
}

/// Bounded exponential backoff for transient upload failures
#[derive(Clone, Debug, PartialEq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
    pub backoff_multiplier: f64,
}

impl RetryPolicy {
    /// Single attempt, no retries
    pub fn none() -> Self {
        Self {
            max_attempts: 1,
            ..Self::default()
        }
    }

    /// Delay before retry number `retry` (1-based)
    pub fn delay_for(&self, retry: u32) -> Duration {
        let factor = self.backoff_multiplier.max(1.0).powi(retry.saturating_sub(1) as i32);
        let millis = (self.base_delay.as_millis() as f64 * factor).min(self.max_delay.as_millis() as f64);
        Duration::from_millis(millis as u64)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(250),
            max_delay: Duration::from_secs(2),
            backoff_multiplier: 2.0,
        }
    }
}

/// Off-chain JSON document the on-chain metadata URI points at
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MetadataDocument {
    pub name: String,
    pub symbol: String,
    pub description: String,
    pub image: String,
}

impl MetadataDocument {
    pub fn new(fields: &MetadataFields, image_uri: &str) -> Self {
        Self {
            name: fields.name.clone(),
            symbol: fields.symbol.clone(),
            description: fields.description.clone(),
            image: image_uri.to_string(),
        }
    }
}

/// URIs produced by a completed pipeline run
#[derive(Clone, Debug, PartialEq)]
pub struct UploadedMetadata {
    pub image_uri: String,
    pub metadata_uri: String,
    pub document: MetadataDocument,
}

/// Coordinates the two sequential uploads of a launch
pub struct UploadPipeline {
    uploader: Arc<dyn StorageUploader>,
    retry: RetryPolicy,
}

impl UploadPipeline {
    pub fn new(uploader: Arc<dyn StorageUploader>, retry: RetryPolicy) -> Self {
        Self { uploader, retry }
    }

    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry
    }

    /// Pin the image, then a metadata document referencing it
    pub async fn run(&self, image: &ImageAsset, fields: &MetadataFields) -> SdkResult<UploadedMetadata> {
        fields.validate()?;
        if image.bytes.is_empty() {
            return Err(SdkError::InvalidInput("Image payload is empty".into()));
        }

        let image_uri = self
            .upload_with_retry(
                image.bytes.clone(),
                &image.file_name(),
                image.effective_content_type(),
            )
            .await?;
        info!("Image pinned at {}", image_uri);

        // The metadata URI comes from the same gateway and lands on-chain.
        if image_uri.len() > MAX_URI_LENGTH {
            return Err(SdkError::Compilation(format!(
                "Storage URI is {} bytes, on-chain limit is {}: {}",
                image_uri.len(),
                MAX_URI_LENGTH,
                image_uri
            )));
        }

        let document = MetadataDocument::new(fields, &image_uri);
        let body = serde_json::to_vec(&document)
            .map_err(|e| SdkError::InvalidInput(format!("Failed to encode metadata: {}", e)))?;

        let metadata_uri = self
            .upload_with_retry(body, METADATA_FILE_NAME, METADATA_CONTENT_TYPE)
            .await?;
        info!("Metadata pinned at {}", metadata_uri);

        Ok(UploadedMetadata {
            image_uri,
            metadata_uri,
            document,
        })
    }

    async fn upload_with_retry(
        &self,
        bytes: Vec<u8>,
        file_name: &str,
        content_type: &str,
    ) -> SdkResult<String> {
        let max_attempts = self.retry.max_attempts.max(1);
        let mut attempt = 0;

        loop {
            attempt += 1;
            debug!(
                "Uploading {} ({} bytes, attempt {}/{})",
                file_name,
                bytes.len(),
                attempt,
                max_attempts
            );

            match self.uploader.upload(bytes.clone(), file_name, content_type).await {
                Ok(uri) => return Ok(uri),
                Err(e) if e.is_transient() && attempt < max_attempts => {
                    let delay = self.retry.delay_for(attempt);
                    warn!(
                        "Upload of {} failed ({}), retrying in {:?}",
                        file_name, e, delay
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(source) => {
                    return Err(SdkError::Upload {
                        attempts: attempt,
                        source,
                    })
                }
            }
        }
    }
}
