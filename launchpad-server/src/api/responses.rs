//! API response types

use launchpad_sdk::{LaunchReceipt, UploadedMetadata};
use serde::{Deserialize, Serialize};

/// Response for a prepared launch transaction
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTokenResponse {
    pub success: bool,
    /// Base58 transaction, signed by the mint, awaiting the creator
    pub transaction: String,
    pub mint: String,
    pub metadata_uri: String,
}

impl From<LaunchReceipt> for CreateTokenResponse {
    fn from(receipt: LaunchReceipt) -> Self {
        Self {
            success: true,
            transaction: receipt.transaction,
            mint: receipt.mint,
            metadata_uri: receipt.metadata_uri,
        }
    }
}

/// Response for the upload-only flow
#[derive(Debug, Serialize, Deserialize)]
pub struct UploadResponse {
    pub success: bool,
    pub metadata: String,
    pub image: String,
}

impl From<UploadedMetadata> for UploadResponse {
    fn from(uploaded: UploadedMetadata) -> Self {
        Self {
            success: true,
            metadata: uploaded.metadata_uri,
            image: uploaded.image_uri,
        }
    }
}

/// Body of every error response
#[derive(Debug, Serialize, Deserialize)]
pub struct FailureResponse {
    pub success: bool,
    pub message: String,
}

impl FailureResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}
