//! API request handlers

use super::{responses::*, ApiState};
use crate::core::{ApiError, ApiResult};
use axum::{
    body::Bytes,
    extract::{Multipart, State},
    response::Json,
};
use launchpad_sdk::{CreateTokenForm, ImageAsset, MetadataFields, TokenCreationRequest};
use tracing::{debug, info};

const FILE_FIELD: &str = "file";
const METADATA_FIELD: &str = "metadata";

/// Multipart fields shared by both launch endpoints
struct LaunchParts {
    image: ImageAsset,
    metadata: Bytes,
}

async fn read_parts(mut multipart: Multipart) -> ApiResult<LaunchParts> {
    let mut image = None;
    let mut metadata = None;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().map(str::to_owned);
        match name.as_deref() {
            Some(FILE_FIELD) => {
                let content_type = field.content_type().unwrap_or_default().to_string();
                let bytes = field.bytes().await?;
                debug!("Received image part: {} bytes, {}", bytes.len(), content_type);
                image = Some(ImageAsset::new(bytes.to_vec(), content_type));
            }
            Some(METADATA_FIELD) => metadata = Some(field.bytes().await?),
            other => debug!("Ignoring multipart field {:?}", other),
        }
    }

    let image = image.ok_or_else(|| ApiError::BadRequest("Missing `file` field".into()))?;
    let metadata =
        metadata.ok_or_else(|| ApiError::BadRequest("Missing `metadata` field".into()))?;
    Ok(LaunchParts { image, metadata })
}

/// Pin assets and return a launch transaction for the creator to sign
pub async fn create_token(
    State(state): State<ApiState>,
    multipart: Multipart,
) -> ApiResult<Json<CreateTokenResponse>> {
    let parts = read_parts(multipart).await?;
    let form: CreateTokenForm = serde_json::from_slice(&parts.metadata)?;
    let request = TokenCreationRequest::from_form(form, parts.image)?;

    info!(
        "Create token request: {} ({}) for {}",
        request.name, request.symbol, request.creator
    );
    let receipt = state.launcher.launch(request).await?;

    Ok(Json(receipt.into()))
}

/// Pin assets only
pub async fn upload_metadata(
    State(state): State<ApiState>,
    multipart: Multipart,
) -> ApiResult<Json<UploadResponse>> {
    let parts = read_parts(multipart).await?;
    let fields: MetadataFields = serde_json::from_slice(&parts.metadata)?;
    let fields = MetadataFields {
        name: fields.name.trim().to_string(),
        symbol: fields.symbol.trim().to_string(),
        description: fields.description,
    };

    info!("Upload request: {} ({})", fields.name, fields.symbol);
    let uploaded = state.launcher.upload_metadata(parts.image, fields).await?;

    Ok(Json(uploaded.into()))
}
