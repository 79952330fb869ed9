//! Centralized error types for the launchpad server

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use launchpad_sdk::{ErrorKind, SdkError};
use thiserror::Error;
use tracing::{error, warn};

use crate::api::responses::FailureResponse;

/// Errors surfaced by HTTP handlers
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("Malformed multipart body: {0}")]
    Multipart(#[from] axum::extract::multipart::MultipartError),

    #[error("Invalid metadata JSON: {0}")]
    MetadataJson(#[from] serde_json::Error),

    #[error(transparent)]
    Launch(#[from] SdkError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) | ApiError::Multipart(_) | ApiError::MetadataJson(_) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::Launch(err) => match err.kind() {
                ErrorKind::InvalidInput => StatusCode::BAD_REQUEST,
                ErrorKind::UploadFailure => StatusCode::BAD_GATEWAY,
                ErrorKind::CompilationFailure => match err {
                    SdkError::Ledger(_) => StatusCode::BAD_GATEWAY,
                    _ => StatusCode::UNPROCESSABLE_ENTITY,
                },
                ErrorKind::AuthorityOrderingFailure => StatusCode::INTERNAL_SERVER_ERROR,
                ErrorKind::Timeout => StatusCode::GATEWAY_TIMEOUT,
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("Request failed ({}): {}", status, self);
        } else {
            warn!("Request rejected ({}): {}", status, self);
        }

        (status, Json(FailureResponse::new(self.to_string()))).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
