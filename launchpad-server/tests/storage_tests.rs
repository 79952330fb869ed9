//! HTTP storage adapter tests against a local pinning service

use anyhow::Result;
use axum::{
    body::Bytes,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use launchpad_sdk::{StorageUploader, UploadError};
use launchpad_server::adapters::HttpStorageUploader;
use launchpad_server::config::StorageConfig;
use serde_json::json;
use std::net::SocketAddr;
use tokio::net::TcpListener;

/// Echo the file name back as the content id, or fail on demand
async fn pin(headers: HeaderMap, body: Bytes) -> Response {
    let file_name = headers
        .get("x-file-name")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    let authorized = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        == Some("Bearer secret");

    match file_name.as_str() {
        "busy.png" => (StatusCode::SERVICE_UNAVAILABLE, "try later").into_response(),
        "huge.png" => (StatusCode::PAYLOAD_TOO_LARGE, "too large").into_response(),
        "garbage.png" => (StatusCode::OK, "not json").into_response(),
        _ if !authorized => (StatusCode::UNAUTHORIZED, "missing key").into_response(),
        _ => Json(json!({ "id": format!("{}-{}", body.len(), file_name) })).into_response(),
    }
}

async fn spawn_pinning_service() -> Result<SocketAddr> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let app = Router::new().route("/upload", post(pin));
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    Ok(addr)
}

fn storage_config(addr: SocketAddr, api_key: Option<&str>) -> StorageConfig {
    StorageConfig {
        upload_url: format!("http://{}/upload", addr),
        gateway_url: "https://gateway.example.com/".to_string(),
        api_key: api_key.map(str::to_string),
        timeout_secs: 5,
        ..StorageConfig::default()
    }
}

#[tokio::test]
async fn test_upload_resolves_gateway_uri() -> Result<()> {
    let addr = spawn_pinning_service().await?;
    let uploader = HttpStorageUploader::new(&storage_config(addr, Some("secret")))?;

    let uri = uploader
        .upload(vec![0u8; 4], "asset.png", "image/png")
        .await?;
    assert_eq!(uri, "https://gateway.example.com/4-asset.png");
    Ok(())
}

#[tokio::test]
async fn test_status_codes_are_classified() -> Result<()> {
    let addr = spawn_pinning_service().await?;
    let uploader = HttpStorageUploader::new(&storage_config(addr, Some("secret")))?;

    let busy = uploader.upload(vec![1], "busy.png", "image/png").await.unwrap_err();
    assert!(matches!(busy, UploadError::Unavailable { status: 503, .. }));
    assert!(busy.is_transient());

    let huge = uploader.upload(vec![1], "huge.png", "image/png").await.unwrap_err();
    assert!(matches!(huge, UploadError::Rejected { status: 413, .. }));
    assert!(!huge.is_transient());

    let garbage = uploader
        .upload(vec![1], "garbage.png", "image/png")
        .await
        .unwrap_err();
    assert!(matches!(garbage, UploadError::InvalidResponse(_)));
    Ok(())
}

#[tokio::test]
async fn test_missing_api_key_is_rejected() -> Result<()> {
    let addr = spawn_pinning_service().await?;
    let uploader = HttpStorageUploader::new(&storage_config(addr, None))?;

    let err = uploader.upload(vec![1], "asset.png", "image/png").await.unwrap_err();
    assert!(matches!(err, UploadError::Rejected { status: 401, .. }));
    Ok(())
}

#[tokio::test]
async fn test_closed_port_is_unreachable() -> Result<()> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    drop(listener);

    let uploader = HttpStorageUploader::new(&storage_config(addr, None))?;
    let err = uploader.upload(vec![1], "asset.png", "image/png").await.unwrap_err();
    assert!(matches!(err, UploadError::Unreachable(_)));
    assert!(err.is_transient());
    Ok(())
}
