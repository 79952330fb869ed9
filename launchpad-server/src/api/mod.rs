//! HTTP boundary for token launches

mod handlers;
pub mod responses;
mod routes;

pub use routes::*;

use crate::config::ApiConfig;
use anyhow::Result;
use axum::{extract::DefaultBodyLimit, response::Json, routing::get, Router};
use launchpad_sdk::TokenLauncher;
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

/// Start the API server
pub async fn start_server(
    launcher: Arc<TokenLauncher>,
    config: &ApiConfig,
) -> Result<tokio::task::JoinHandle<()>> {
    let app = create_router(ApiState::new(launcher), config);

    let listener = TcpListener::bind(&config.bind_address).await?;
    info!("API server listening on {}", config.bind_address);

    let handle = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            tracing::error!("API server error: {}", e);
        }
    });

    Ok(handle)
}

/// Create the main API router
pub fn create_router(state: ApiState, config: &ApiConfig) -> Router {
    let app = Router::new()
        .merge(create_launch_routes())
        .route("/", get(health_handler))
        .route("/health", get(health_handler))
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(DefaultBodyLimit::max(config.max_request_size_mb * 1024 * 1024)),
        );

    if config.enable_cors {
        app.layer(CorsLayer::permissive())
    } else {
        app
    }
}

/// Health check handler
async fn health_handler() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().timestamp(),
        "service": "launchpad-server"
    }))
}

/// Shared API state
#[derive(Clone)]
pub struct ApiState {
    pub launcher: Arc<TokenLauncher>,
}

impl ApiState {
    pub fn new(launcher: Arc<TokenLauncher>) -> Self {
        Self { launcher }
    }
}
