//! API route definitions

use super::{handlers::*, ApiState};
use axum::{routing::post, Router};

/// Create token launch routes
pub fn create_launch_routes() -> Router<ApiState> {
    Router::new()
        .route("/api/create-token", post(create_token))
        .route("/api/upload", post(upload_metadata))
}
