//! Service HTTP Routes
//!
//! Root greeting and health check. Neither touches storage.

use axum::{http::StatusCode, response::IntoResponse, routing::get, Json, Router};

use crate::rest_api::HealthResponse;

/// Greeting served at `/`
pub const ROOT_MESSAGE: &str = "lessonhub API is running";

/// Create root and health routes
pub fn service_routes() -> Router {
    Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_handler))
}

async fn root_handler() -> &'static str {
    ROOT_MESSAGE
}

/// Health check handler
async fn health_handler() -> impl IntoResponse {
    (StatusCode::OK, Json(HealthResponse::ok()))
}
