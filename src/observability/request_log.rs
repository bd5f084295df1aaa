//! Request/response logging middleware

use std::time::Instant;

use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;
use chrono::{SecondsFormat, Utc};
use tracing::{info, warn};

/// Log timestamp, method, path, final status and latency of every request.
///
/// Mounted outermost so CORS preflights and rejected bodies are logged too.
pub async fn log_request(request: Request, next: Next) -> Response {
    let timestamp = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
    let method = request.method().clone();
    let path = request.uri().path().to_owned();
    let started = Instant::now();

    let response = next.run(request).await;

    let status = response.status().as_u16();
    let latency_ms = started.elapsed().as_millis() as u64;
    if response.status().is_server_error() {
        warn!(%timestamp, %method, %path, status, latency_ms, "Request completed");
    } else {
        info!(%timestamp, %method, %path, status, latency_ms, "Request completed");
    }

    response
}
