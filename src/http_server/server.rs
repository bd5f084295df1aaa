//! # HTTP Server
//!
//! Main HTTP server combining all endpoint routers behind the CORS and
//! request log layers.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    http::{
        header::{
            ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS, AUTHORIZATION,
            CONTENT_TYPE,
        },
        HeaderName, HeaderValue, Method,
    },
    middleware, Router,
};
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::cors::{Any, CorsLayer};
use tower_http::set_header::SetResponseHeaderLayer;
use tracing::{error, info};

use super::lesson_routes::lesson_routes;
use super::observability_routes::service_routes;
use super::order_routes::order_routes;
use crate::config::AppConfig;
use crate::observability::log_request;
use crate::rest_api::LessonService;
use crate::storage::StorageGateway;

/// Methods advertised on every response
pub const ALLOWED_METHODS: &str = "GET,HEAD,OPTIONS,POST,PUT";

/// Request headers advertised on every response
pub const ALLOWED_HEADERS: &str = "content-type,authorization,x-requested-with";

/// CORS policy. Answers preflights and sets the allowed origin.
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::HEAD,
            Method::OPTIONS,
            Method::POST,
            Method::PUT,
        ])
        .allow_headers([
            CONTENT_TYPE,
            AUTHORIZATION,
            HeaderName::from_static("x-requested-with"),
        ])
}

/// Build the combined router with all endpoints
pub fn build_router<G: StorageGateway>(service: Arc<LessonService<G>>) -> Router {
    Router::new()
        .merge(service_routes())
        .merge(lesson_routes(service.clone()))
        .merge(order_routes(service))
        .layer(cors_layer())
        // CorsLayer only lists methods and headers on preflight
        .layer(SetResponseHeaderLayer::if_not_present(
            ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static(ALLOWED_METHODS),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static(ALLOWED_HEADERS),
        ))
        // outermost, so the final status of every request is logged
        .layer(middleware::from_fn(log_request))
}

/// HTTP server for lessonhub
pub struct HttpServer {
    config: AppConfig,
    router: Router,
}

impl HttpServer {
    pub fn new<G: StorageGateway>(config: AppConfig, service: Arc<LessonService<G>>) -> Self {
        Self {
            config,
            router: build_router(service),
        }
    }

    /// Get the socket address
    pub fn socket_addr(&self) -> String {
        self.config.socket_addr()
    }

    /// Get the router (for testing)
    pub fn router(self) -> Router {
        self.router
    }

    /// Serve until `shutdown` resolves, then drain in-flight requests
    pub async fn start<F>(self, shutdown: F) -> Result<(), std::io::Error>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr: SocketAddr = self.config.socket_addr().parse().map_err(|e| {
            std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("Invalid socket address {}: {e}", self.config.socket_addr()),
            )
        })?;

        let listener = TcpListener::bind(addr).await?;
        info!(%addr, "lessonhub listening");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown)
            .await?;

        info!("Server stopped");
        Ok(())
    }
}

/// Resolves on Ctrl+C or SIGTERM
pub async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down"),
            Err(e) => {
                error!(error = %e, "Failed to install Ctrl+C handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
