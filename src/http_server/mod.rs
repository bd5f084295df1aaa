//! # lessonhub HTTP Server Module
//!
//! Combines all endpoint routers into a single Axum server.
//!
//! # Endpoints
//!
//! - `/` - Greeting
//! - `/health` - Health check
//! - `/lessons`, `/lessons/:id` - Lesson catalogue
//! - `/orders` - Order placement

mod json_body;
pub mod lesson_routes;
pub mod observability_routes;
pub mod order_routes;
pub mod server;

pub use server::{
    build_router, cors_layer, shutdown_signal, HttpServer, ALLOWED_HEADERS, ALLOWED_METHODS,
};
