//! # lessonhub REST API Module
//!
//! Route-independent request handling: the [`LessonService`] operations, the
//! error taxonomy they return, and shared response bodies.

pub mod errors;
pub mod response;
pub mod service;

pub use errors::{ApiError, ApiResult, ErrorResponse};
pub use response::{HealthResponse, MessageResponse};
pub use service::{LessonService, DEFAULT_STORAGE_TIMEOUT};
