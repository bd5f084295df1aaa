//! # REST API Errors
//!
//! Error types for the REST API module. Each variant owns its status code and
//! body form: request problems and order outcomes answer in plain text, the
//! rest answer with a JSON [`ErrorResponse`].

use std::time::Duration;

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;
use tracing::error;

use crate::models::ValidationError;
use crate::storage::StorageError;

/// Result type for REST operations
pub type ApiResult<T> = Result<T, ApiError>;

/// REST API errors
#[derive(Debug, Error)]
pub enum ApiError {
    // ==================
    // Client Errors (4xx)
    // ==================
    /// Body parsed but failed validation
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Body is not a JSON object of the expected shape
    #[error("Invalid request body: {0}")]
    InvalidBody(String),

    /// Path id is not a well-formed identifier
    #[error("Invalid lesson id")]
    InvalidId,

    /// Lesson does not exist
    #[error("Lesson not found")]
    NotFound,

    /// Lesson missing or short of stock
    #[error("Not enough inventory")]
    InsufficientInventory,

    // ==================
    // Server Errors (5xx)
    // ==================
    /// Storage failure
    #[error("Storage error: {0}")]
    Storage(StorageError),

    /// Storage call exceeded the configured timeout
    #[error("Storage call timed out after {0:?}")]
    StorageTimeout(Duration),

    /// Any storage failure during order placement
    #[error("Failed to place order")]
    OrderFailed,
}

impl ApiError {
    /// Get HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_)
            | ApiError::InvalidBody(_)
            | ApiError::InvalidId
            | ApiError::InsufficientInventory => StatusCode::BAD_REQUEST,

            ApiError::NotFound => StatusCode::NOT_FOUND,

            ApiError::Storage(_) | ApiError::StorageTimeout(_) | ApiError::OrderFailed => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn is_plain_text(&self) -> bool {
        matches!(
            self,
            ApiError::Validation(_)
                | ApiError::InvalidBody(_)
                | ApiError::InsufficientInventory
                | ApiError::OrderFailed
        )
    }
}

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        if err.is_invalid_id() {
            ApiError::InvalidId
        } else {
            ApiError::Storage(err)
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::InvalidBody(rejection.body_text())
    }
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
}

impl From<&ApiError> for ErrorResponse {
    fn from(err: &ApiError) -> Self {
        let error = match err {
            // causes stay in the log, clients get a generic message
            ApiError::Storage(_) | ApiError::StorageTimeout(_) => {
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };
        Self {
            error,
            code: err.status_code().as_u16(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!(error = %self, "Request failed");
        }

        if self.is_plain_text() {
            (status, self.to_string()).into_response()
        } else {
            (status, Json(ErrorResponse::from(&self))).into_response()
        }
    }
}
