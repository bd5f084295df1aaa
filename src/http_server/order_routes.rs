//! Order HTTP Routes
//!
//! `POST /orders` answers in plain text on every outcome.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};

use super::json_body::json_body;
use crate::models::PlaceOrderRequest;
use crate::rest_api::{ApiResult, LessonService};
use crate::storage::StorageGateway;

/// Create order routes
pub fn order_routes<G: StorageGateway>(service: Arc<LessonService<G>>) -> Router {
    Router::new()
        .route("/orders", post(place_order_handler::<G>))
        .with_state(service)
}

async fn place_order_handler<G: StorageGateway>(
    State(service): State<Arc<LessonService<G>>>,
    payload: Result<Json<PlaceOrderRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, &'static str)> {
    let request = json_body(payload)?;
    service.place_order(request).await?;
    Ok((StatusCode::CREATED, "Order placed successfully"))
}
