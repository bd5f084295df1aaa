//! Lesson HTTP Routes
//!
//! - `GET /lessons` - list every lesson
//! - `POST /lessons` - create a lesson
//! - `GET /lessons/:id` - fetch one lesson
//! - `PUT /lessons/:id` - set a lesson's inventory

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};

use super::json_body::json_body;
use crate::models::{CreateLessonRequest, Lesson, UpdateInventoryRequest};
use crate::rest_api::{ApiResult, LessonService, MessageResponse};
use crate::storage::StorageGateway;

type ServiceState<G> = State<Arc<LessonService<G>>>;

/// Create lesson routes
pub fn lesson_routes<G: StorageGateway>(service: Arc<LessonService<G>>) -> Router {
    Router::new()
        .route(
            "/lessons",
            get(list_lessons_handler::<G>).post(create_lesson_handler::<G>),
        )
        .route(
            "/lessons/:id",
            get(get_lesson_handler::<G>).put(update_inventory_handler::<G>),
        )
        .with_state(service)
}

async fn list_lessons_handler<G: StorageGateway>(
    State(service): ServiceState<G>,
) -> ApiResult<Json<Vec<Lesson>>> {
    let lessons = service.list_lessons().await?;
    Ok(Json(lessons))
}

async fn create_lesson_handler<G: StorageGateway>(
    State(service): ServiceState<G>,
    payload: Result<Json<CreateLessonRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Lesson>)> {
    let request = json_body(payload)?;
    let lesson = service.create_lesson(request).await?;
    Ok((StatusCode::CREATED, Json(lesson)))
}

async fn get_lesson_handler<G: StorageGateway>(
    State(service): ServiceState<G>,
    Path(id): Path<String>,
) -> ApiResult<Json<Lesson>> {
    let lesson = service.get_lesson(&id).await?;
    Ok(Json(lesson))
}

async fn update_inventory_handler<G: StorageGateway>(
    State(service): ServiceState<G>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateInventoryRequest>, JsonRejection>,
) -> ApiResult<Json<MessageResponse>> {
    let request = json_body(payload)?;
    service.set_inventory(&id, request).await?;
    Ok(Json(MessageResponse::new("Lesson updated successfully")))
}
