//! # Lesson Service
//!
//! The operations behind every route, written against [`StorageGateway`].
//! Each storage call runs under the configured timeout.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tracing::{debug, error, info, warn};

use crate::models::{
    CreateLessonRequest, Lesson, NewOrder, Order, PlaceOrderRequest, UpdateInventoryRequest,
    INVENTORY_FIELD,
};
use crate::storage::{
    Collection, Document, StorageError, StorageGateway, StorageResult, UpdateGuard, ID_FIELD,
};

use super::errors::{ApiError, ApiResult};

/// Default bound on a single storage call
pub const DEFAULT_STORAGE_TIMEOUT: Duration = Duration::from_secs(5);

pub struct LessonService<G> {
    gateway: Arc<G>,
    timeout: Duration,
}

impl<G: StorageGateway> LessonService<G> {
    pub fn new(gateway: Arc<G>, timeout: Duration) -> Self {
        Self { gateway, timeout }
    }

    pub fn with_default_timeout(gateway: Arc<G>) -> Self {
        Self::new(gateway, DEFAULT_STORAGE_TIMEOUT)
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    /// Run one storage call under the timeout
    async fn call<T>(
        &self,
        operation: &'static str,
        fut: impl Future<Output = StorageResult<T>>,
    ) -> ApiResult<T> {
        match tokio::time::timeout(self.timeout, fut).await {
            Ok(result) => result.map_err(ApiError::from),
            Err(_) => {
                warn!(
                    operation,
                    timeout_ms = self.timeout.as_millis() as u64,
                    "Storage call timed out"
                );
                Err(ApiError::StorageTimeout(self.timeout))
            }
        }
    }

    pub async fn list_lessons(&self) -> ApiResult<Vec<Lesson>> {
        let documents = self
            .call("list_lessons", self.gateway.list(Collection::Lessons))
            .await?;
        documents.into_iter().map(decode_lesson).collect()
    }

    pub async fn create_lesson(&self, request: CreateLessonRequest) -> ApiResult<Lesson> {
        let lesson = request.validate()?;
        let document = lesson.to_document().map_err(encode_failed)?;

        let stored = self
            .call("insert_lesson", self.gateway.insert(Collection::Lessons, document))
            .await?;
        let lesson = decode_lesson(stored)?;

        info!(lesson_id = %lesson.id, name = %lesson.name, "Lesson created");
        Ok(lesson)
    }

    pub async fn get_lesson(&self, id: &str) -> ApiResult<Lesson> {
        let document = self
            .call("get_lesson", self.gateway.get_by_id(Collection::Lessons, id))
            .await?
            .ok_or(ApiError::NotFound)?;
        decode_lesson(document)
    }

    /// Set (not adjust) a lesson's inventory
    pub async fn set_inventory(&self, id: &str, request: UpdateInventoryRequest) -> ApiResult<()> {
        let inventory = request.validate()?;

        let mut fields = Document::new();
        fields.insert(INVENTORY_FIELD.to_string(), Value::from(inventory));

        let matched = self
            .call(
                "set_inventory",
                self.gateway.update_by_id(Collection::Lessons, id, fields),
            )
            .await?;
        if matched == 0 {
            return Err(ApiError::NotFound);
        }

        info!(lesson_id = %id, inventory, "Lesson inventory set");
        Ok(())
    }

    /// Reserve stock with one guarded decrement, then record the order.
    ///
    /// Nothing is written when stock is short. If the order insert fails the
    /// reservation is released again; a timed-out insert keeps it.
    pub async fn place_order(&self, request: PlaceOrderRequest) -> ApiResult<Order> {
        let order = request.validate()?;
        let document = order.to_document().map_err(|e| {
            error!(error = %e, "Failed to encode order");
            ApiError::OrderFailed
        })?;
        let quantity = i64::from(order.quantity);

        let reserved = self
            .call(
                "reserve_inventory",
                self.gateway.increment_field(
                    Collection::Lessons,
                    &order.lesson_id,
                    INVENTORY_FIELD,
                    -quantity,
                    UpdateGuard::AtLeast(quantity),
                ),
            )
            .await;
        match reserved {
            Ok(0) | Err(ApiError::InvalidId) => {
                info!(lesson_id = %order.lesson_id, quantity, "Order rejected: not enough inventory");
                return Err(ApiError::InsufficientInventory);
            }
            Ok(_) => {}
            Err(e) => {
                error!(lesson_id = %order.lesson_id, error = %e, "Failed to reserve inventory");
                return Err(ApiError::OrderFailed);
            }
        }

        match self
            .call("insert_order", self.gateway.insert(Collection::Orders, document))
            .await
        {
            Ok(stored) => {
                let id = stored
                    .get(ID_FIELD)
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string();
                info!(order_id = %id, lesson_id = %order.lesson_id, quantity, "Order placed");
                Ok(order.into_order(id))
            }
            // the insert may have committed before the timeout fired
            Err(ApiError::StorageTimeout(_)) => {
                error!(
                    lesson_id = %order.lesson_id,
                    quantity,
                    "Order insert timed out; order in doubt, reservation kept"
                );
                Err(ApiError::OrderFailed)
            }
            Err(e) => {
                error!(lesson_id = %order.lesson_id, error = %e, "Failed to insert order");
                self.release_inventory(&order).await;
                Err(ApiError::OrderFailed)
            }
        }
    }

    async fn release_inventory(&self, order: &NewOrder) {
        let quantity = i64::from(order.quantity);
        let released = self
            .call(
                "release_inventory",
                self.gateway.increment_field(
                    Collection::Lessons,
                    &order.lesson_id,
                    INVENTORY_FIELD,
                    quantity,
                    UpdateGuard::None,
                ),
            )
            .await;

        match released {
            Ok(1) => debug!(lesson_id = %order.lesson_id, quantity, "Released reserved inventory"),
            Ok(_) => warn!(lesson_id = %order.lesson_id, quantity, "Lesson vanished before inventory release"),
            Err(e) => error!(
                lesson_id = %order.lesson_id,
                quantity,
                error = %e,
                "Failed to release reserved inventory"
            ),
        }
    }
}

fn decode_lesson(document: Document) -> ApiResult<Lesson> {
    Lesson::from_document(document).map_err(|e| ApiError::Storage(StorageError::Serialization(e)))
}

fn encode_failed(err: serde_json::Error) -> ApiError {
    ApiError::Storage(StorageError::Serialization(err))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ValidationError;
    use crate::storage::DocumentStore;
    use serde_json::json;

    fn service() -> LessonService<DocumentStore> {
        LessonService::with_default_timeout(Arc::new(DocumentStore::in_memory()))
    }

    fn guitar(inventory: i64) -> CreateLessonRequest {
        serde_json::from_value(json!({
            "name": "Guitar",
            "image": "g.png",
            "price": 20,
            "availableInventory": inventory,
            "location": "Online",
            "rating": 4
        }))
        .unwrap()
    }

    fn order(lesson_id: &str, quantity: i64) -> PlaceOrderRequest {
        serde_json::from_value(json!({
            "lessonId": lesson_id,
            "quantity": quantity,
            "customerName": "A",
            "customerEmail": "a@x.com"
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn test_create_then_get() {
        let service = service();
        let created = service.create_lesson(guitar(5)).await.unwrap();
        let fetched = service.get_lesson(&created.id).await.unwrap();
        assert_eq!(created, fetched);
    }

    #[tokio::test]
    async fn test_invalid_lesson_not_stored() {
        let service = service();
        let err = service
            .create_lesson(CreateLessonRequest::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Validation(ValidationError::MissingFields)));
        assert!(service.list_lessons().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_order_decrements_inventory() {
        let service = service();
        let lesson = service.create_lesson(guitar(5)).await.unwrap();

        let placed = service.place_order(order(&lesson.id, 3)).await.unwrap();
        assert_eq!(placed.quantity, 3);
        assert_eq!(service.get_lesson(&lesson.id).await.unwrap().available_inventory, 2);

        let err = service.place_order(order(&lesson.id, 10)).await.unwrap_err();
        assert!(matches!(err, ApiError::InsufficientInventory));
        assert_eq!(service.get_lesson(&lesson.id).await.unwrap().available_inventory, 2);

        let orders = service.gateway().list(Collection::Orders).await.unwrap();
        assert_eq!(orders.len(), 1);
    }

    #[tokio::test]
    async fn test_order_for_malformed_lesson_id() {
        let err = service().place_order(order("bogus", 1)).await.unwrap_err();
        assert!(matches!(err, ApiError::InsufficientInventory));
    }

    #[tokio::test]
    async fn test_set_inventory_unknown_lesson() {
        let request: UpdateInventoryRequest =
            serde_json::from_value(json!({"availableInventory": 3})).unwrap();
        let missing = crate::storage::DocumentId::generate().to_string();
        let err = service().set_inventory(&missing, request).await.unwrap_err();
        assert!(matches!(err, ApiError::NotFound));
    }
}
