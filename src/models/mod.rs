//! Domain records and request bodies
//!
//! Request bodies deserialize every field as `Option` so a missing field and a
//! falsy-but-valid one (`0`, `false`) stay distinguishable. Validation turns a
//! request into the record that gets stored.

mod lesson;
mod order;

pub use lesson::{CreateLessonRequest, Lesson, NewLesson, UpdateInventoryRequest, INVENTORY_FIELD};
pub use order::{NewOrder, Order, PlaceOrderRequest};

use serde::Serialize;
use thiserror::Error;

use crate::storage::Document;

/// Request body rejected before touching storage
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Missing required fields")]
    MissingFields,

    #[error("{0}")]
    InvalidField(&'static str),

    #[error("availableInventory is required")]
    MissingInventory,

    #[error("Invalid quantity")]
    InvalidQuantity,
}

/// Text field that is present and not blank
fn present(value: Option<String>) -> Result<String, ValidationError> {
    match value {
        Some(s) if !s.trim().is_empty() => Ok(s),
        _ => Err(ValidationError::MissingFields),
    }
}

/// Encode a record as a storage document
fn to_document<T: Serialize>(record: &T) -> Result<Document, serde_json::Error> {
    match serde_json::to_value(record)? {
        serde_json::Value::Object(map) => Ok(map),
        other => Err(serde::ser::Error::custom(format!(
            "expected an object, got {other}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_present_rejects_blank() {
        assert_eq!(present(None), Err(ValidationError::MissingFields));
        assert_eq!(present(Some("   ".into())), Err(ValidationError::MissingFields));
        assert_eq!(present(Some("Art".into())), Ok("Art".to_string()));
    }
}
