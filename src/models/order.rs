use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{present, to_document, ValidationError};
use crate::storage::Document;

/// A placed order as stored
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    #[serde(rename = "_id")]
    pub id: String,
    pub lesson_id: String,
    pub quantity: u32,
    pub customer_name: String,
    pub customer_email: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewOrder {
    pub lesson_id: String,
    pub quantity: u32,
    pub customer_name: String,
    pub customer_email: String,
}

impl NewOrder {
    pub fn to_document(&self) -> Result<Document, serde_json::Error> {
        to_document(self)
    }

    pub fn into_order(self, id: String) -> Order {
        Order {
            id,
            lesson_id: self.lesson_id,
            quantity: self.quantity,
            customer_name: self.customer_name,
            customer_email: self.customer_email,
        }
    }
}

/// Body of `POST /orders`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceOrderRequest {
    pub lesson_id: Option<String>,
    pub quantity: Option<Value>,
    pub customer_name: Option<String>,
    pub customer_email: Option<String>,
}

impl PlaceOrderRequest {
    pub fn validate(self) -> Result<NewOrder, ValidationError> {
        let quantity = self.quantity.ok_or(ValidationError::MissingFields)?;
        let lesson_id = present(self.lesson_id)?;
        let customer_name = present(self.customer_name)?;
        let customer_email = present(self.customer_email)?;

        // zero-quantity orders are meaningless
        let quantity = quantity
            .as_u64()
            .and_then(|q| u32::try_from(q).ok())
            .filter(|q| *q > 0)
            .ok_or(ValidationError::InvalidQuantity)?;

        Ok(NewOrder {
            lesson_id,
            quantity,
            customer_name,
            customer_email,
        })
    }
}
