use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{present, to_document, ValidationError};
use crate::storage::Document;

/// Field decremented by order placement
pub const INVENTORY_FIELD: &str = "availableInventory";

/// A purchasable lesson as stored and returned to clients
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lesson {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub image: String,
    pub price: f64,
    pub available_inventory: u64,
    pub location: String,
    pub rating: f64,
}

impl Lesson {
    pub fn from_document(document: Document) -> Result<Self, serde_json::Error> {
        serde_json::from_value(Value::Object(document))
    }
}

/// Validated lesson fields, ready to insert
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewLesson {
    pub name: String,
    pub image: String,
    pub price: f64,
    pub available_inventory: u64,
    pub location: String,
    pub rating: f64,
}

impl NewLesson {
    pub fn to_document(&self) -> Result<Document, serde_json::Error> {
        to_document(self)
    }
}

/// Body of `POST /lessons`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateLessonRequest {
    pub name: Option<String>,
    pub image: Option<String>,
    pub price: Option<f64>,
    pub available_inventory: Option<Value>,
    pub location: Option<String>,
    pub rating: Option<f64>,
}

impl CreateLessonRequest {
    /// Presence first, then ranges. Zero is a valid price, count and rating.
    pub fn validate(self) -> Result<NewLesson, ValidationError> {
        let (Some(price), Some(available_inventory), Some(rating)) =
            (self.price, self.available_inventory, self.rating)
        else {
            return Err(ValidationError::MissingFields);
        };
        let name = present(self.name)?;
        let image = present(self.image)?;
        let location = present(self.location)?;

        if !price.is_finite() || price < 0.0 {
            return Err(ValidationError::InvalidField(
                "price must be a non-negative number",
            ));
        }
        if !rating.is_finite() {
            return Err(ValidationError::InvalidField("rating must be a number"));
        }
        let available_inventory = inventory_count(&available_inventory)?;

        Ok(NewLesson {
            name,
            image,
            price,
            available_inventory,
            location,
            rating,
        })
    }
}

/// Body of `PUT /lessons/:id`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateInventoryRequest {
    pub available_inventory: Option<Value>,
}

impl UpdateInventoryRequest {
    pub fn validate(self) -> Result<u64, ValidationError> {
        let inventory = self
            .available_inventory
            .ok_or(ValidationError::MissingInventory)?;
        inventory_count(&inventory)
    }
}

/// Inventory is a whole, non-negative count
fn inventory_count(value: &Value) -> Result<u64, ValidationError> {
    value.as_u64().ok_or(ValidationError::InvalidField(
        "availableInventory must be a non-negative integer",
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn request(body: Value) -> CreateLessonRequest {
        serde_json::from_value(body).unwrap()
    }

    fn guitar() -> Value {
        json!({
            "name": "Guitar",
            "image": "g.png",
            "price": 20,
            "availableInventory": 5,
            "location": "Online",
            "rating": 4
        })
    }

    #[test]
    fn test_valid_lesson() {
        let lesson = request(guitar()).validate().unwrap();
        assert_eq!(lesson.name, "Guitar");
        assert_eq!(lesson.available_inventory, 5);
        assert_eq!(lesson.price, 20.0);
    }

    #[test]
    fn test_zero_values_are_not_missing() {
        let mut body = guitar();
        body["price"] = json!(0);
        body["availableInventory"] = json!(0);
        body["rating"] = json!(0);

        let lesson = request(body).validate().unwrap();
        assert_eq!(lesson.available_inventory, 0);
        assert_eq!(lesson.rating, 0.0);
    }

    #[test]
    fn test_each_missing_field_is_rejected() {
        for field in ["name", "image", "price", "availableInventory", "location", "rating"] {
            let mut body = guitar();
            body.as_object_mut().unwrap().remove(field);
            assert_eq!(
                request(body).validate(),
                Err(ValidationError::MissingFields),
                "{field}"
            );
        }
    }

    #[test]
    fn test_null_counts_as_missing() {
        let mut body = guitar();
        body["location"] = Value::Null;
        assert_eq!(request(body).validate(), Err(ValidationError::MissingFields));
    }

    #[test]
    fn test_negative_inventory_rejected() {
        let mut body = guitar();
        body["availableInventory"] = json!(-1);
        assert!(matches!(
            request(body).validate(),
            Err(ValidationError::InvalidField(_))
        ));
    }

    #[test]
    fn test_lesson_serializes_camel_case() {
        let lesson = Lesson {
            id: "abc".to_string(),
            name: "Guitar".to_string(),
            image: "g.png".to_string(),
            price: 20.0,
            available_inventory: 5,
            location: "Online".to_string(),
            rating: 4.0,
        };
        let value = serde_json::to_value(&lesson).unwrap();
        assert_eq!(value["_id"], "abc");
        assert_eq!(value["availableInventory"], 5);
        assert!(value.get("available_inventory").is_none());
    }

    #[test]
    fn test_update_inventory_accepts_zero() {
        let req: UpdateInventoryRequest =
            serde_json::from_value(json!({"availableInventory": 0})).unwrap();
        assert_eq!(req.validate(), Ok(0));

        let req: UpdateInventoryRequest = serde_json::from_value(json!({})).unwrap();
        assert_eq!(req.validate(), Err(ValidationError::MissingInventory));
    }

    #[test]
    fn test_update_inventory_rejects_negative_and_fractional() {
        for inventory in [json!(-1), json!(1.5), json!("7")] {
            let req: UpdateInventoryRequest =
                serde_json::from_value(json!({ "availableInventory": inventory })).unwrap();
            assert!(
                matches!(req.validate(), Err(ValidationError::InvalidField(_))),
                "{inventory}"
            );
        }
    }
}
