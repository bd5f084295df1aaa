//! Storage gateway contract
//!
//! Handlers and services depend only on [`StorageGateway`]. Documents are
//! plain JSON objects; the gateway owns the `_id` field.

use std::fmt;
use std::future::Future;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use super::errors::{StorageError, StorageResult};

/// Field holding the generated document identifier
pub const ID_FIELD: &str = "_id";

/// A stored record
pub type Document = Map<String, Value>;

/// Number of documents affected by an update
pub type MatchCount = u64;

/// Named record collections
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Collection {
    Lessons,
    Orders,
}

impl Collection {
    pub const ALL: [Collection; 2] = [Collection::Lessons, Collection::Orders];

    pub fn as_str(&self) -> &'static str {
        match self {
            Collection::Lessons => "lessons",
            Collection::Orders => "orders",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parsed document identifier
///
/// Ids are v4 UUIDs rendered in lowercase hyphenated form. Parsing
/// normalizes case so lookups match regardless of how the client spelled it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DocumentId(Uuid);

impl DocumentId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Whether `document` carries this id
    pub fn matches(&self, document: &Document) -> bool {
        document
            .get(ID_FIELD)
            .and_then(Value::as_str)
            .and_then(|raw| Uuid::parse_str(raw).ok())
            .is_some_and(|id| id == self.0)
    }
}

impl FromStr for DocumentId {
    type Err = StorageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s)
            .map(Self)
            .map_err(|_| StorageError::InvalidId(s.to_string()))
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

/// Precondition on an increment, checked against the field being incremented
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateGuard {
    /// Always apply
    None,
    /// Apply only when the current value is at least this much
    AtLeast(i64),
}

impl UpdateGuard {
    /// Whether a field currently holding `current` passes the guard
    pub fn admits(&self, current: Option<i64>) -> bool {
        match self {
            UpdateGuard::None => true,
            UpdateGuard::AtLeast(min) => current.is_some_and(|value| value >= *min),
        }
    }
}

/// Document database operations used by the service
///
/// Every method is atomic with respect to the others on the same gateway.
pub trait StorageGateway: Send + Sync + 'static {
    /// All documents in a collection, in insertion order
    fn list(
        &self,
        collection: Collection,
    ) -> impl Future<Output = StorageResult<Vec<Document>>> + Send;

    /// Fetch one document. Malformed ids fail with [`StorageError::InvalidId`].
    fn get_by_id(
        &self,
        collection: Collection,
        id: &str,
    ) -> impl Future<Output = StorageResult<Option<Document>>> + Send;

    /// Store a document under a freshly generated id and return it
    fn insert(
        &self,
        collection: Collection,
        document: Document,
    ) -> impl Future<Output = StorageResult<Document>> + Send;

    /// Merge `fields` into the matching document
    fn update_by_id(
        &self,
        collection: Collection,
        id: &str,
        fields: Document,
    ) -> impl Future<Output = StorageResult<MatchCount>> + Send;

    /// Add `delta` to an integer field if `guard` admits its current value
    fn increment_field(
        &self,
        collection: Collection,
        id: &str,
        field: &str,
        delta: i64,
        guard: UpdateGuard,
    ) -> impl Future<Output = StorageResult<MatchCount>> + Send;
}
