//! Document store
//!
//! The shipped [`StorageGateway`]. Collections live in memory behind an async
//! reader/writer lock; when opened on a file every committed write is also
//! persisted as a snapshot before it becomes visible to readers.

use std::fmt;
use std::path::PathBuf;

use serde_json::Value;
use tokio::sync::RwLock;
use tracing::debug;

use super::errors::{StorageError, StorageResult};
use super::gateway::{
    Collection, Document, DocumentId, MatchCount, StorageGateway, UpdateGuard, ID_FIELD,
};
use super::snapshot::{Collections, SnapshotFile};

/// Where a store keeps its data, parsed from a connection string
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreLocation {
    /// `memory://`
    Memory,
    /// `file://<path>`
    File(PathBuf),
}

impl StoreLocation {
    /// Parse a `memory://` or `file://<path>` connection string
    pub fn parse(url: &str) -> Option<Self> {
        let url = url.trim();
        if url == "memory://" || url == "memory" {
            return Some(StoreLocation::Memory);
        }
        match url.strip_prefix("file://") {
            Some(path) if !path.is_empty() => Some(StoreLocation::File(PathBuf::from(path))),
            _ => None,
        }
    }
}

impl fmt::Display for StoreLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreLocation::Memory => f.write_str("memory://"),
            StoreLocation::File(path) => write!(f, "file://{}", path.display()),
        }
    }
}

/// In-memory document store with optional snapshot persistence
pub struct DocumentStore {
    collections: RwLock<Collections>,
    snapshot: Option<SnapshotFile>,
}

impl DocumentStore {
    pub fn in_memory() -> Self {
        Self {
            collections: RwLock::new(Collections::default()),
            snapshot: None,
        }
    }

    /// Open a store backed by a snapshot file, loading whatever it holds
    pub async fn open_file(path: impl Into<PathBuf>) -> StorageResult<Self> {
        let snapshot = SnapshotFile::new(path);
        let collections = snapshot.load().await?;
        Ok(Self {
            collections: RwLock::new(collections),
            snapshot: Some(snapshot),
        })
    }

    pub async fn open(location: &StoreLocation) -> StorageResult<Self> {
        match location {
            StoreLocation::Memory => Ok(Self::in_memory()),
            StoreLocation::File(path) => Self::open_file(path.clone()).await,
        }
    }

    /// Apply a mutation under the write lock.
    ///
    /// With a snapshot attached the mutation runs on a staged copy which only
    /// replaces the live set once it is on disk.
    async fn write<T, F>(&self, apply: F) -> StorageResult<T>
    where
        F: FnOnce(&mut Collections) -> StorageResult<T>,
    {
        let mut live = self.collections.write().await;
        match &self.snapshot {
            None => apply(&mut *live),
            Some(snapshot) => {
                let mut staged = live.clone();
                let out = apply(&mut staged)?;
                snapshot.write(&staged).await?;
                *live = staged;
                Ok(out)
            }
        }
    }
}

fn find_mut<'a>(documents: &'a mut [Document], id: &DocumentId) -> Option<&'a mut Document> {
    documents.iter_mut().find(|doc| id.matches(doc))
}

impl StorageGateway for DocumentStore {
    async fn list(&self, collection: Collection) -> StorageResult<Vec<Document>> {
        let collections = self.collections.read().await;
        Ok(collections.get(collection).to_vec())
    }

    async fn get_by_id(&self, collection: Collection, id: &str) -> StorageResult<Option<Document>> {
        let id: DocumentId = id.parse()?;
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .iter()
            .find(|doc| id.matches(doc))
            .cloned())
    }

    async fn insert(&self, collection: Collection, document: Document) -> StorageResult<Document> {
        let mut document = document;
        let id = DocumentId::generate();
        document.insert(ID_FIELD.to_string(), Value::String(id.to_string()));

        let stored = self
            .write(|collections| {
                collections.get_mut(collection).push(document.clone());
                Ok(document)
            })
            .await?;

        debug!(%collection, %id, "Inserted document");
        Ok(stored)
    }

    async fn update_by_id(
        &self,
        collection: Collection,
        id: &str,
        fields: Document,
    ) -> StorageResult<MatchCount> {
        let id: DocumentId = id.parse()?;

        self.write(|collections| {
            let Some(doc) = find_mut(collections.get_mut(collection), &id) else {
                return Ok(0);
            };
            for (key, value) in fields {
                if key != ID_FIELD {
                    doc.insert(key, value);
                }
            }
            Ok(1)
        })
        .await
    }

    async fn increment_field(
        &self,
        collection: Collection,
        id: &str,
        field: &str,
        delta: i64,
        guard: UpdateGuard,
    ) -> StorageResult<MatchCount> {
        let id: DocumentId = id.parse()?;

        self.write(|collections| {
            let Some(doc) = find_mut(collections.get_mut(collection), &id) else {
                return Ok(0);
            };

            let current = match doc.get(field) {
                None => None,
                Some(value) => Some(
                    value
                        .as_i64()
                        .ok_or_else(|| StorageError::FieldNotInteger(field.to_string()))?,
                ),
            };
            if !guard.admits(current) {
                return Ok(0);
            }

            let next = current
                .unwrap_or(0)
                .checked_add(delta)
                .ok_or_else(|| StorageError::IntegerOverflow(field.to_string()))?;
            doc.insert(field.to_string(), Value::from(next));
            Ok(1)
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(value: Value) -> Document {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_parse_location() {
        assert_eq!(StoreLocation::parse("memory://"), Some(StoreLocation::Memory));
        assert_eq!(
            StoreLocation::parse("file:///var/lib/lessons.db"),
            Some(StoreLocation::File(PathBuf::from("/var/lib/lessons.db")))
        );
        assert_eq!(StoreLocation::parse("file://"), None);
        assert_eq!(StoreLocation::parse("mongodb://localhost"), None);
    }

    #[tokio::test]
    async fn test_insert_assigns_fresh_id() {
        let store = DocumentStore::in_memory();
        let stored = store
            .insert(Collection::Lessons, doc(json!({"_id": "mine", "name": "Art"})))
            .await
            .unwrap();

        let id = stored["_id"].as_str().unwrap();
        assert_ne!(id, "mine");
        assert!(id.parse::<DocumentId>().is_ok());
    }

    #[tokio::test]
    async fn test_list_keeps_insertion_order() {
        let store = DocumentStore::in_memory();
        for name in ["Art", "Music", "Chess"] {
            store
                .insert(Collection::Lessons, doc(json!({ "name": name })))
                .await
                .unwrap();
        }

        let names: Vec<_> = store
            .list(Collection::Lessons)
            .await
            .unwrap()
            .into_iter()
            .map(|d| d["name"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(names, ["Art", "Music", "Chess"]);
        assert!(store.list(Collection::Orders).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_get_by_id_rejects_malformed_id() {
        let store = DocumentStore::in_memory();
        let err = store.get_by_id(Collection::Lessons, "123").await.unwrap_err();
        assert!(err.is_invalid_id());
    }

    #[tokio::test]
    async fn test_update_merges_and_protects_id() {
        let store = DocumentStore::in_memory();
        let stored = store
            .insert(Collection::Lessons, doc(json!({"name": "Art", "availableInventory": 4})))
            .await
            .unwrap();
        let id = stored["_id"].as_str().unwrap().to_string();

        let matched = store
            .update_by_id(
                Collection::Lessons,
                &id,
                doc(json!({"availableInventory": 0, "_id": "hijack"})),
            )
            .await
            .unwrap();
        assert_eq!(matched, 1);

        let fetched = store.get_by_id(Collection::Lessons, &id).await.unwrap().unwrap();
        assert_eq!(fetched["availableInventory"], 0);
        assert_eq!(fetched["name"], "Art");
        assert_eq!(fetched["_id"], id.as_str());
    }

    #[tokio::test]
    async fn test_update_unknown_id_matches_nothing() {
        let store = DocumentStore::in_memory();
        let missing = DocumentId::generate().to_string();
        let matched = store
            .update_by_id(Collection::Lessons, &missing, doc(json!({"x": 1})))
            .await
            .unwrap();
        assert_eq!(matched, 0);
    }

    #[tokio::test]
    async fn test_guarded_increment() {
        let store = DocumentStore::in_memory();
        let stored = store
            .insert(Collection::Lessons, doc(json!({"availableInventory": 5})))
            .await
            .unwrap();
        let id = stored["_id"].as_str().unwrap().to_string();

        let field = "availableInventory";
        assert_eq!(
            store
                .increment_field(Collection::Lessons, &id, field, -3, UpdateGuard::AtLeast(3))
                .await
                .unwrap(),
            1
        );
        assert_eq!(
            store
                .increment_field(Collection::Lessons, &id, field, -3, UpdateGuard::AtLeast(3))
                .await
                .unwrap(),
            0
        );

        let fetched = store.get_by_id(Collection::Lessons, &id).await.unwrap().unwrap();
        assert_eq!(fetched[field], 2);
    }

    #[tokio::test]
    async fn test_increment_non_integer_field_fails() {
        let store = DocumentStore::in_memory();
        let stored = store
            .insert(Collection::Lessons, doc(json!({"price": "cheap"})))
            .await
            .unwrap();
        let id = stored["_id"].as_str().unwrap().to_string();

        let err = store
            .increment_field(Collection::Lessons, &id, "price", 1, UpdateGuard::None)
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::FieldNotInteger(_)));
    }
}
