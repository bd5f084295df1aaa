//! Document storage for lessonhub
//!
//! Everything above this module talks to the [`StorageGateway`] trait. The
//! only implementation shipped is [`DocumentStore`], selected by connection
//! string:
//!
//! - `memory://` keeps collections in process memory
//! - `file://<path>` additionally persists a checksummed snapshot after every
//!   committed write

mod document_store;
mod errors;
mod gateway;
mod snapshot;

pub use document_store::{DocumentStore, StoreLocation};
pub use errors::{StorageError, StorageResult};
pub use gateway::{
    Collection, Document, DocumentId, MatchCount, StorageGateway, UpdateGuard, ID_FIELD,
};
