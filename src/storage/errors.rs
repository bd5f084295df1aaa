//! Storage error types
//!
//! Every variant surfaces to HTTP clients as a 500, except `InvalidId` which
//! callers map to their own validation error.

use std::io;

use thiserror::Error;

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Storage gateway errors
#[derive(Debug, Error)]
pub enum StorageError {
    /// Identifier does not parse as a document id
    #[error("Invalid document id: {0}")]
    InvalidId(String),

    /// Inserted or merged value is not a JSON object
    #[error("Document must be a JSON object")]
    NotAnObject,

    /// Increment target holds something other than an integer
    #[error("Field '{0}' is not an integer")]
    FieldNotInteger(String),

    /// Increment would leave the i64 range
    #[error("Field '{0}' would overflow")]
    IntegerOverflow(String),

    /// Snapshot on disk failed verification
    #[error("Snapshot corrupted: {0}")]
    Corrupted(String),

    /// Disk I/O failure
    #[error("Storage I/O error: {0}")]
    Io(#[from] io::Error),

    /// Snapshot encoding failure
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl StorageError {
    /// Whether the caller supplied a malformed id (as opposed to a storage fault)
    pub fn is_invalid_id(&self) -> bool {
        matches!(self, StorageError::InvalidId(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_id_classification() {
        assert!(StorageError::InvalidId("nope".to_string()).is_invalid_id());
        assert!(!StorageError::NotAnObject.is_invalid_id());
    }

    #[test]
    fn test_io_conversion() {
        let err: StorageError = io::Error::new(io::ErrorKind::Other, "disk gone").into();
        assert!(err.to_string().contains("disk gone"));
    }
}
