//! On-disk snapshot of every collection
//!
//! Layout: one header line holding the CRC32 of the body as 8 lowercase hex
//! digits, then the JSON body. A checksum mismatch is always an error;
//! corruption is never papered over with an empty store.
//!
//! Writes go to `<path>.tmp` and are renamed into place so a crash mid-write
//! leaves the previous snapshot intact.

use std::io::ErrorKind;
use std::path::PathBuf;

use crc32fast::Hasher;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::errors::{StorageError, StorageResult};
use super::gateway::{Collection, Document};

/// In-memory working set of the document store
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Collections {
    #[serde(default)]
    lessons: Vec<Document>,
    #[serde(default)]
    orders: Vec<Document>,
}

impl Collections {
    pub fn get(&self, collection: Collection) -> &[Document] {
        match collection {
            Collection::Lessons => &self.lessons,
            Collection::Orders => &self.orders,
        }
    }

    pub fn get_mut(&mut self, collection: Collection) -> &mut Vec<Document> {
        match collection {
            Collection::Lessons => &mut self.lessons,
            Collection::Orders => &mut self.orders,
        }
    }
}

fn checksum(data: &[u8]) -> u32 {
    let mut hasher = Hasher::new();
    hasher.update(data);
    hasher.finalize()
}

/// Serialize collections into the snapshot layout
pub fn encode(collections: &Collections) -> StorageResult<Vec<u8>> {
    let body = serde_json::to_vec(collections)?;
    let mut out = format!("{:08x}\n", checksum(&body)).into_bytes();
    out.extend_from_slice(&body);
    Ok(out)
}

/// Verify and parse a snapshot
pub fn decode(bytes: &[u8]) -> StorageResult<Collections> {
    let newline = bytes
        .iter()
        .position(|b| *b == b'\n')
        .ok_or_else(|| StorageError::Corrupted("missing checksum header".to_string()))?;
    let (header, body) = (&bytes[..newline], &bytes[newline + 1..]);

    let expected = std::str::from_utf8(header)
        .ok()
        .and_then(|h| u32::from_str_radix(h.trim(), 16).ok())
        .ok_or_else(|| StorageError::Corrupted("unreadable checksum header".to_string()))?;

    let actual = checksum(body);
    if actual != expected {
        return Err(StorageError::Corrupted(format!(
            "checksum mismatch: expected {expected:08x}, found {actual:08x}"
        )));
    }

    serde_json::from_slice(body).map_err(|e| StorageError::Corrupted(e.to_string()))
}

/// Snapshot file backing a document store
#[derive(Debug, Clone)]
pub struct SnapshotFile {
    path: PathBuf,
}

impl SnapshotFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn staging_path(&self) -> PathBuf {
        let mut staging = self.path.clone().into_os_string();
        staging.push(".tmp");
        PathBuf::from(staging)
    }

    /// Read the snapshot, or an empty working set if none exists yet
    pub async fn load(&self) -> StorageResult<Collections> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        match tokio::fs::read(&self.path).await {
            Ok(bytes) => {
                let collections = decode(&bytes)?;
                info!(
                    path = %self.path.display(),
                    lessons = collections.get(Collection::Lessons).len(),
                    orders = collections.get(Collection::Orders).len(),
                    "Loaded snapshot"
                );
                Ok(collections)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!(path = %self.path.display(), "No snapshot found, starting empty");
                Ok(Collections::default())
            }
            Err(e) => Err(e.into()),
        }
    }

    pub async fn write(&self, collections: &Collections) -> StorageResult<()> {
        let bytes = encode(collections)?;
        let staging = self.staging_path();

        tokio::fs::write(&staging, &bytes).await?;
        tokio::fs::rename(&staging, &self.path).await?;

        debug!(path = %self.path.display(), bytes = bytes.len(), "Snapshot written");
        Ok(())
    }
}
