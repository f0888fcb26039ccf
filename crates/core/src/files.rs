//! The file-storage boundary.
//!
//! The agent service treats uploaded files as opaque blobs keyed by
//! id. [`MemoryStore`] is the default in-process backend; persistent
//! backends implement [`FileStore`] behind the same trait.

use anyhow::Result;
use async_trait::async_trait;
use compact_str::CompactString;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Metadata for an uploaded file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileInfo {
    /// Unique file identifier.
    pub id: CompactString,
    /// Original filename.
    pub filename: String,
    /// Size in bytes.
    pub bytes: u64,
    /// Processing status.
    pub status: FileStatus,
}

/// Status of an uploaded file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileStatus {
    /// The file is stored and readable.
    Ready,
    /// The file could not be processed.
    Failed,
}

/// An opaque blob store keyed by file id.
#[async_trait]
pub trait FileStore: Send + Sync {
    /// Store a file and return its metadata.
    async fn upload(&self, filename: &str, data: Vec<u8>) -> Result<FileInfo>;

    /// Get metadata for a file.
    async fn get(&self, id: &str) -> Result<FileInfo>;

    /// List all stored files.
    async fn list(&self) -> Result<Vec<FileInfo>>;

    /// Delete a file.
    async fn delete(&self, id: &str) -> Result<()>;

    /// Get the text content of a file.
    async fn content(&self, id: &str) -> Result<String>;
}

struct StoredFile {
    info: FileInfo,
    data: Vec<u8>,
}

/// In-memory file store.
#[derive(Default)]
pub struct MemoryStore {
    files: Mutex<BTreeMap<CompactString, StoredFile>>,
}

impl MemoryStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl FileStore for MemoryStore {
    async fn upload(&self, filename: &str, data: Vec<u8>) -> Result<FileInfo> {
        let id = CompactString::new(uuid::Uuid::new_v4().to_string());
        let info = FileInfo {
            id: id.clone(),
            filename: filename.to_string(),
            bytes: data.len() as u64,
            status: FileStatus::Ready,
        };
        self.files.lock().insert(
            id,
            StoredFile {
                info: info.clone(),
                data,
            },
        );
        Ok(info)
    }

    async fn get(&self, id: &str) -> Result<FileInfo> {
        self.files
            .lock()
            .get(id)
            .map(|f| f.info.clone())
            .ok_or_else(|| anyhow::anyhow!("file '{id}' not found"))
    }

    async fn list(&self) -> Result<Vec<FileInfo>> {
        Ok(self.files.lock().values().map(|f| f.info.clone()).collect())
    }

    async fn delete(&self, id: &str) -> Result<()> {
        self.files
            .lock()
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| anyhow::anyhow!("file '{id}' not found"))
    }

    async fn content(&self, id: &str) -> Result<String> {
        let files = self.files.lock();
        let file = files
            .get(id)
            .ok_or_else(|| anyhow::anyhow!("file '{id}' not found"))?;
        String::from_utf8(file.data.clone())
            .map_err(|_| anyhow::anyhow!("file '{}' is not valid UTF-8 text", file.info.filename))
    }
}
