//! Record set storage.
//!
//! Each store persists its whole record set at once: `read` returns every
//! record, `write` replaces every record. Stores build their
//! read-modify-write cycle on top of this.

use std::marker::PhantomData;
use std::path::PathBuf;

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use tokio::sync::RwLock;

use crate::errors::StorageError;

/// Full record set read/write.
#[async_trait]
pub trait RecordStorage<T>: Send + Sync {
    /// Read the entire ordered record set.
    async fn read(&self) -> Result<Vec<T>, StorageError>;

    /// Replace the entire record set.
    async fn write(&self, records: &[T]) -> Result<(), StorageError>;
}

/// Record set kept as a pretty-printed JSON array in a single file.
///
/// The file is rewritten in place; a crash mid-write can leave it truncated.
pub struct JsonFileStorage<T> {
    path: PathBuf,
    _records: PhantomData<fn() -> T>,
}

impl<T> JsonFileStorage<T> {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            _records: PhantomData,
        }
    }
}

#[async_trait]
impl<T> RecordStorage<T> for JsonFileStorage<T>
where
    T: Serialize + DeserializeOwned + Send + Sync,
{
    async fn read(&self) -> Result<Vec<T>, StorageError> {
        let data = match tokio::fs::read(&self.path).await {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "Record file missing, starting empty");
                return Ok(Vec::new());
            }
            Err(e) => return Err(e.into()),
        };

        if data.iter().all(u8::is_ascii_whitespace) {
            return Ok(Vec::new());
        }

        Ok(serde_json::from_slice(&data)?)
    }

    async fn write(&self, records: &[T]) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        let data = serde_json::to_vec_pretty(records)?;
        tokio::fs::write(&self.path, data).await?;
        Ok(())
    }
}

/// In-memory record set, used by tests and ephemeral runs.
pub struct MemoryStorage<T> {
    records: RwLock<Vec<T>>,
}

impl<T> MemoryStorage<T> {
    pub fn new() -> Self {
        Self::with_records(Vec::new())
    }

    pub fn with_records(records: Vec<T>) -> Self {
        Self {
            records: RwLock::new(records),
        }
    }
}

impl<T> Default for MemoryStorage<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<T> RecordStorage<T> for MemoryStorage<T>
where
    T: Clone + Send + Sync,
{
    async fn read(&self) -> Result<Vec<T>, StorageError> {
        Ok(self.records.read().await.clone())
    }

    async fn write(&self, records: &[T]) -> Result<(), StorageError> {
        *self.records.write().await = records.to_vec();
        Ok(())
    }
}
