//! Blob storage backends
//!
//! A backend is a string-keyed store of string blobs, the same shape as a
//! browser's `localStorage`. Everything persisted by shortbox (the mapping
//! blob and the local log queue) goes through this trait.

mod file;
mod memory;

use std::sync::Arc;

use tracing::info;

pub use file::FileBlobStorage;
pub use memory::MemoryBlobStorage;

use crate::config::StorageConfig;
use crate::errors::{Result, ShortboxError};

pub trait BlobStorage: Send + Sync {
    /// `Ok(None)` when the key has never been written
    fn get_item(&self, key: &str) -> Result<Option<String>>;
    /// Overwrites any previous value
    fn set_item(&self, key: &str, value: &str) -> Result<()>;
    fn remove_item(&self, key: &str) -> Result<()>;
    fn backend_name(&self) -> &'static str;
}

pub struct StorageFactory;

impl StorageFactory {
    pub fn create(config: &StorageConfig) -> Result<Arc<dyn BlobStorage>> {
        let storage: Arc<dyn BlobStorage> = match config.backend.as_str() {
            "file" => Arc::new(FileBlobStorage::new(&config.data_dir)?),
            "memory" => Arc::new(MemoryBlobStorage::new()),
            other => {
                return Err(ShortboxError::config(format!(
                    "Unknown storage backend '{}'. Valid: file, memory",
                    other
                )));
            }
        };

        info!("Using storage backend: {}", storage.backend_name());
        Ok(storage)
    }
}

/// Keys end up as file names, so only a conservative character set is allowed
pub(crate) fn is_valid_storage_key(key: &str) -> bool {
    !key.is_empty()
        && key.len() <= 64
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}
