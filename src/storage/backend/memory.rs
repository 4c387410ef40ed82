use std::collections::HashMap;

use parking_lot::RwLock;

use super::BlobStorage;
use crate::errors::Result;

/// Process-local backend, nothing survives a restart
#[derive(Default)]
pub struct MemoryBlobStorage {
    items: RwLock<HashMap<String, String>>,
}

impl MemoryBlobStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl BlobStorage for MemoryBlobStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        Ok(self.items.read().get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        self.items.write().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        self.items.write().remove(key);
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
