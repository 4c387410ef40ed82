//! Local fallback queue
//!
//! A JSON array under the storage key [`LOG_QUEUE_KEY`]. Records only pile
//! up here; nothing drains them automatically.

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::warn;

use super::QueuedLog;
use crate::errors::Result;
use crate::storage::BlobStorage;

pub const LOG_QUEUE_KEY: &str = "logs";

pub struct LocalLogQueue {
    backend: Arc<dyn BlobStorage>,
    write_lock: Mutex<()>,
}

impl LocalLogQueue {
    pub fn new(backend: Arc<dyn BlobStorage>) -> Self {
        Self {
            backend,
            write_lock: Mutex::new(()),
        }
    }

    /// Queued records, oldest first; a corrupt or unreadable queue reads as empty
    pub fn entries(&self) -> Vec<QueuedLog> {
        self.try_entries().unwrap_or_else(|e| {
            warn!("Failed to read local log queue: {}", e);
            Vec::new()
        })
    }

    /// Backend read errors are returned, a corrupt queue still reads as empty
    pub fn try_entries(&self) -> Result<Vec<QueuedLog>> {
        match self.backend.get_item(LOG_QUEUE_KEY)? {
            Some(raw) => Ok(serde_json::from_str(&raw).unwrap_or_else(|e| {
                warn!("Local log queue is corrupt, treating it as empty: {}", e);
                Vec::new()
            })),
            None => Ok(Vec::new()),
        }
    }

    /// Append one record; a failed read leaves the stored queue untouched
    pub fn append(&self, record: QueuedLog) -> Result<()> {
        let _guard = self.write_lock.lock();
        let mut entries = self.try_entries()?;
        entries.push(record);
        let json = serde_json::to_string(&entries)?;
        self.backend.set_item(LOG_QUEUE_KEY, &json)
    }

    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop everything; returns how many records were removed
    pub fn clear(&self) -> Result<usize> {
        let _guard = self.write_lock.lock();
        let count = self.entries().len();
        self.backend.remove_item(LOG_QUEUE_KEY)?;
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::log_sink::{Level, Package, Stack};
    use crate::storage::MemoryBlobStorage;

    fn record(message: &str) -> QueuedLog {
        QueuedLog {
            stack: Stack::Frontend,
            level: Level::Warn,
            package: Package::Component,
            message: message.to_string(),
            timestamp: "2024-01-01T00:00:00.000Z".to_string(),
        }
    }

    #[test]
    fn test_append_and_clear() {
        let queue = LocalLogQueue::new(Arc::new(MemoryBlobStorage::new()));
        assert!(queue.is_empty());

        queue.append(record("one")).unwrap();
        queue.append(record("two")).unwrap();
        let entries = queue.entries();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].message, "one");
        assert_eq!(entries[1].message, "two");

        assert_eq!(queue.clear().unwrap(), 2);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_corrupt_queue_reads_empty_and_recovers() {
        let backend = Arc::new(MemoryBlobStorage::new());
        backend.set_item(LOG_QUEUE_KEY, "{oops").unwrap();
        let queue = LocalLogQueue::new(backend);
        assert!(queue.entries().is_empty());

        queue.append(record("after")).unwrap();
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn test_wire_format() {
        let json = serde_json::to_value(record("m")).unwrap();
        assert_eq!(json["stack"], "frontend");
        assert_eq!(json["level"], "warn");
        assert_eq!(json["package"], "component");
        assert_eq!(json["timestamp"], "2024-01-01T00:00:00.000Z");
    }
}
