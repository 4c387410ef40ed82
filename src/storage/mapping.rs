//! Mapping store
//!
//! The whole shortcode → entry map lives in one JSON blob under
//! [`MAPPINGS_KEY`]. Callers always read-modify-write the full structure;
//! there is no partial or merge update.
//!
//! Within one process `update` holds a single-writer lock across the
//! read-modify-write cycle. Separate processes sharing a data directory are
//! not coordinated: the last `save` wins.

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, warn};

use super::backend::BlobStorage;
use super::models::{Click, Entry, Mapping};
use crate::errors::{Result, ShortboxError};

/// Storage key of the mapping blob
pub const MAPPINGS_KEY: &str = "urlMappings";

pub struct MappingStore {
    backend: Arc<dyn BlobStorage>,
    write_lock: Mutex<()>,
}

impl MappingStore {
    pub fn new(backend: Arc<dyn BlobStorage>) -> Self {
        Self {
            backend,
            write_lock: Mutex::new(()),
        }
    }

    /// Current persisted mapping
    ///
    /// A missing, unreadable or unparsable blob yields an empty mapping.
    pub fn load(&self) -> Mapping {
        self.try_load().unwrap_or_else(|e| {
            warn!("Failed to read mappings, treating store as empty: {}", e);
            Mapping::new()
        })
    }

    /// Like [`MappingStore::load`], but a backend read error is returned
    ///
    /// Missing and corrupt blobs still read as empty.
    pub fn try_load(&self) -> Result<Mapping> {
        let raw = match self.backend.get_item(MAPPINGS_KEY)? {
            Some(raw) => raw,
            None => return Ok(Mapping::new()),
        };

        match serde_json::from_str::<Mapping>(&raw) {
            Ok(mut mapping) => {
                for (code, entry) in mapping.iter_mut() {
                    if entry.shortcode != *code {
                        entry.shortcode = code.clone();
                    }
                }
                Ok(mapping)
            }
            Err(e) => {
                warn!("Stored mappings are corrupt, treating store as empty: {}", e);
                Ok(Mapping::new())
            }
        }
    }

    /// Persist the full mapping, replacing whatever was stored
    pub fn save(&self, mapping: &Mapping) -> Result<()> {
        let json = serde_json::to_string(mapping)?;
        self.backend.set_item(MAPPINGS_KEY, &json)?;
        debug!("Mappings saved ({} entries)", mapping.len());
        Ok(())
    }

    /// Read-modify-write under the writer lock
    ///
    /// The mapping is saved only when `f` returns `Ok`; an error leaves the
    /// stored blob untouched. A failed read aborts before `f` runs, so an
    /// unreadable store is never overwritten.
    pub fn update<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Mapping) -> Result<T>,
    {
        let _guard = self.write_lock.lock();
        let mut mapping = self.try_load()?;
        let value = f(&mut mapping)?;
        self.save(&mapping)?;
        Ok(value)
    }

    pub fn get(&self, shortcode: &str) -> Option<Entry> {
        self.load().remove(shortcode)
    }

    pub fn contains(&self, shortcode: &str) -> bool {
        self.load().contains_key(shortcode)
    }

    /// Append one click to an existing entry
    pub fn add_click(&self, shortcode: &str, click: Click) -> Result<()> {
        self.update(|mapping| match mapping.get_mut(shortcode) {
            Some(entry) => {
                entry.clicks.push(click);
                Ok(())
            }
            None => Err(ShortboxError::not_found(format!(
                "Shortcode not found for click: {}",
                shortcode
            ))),
        })
    }

    pub fn backend_name(&self) -> &'static str {
        self.backend.backend_name()
    }
}
