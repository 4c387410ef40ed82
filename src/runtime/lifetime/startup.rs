//! Application wiring
//!
//! Builds the storage backend, the link service and the logging sink from a
//! loaded configuration. Both the CLI and the server start from here.

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::config::StaticConfig;
use crate::services::{GeoIpProvider, LinkService, LinkSettings, LogSink};
use crate::storage::{BlobStorage, MappingStore, StorageFactory};
use crate::utils::{Clock, SystemClock};

/// Shared handles to the running application
#[derive(Clone)]
pub struct AppContext {
    pub storage: Arc<dyn BlobStorage>,
    pub link_service: Arc<LinkService>,
    pub log_sink: Arc<LogSink>,
}

impl AppContext {
    /// Production wiring: configured backend, wall clock, real network clients
    pub fn from_config(config: &StaticConfig) -> Result<Self> {
        let start_time = std::time::Instant::now();

        let storage =
            StorageFactory::create(&config.storage).context("Failed to create storage backend")?;
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);

        let store = Arc::new(MappingStore::new(storage.clone()));
        let geo = Arc::new(GeoIpProvider::new(&config.geo));
        let link_service = Arc::new(LinkService::new(
            store,
            geo,
            clock.clone(),
            LinkSettings::from(&config.features),
        ));
        let log_sink = Arc::new(LogSink::from_config(
            &config.log_sink,
            storage.clone(),
            clock,
        ));

        debug!("Application context ready in {:?}", start_time.elapsed());
        info!(
            "Storage: {} (data dir: {})",
            storage.backend_name(),
            config.storage.data_dir
        );

        Ok(Self {
            storage,
            link_service,
            log_sink,
        })
    }

    /// Assemble from already built parts
    pub fn new(
        storage: Arc<dyn BlobStorage>,
        link_service: Arc<LinkService>,
        log_sink: Arc<LogSink>,
    ) -> Self {
        Self {
            storage,
            link_service,
            log_sink,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_config_memory_backend() {
        let mut config = StaticConfig::default();
        config.storage.backend = "memory".to_string();
        config.geo.enabled = false;
        config.log_sink.enabled = false;

        let ctx = AppContext::from_config(&config).unwrap();
        assert_eq!(ctx.storage.backend_name(), "memory");
        assert!(ctx.link_service.list_all().is_empty());
    }

    #[test]
    fn test_from_config_unknown_backend() {
        let mut config = StaticConfig::default();
        config.storage.backend = "redis".to_string();
        assert!(AppContext::from_config(&config).is_err());
    }
}
