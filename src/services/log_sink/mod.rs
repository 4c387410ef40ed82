//! Structured logging sink
//!
//! Ships `{stack, level, package, message}` records to a remote collector.
//! Any delivery failure (network error, non-2xx status) is absorbed by
//! appending the record to the local queue. Only an argument outside its
//! enumerated set is reported to the caller.

mod queue;
mod transport;

use std::sync::Arc;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString, IntoEnumIterator};
use tracing::{debug, warn};

pub use queue::{LOG_QUEUE_KEY, LocalLogQueue};
pub use transport::{HttpLogTransport, LogTransport, TransportError};

use crate::config::LogSinkConfig;
use crate::errors::{Result, ShortboxError};
use crate::storage::BlobStorage;
use crate::utils::Clock;

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Stack {
    Backend,
    Frontend,
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Level {
    Debug,
    Info,
    Warn,
    Error,
    Fatal,
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Package {
    Api,
    Component,
    Hook,
    Page,
    State,
    Style,
    Auth,
    Config,
    Middleware,
    Utils,
}

/// Body sent to the collector
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogRecord {
    pub stack: Stack,
    pub level: Level,
    pub package: Package,
    pub message: String,
}

impl LogRecord {
    /// Parse raw arguments; matching is case-insensitive
    pub fn parse(stack: &str, level: &str, package: &str, message: &str) -> Result<Self> {
        let stack: Stack = stack.trim().parse().map_err(|_| {
            ShortboxError::invalid_log_argument(format!(
                "Invalid stack: {}. Must be 'backend' or 'frontend'.",
                stack
            ))
        })?;
        let level: Level = level.trim().parse().map_err(|_| {
            ShortboxError::invalid_log_argument(format!(
                "Invalid level: {}. Must be one of: {}.",
                level,
                joined::<Level>()
            ))
        })?;
        let package: Package = package.trim().parse().map_err(|_| {
            ShortboxError::invalid_log_argument(format!(
                "Invalid package: {}. Must be one of: {}.",
                package,
                joined::<Package>()
            ))
        })?;

        Ok(Self {
            stack,
            level,
            package,
            message: message.to_string(),
        })
    }
}

fn joined<E: IntoEnumIterator + AsRef<str>>() -> String {
    E::iter()
        .map(|v| v.as_ref().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Record kept in the local queue
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueuedLog {
    pub stack: Stack,
    pub level: Level,
    pub package: Package,
    pub message: String,
    /// RFC 3339, UTC, millisecond precision
    pub timestamp: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum LogOutcome {
    Delivered,
    Queued,
}

pub struct LogSink {
    /// `None` when remote shipping is disabled
    transport: Option<Arc<dyn LogTransport>>,
    queue: LocalLogQueue,
    clock: Arc<dyn Clock>,
}

impl LogSink {
    pub fn new(
        transport: Option<Arc<dyn LogTransport>>,
        storage: Arc<dyn BlobStorage>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            transport,
            queue: LocalLogQueue::new(storage),
            clock,
        }
    }

    pub fn from_config(
        config: &LogSinkConfig,
        storage: Arc<dyn BlobStorage>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let transport: Option<Arc<dyn LogTransport>> = if config.enabled {
            Some(Arc::new(HttpLogTransport::new(config)))
        } else {
            debug!("Remote log shipping disabled, records go to the local queue");
            None
        };
        Self::new(transport, storage, clock)
    }

    /// Validate and ship one record
    pub fn log(&self, stack: &str, level: &str, package: &str, message: &str) -> Result<LogOutcome> {
        let record = LogRecord::parse(stack, level, package, message)?;
        Ok(self.send(record))
    }

    /// Ship an already typed record; never fails
    pub fn send(&self, record: LogRecord) -> LogOutcome {
        if let Some(ref transport) = self.transport {
            match transport.send(&record) {
                Ok(()) => return LogOutcome::Delivered,
                Err(e) => warn!("Log delivery via {} failed: {}", transport.name(), e),
            }
        }

        let queued = QueuedLog {
            stack: record.stack,
            level: record.level,
            package: record.package,
            message: record.message,
            timestamp: self.timestamp(),
        };
        if let Err(e) = self.queue.append(queued) {
            warn!("Failed to append to local log queue: {}", e);
        }
        LogOutcome::Queued
    }

    pub fn queued(&self) -> Vec<QueuedLog> {
        self.queue.entries()
    }

    pub fn clear_queue(&self) -> Result<usize> {
        self.queue.clear()
    }

    fn timestamp(&self) -> String {
        let ms = self.clock.now_millis();
        DateTime::<Utc>::from_timestamp_millis(ms)
            .unwrap_or_else(Utc::now)
            .to_rfc3339_opts(SecondsFormat::Millis, true)
    }
}
