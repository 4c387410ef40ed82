//! Service layer
//!
//! Business logic shared by the CLI and the HTTP server.

pub mod geoip;
pub mod link_service;
pub mod log_sink;
pub mod validation;

pub use geoip::{DisabledGeoLookup, GeoInfo, GeoIpProvider, GeoLookup, GeoLookupError};
pub use link_service::{CreatedLink, EntryStats, LinkService, LinkSettings};
pub use log_sink::{
    Level, LogOutcome, LogRecord, LogSink, LogTransport, Package, QueuedLog, Stack,
    TransportError,
};
pub use validation::{
    ShortenItem, ValidationIssue, ValidationIssueKind, ValidationPolicy, ValidationReport,
};
