//! Geo lookup 抽象层
//!
//! 统一的查询接口，根据配置选择实现：
//! 1. `geo.enabled = false` → DisabledGeoLookup
//! 2. 否则 → ExternalApiProvider

use std::fmt;
use std::sync::Arc;

use tracing::{debug, info};

use super::external_api::ExternalApiProvider;
use crate::config::GeoConfig;

/// Recorded when the lookup fails or a component is missing
pub const UNKNOWN_LOCATION: &str = "Unknown";

/// 地理位置信息
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GeoInfo {
    pub city: Option<String>,
    /// 国家名称 (e.g., "Germany")
    pub country: Option<String>,
}

impl GeoInfo {
    pub fn new(city: impl Into<String>, country: impl Into<String>) -> Self {
        Self {
            city: Some(city.into()),
            country: Some(country.into()),
        }
    }

    /// `"City, Country"`, each missing part replaced by `Unknown`
    pub fn label(&self) -> String {
        fn part(v: &Option<String>) -> &str {
            v.as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .unwrap_or(UNKNOWN_LOCATION)
        }
        format!("{}, {}", part(&self.city), part(&self.country))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GeoLookupError {
    Disabled,
    Transport(String),
    Status(u16),
    Parse(String),
    /// The service answered but reported an error in the body
    Rejected(String),
}

impl fmt::Display for GeoLookupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Disabled => write!(f, "geo lookup disabled"),
            Self::Transport(msg) => write!(f, "request failed: {}", msg),
            Self::Status(code) => write!(f, "unexpected status {}", code),
            Self::Parse(msg) => write!(f, "invalid response: {}", msg),
            Self::Rejected(reason) => write!(f, "lookup rejected: {}", reason),
        }
    }
}

impl std::error::Error for GeoLookupError {}

/// Geo 查询 trait
pub trait GeoLookup: Send + Sync {
    /// Location of the current caller
    fn lookup(&self) -> Result<GeoInfo, GeoLookupError>;

    /// 获取 provider 名称（用于日志）
    fn name(&self) -> &'static str;
}

/// Never touches the network
#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledGeoLookup;

impl GeoLookup for DisabledGeoLookup {
    fn lookup(&self) -> Result<GeoInfo, GeoLookupError> {
        Err(GeoLookupError::Disabled)
    }

    fn name(&self) -> &'static str {
        "Disabled"
    }
}

/// 统一 Geo Provider
#[derive(Clone)]
pub struct GeoIpProvider {
    inner: Arc<dyn GeoLookup>,
}

impl GeoIpProvider {
    pub fn new(config: &GeoConfig) -> Self {
        let inner: Arc<dyn GeoLookup> = if config.enabled {
            Arc::new(ExternalApiProvider::new(&config.api_url, config.timeout_secs))
        } else {
            debug!("Geo: lookup disabled by configuration");
            Arc::new(DisabledGeoLookup)
        };

        info!("Geo: Initialized with {} provider", inner.name());
        Self { inner }
    }

    /// 获取当前使用的 provider 名称
    pub fn provider_name(&self) -> &'static str {
        self.inner.name()
    }
}

impl GeoLookup for GeoIpProvider {
    fn lookup(&self) -> Result<GeoInfo, GeoLookupError> {
        self.inner.lookup()
    }

    fn name(&self) -> &'static str {
        self.inner.name()
    }
}
