//! 地理位置查询模块
//!
//! 查询调用方自身出口 IP 的大致位置，用于点击记录：
//! - 外部 HTTP API（默认 ipapi.co）
//! - 配置关闭时不发起网络请求

mod external_api;
mod provider;

pub use external_api::{ExternalApiProvider, parse_geo_response};
pub use provider::{
    DisabledGeoLookup, GeoInfo, GeoIpProvider, GeoLookup, GeoLookupError, UNKNOWN_LOCATION,
};
