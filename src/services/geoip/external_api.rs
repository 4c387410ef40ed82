//! 外部 Geo API 实现
//!
//! `GET {api_url}`，响应为调用方出口 IP 的位置 JSON（ipapi.co 格式）

use std::time::Duration;

use serde_json::Value;
use tracing::{trace, warn};
use ureq::Agent;

use super::provider::{GeoInfo, GeoLookup, GeoLookupError};

pub struct ExternalApiProvider {
    api_url: String,
    agent: Agent,
}

impl ExternalApiProvider {
    pub fn new(api_url: &str, timeout_secs: u64) -> Self {
        let agent = Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(timeout_secs.max(1))))
            .build()
            .into();

        Self {
            api_url: api_url.to_string(),
            agent,
        }
    }

    fn fetch(&self) -> Result<Value, GeoLookupError> {
        let resp = self.agent.get(&self.api_url).call().map_err(|e| match e {
            ureq::Error::StatusCode(code) => GeoLookupError::Status(code),
            other => GeoLookupError::Transport(other.to_string()),
        })?;

        resp.into_body()
            .read_json::<Value>()
            .map_err(|e| GeoLookupError::Parse(e.to_string()))
    }
}

/// 解析 API 响应
///
/// ipapi.co 成功时返回 `{"city": "Berlin", "country_name": "Germany", ...}`，
/// 失败时返回 `{"error": true, "reason": "..."}`。
/// 同时兼容 ip-api.com 的 `{"status": "fail"}` 与 `country` 字段。
pub fn parse_geo_response(json: &Value) -> Result<GeoInfo, GeoLookupError> {
    if !json.is_object() {
        return Err(GeoLookupError::Parse("expected a JSON object".to_string()));
    }

    if json["error"].as_bool() == Some(true) {
        let reason = json["reason"].as_str().unwrap_or("error").to_string();
        return Err(GeoLookupError::Rejected(reason));
    }
    if json["status"].as_str() == Some("fail") {
        let reason = json["message"].as_str().unwrap_or("fail").to_string();
        return Err(GeoLookupError::Rejected(reason));
    }

    let city = json["city"].as_str().map(String::from);
    let country = json["country_name"]
        .as_str()
        .or_else(|| json["country"].as_str())
        .map(String::from);

    trace!("Geo API lookup: city={:?}, country={:?}", city, country);
    Ok(GeoInfo { city, country })
}

impl GeoLookup for ExternalApiProvider {
    fn lookup(&self) -> Result<GeoInfo, GeoLookupError> {
        let result = self.fetch().and_then(|json| parse_geo_response(&json));
        if let Err(ref e) = result {
            warn!("Geo API request to \"{}\" failed: {}", self.api_url, e);
        }
        result
    }

    fn name(&self) -> &'static str {
        "ExternalAPI"
    }
}
