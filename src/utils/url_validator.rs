//! URL 验证模块
//!
//! 目标 URL 必须是合法的绝对 URL，并阻止可执行脚本的协议

use url::Url;

/// URL 验证错误
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UrlValidationError {
    EmptyUrl,
    DangerousProtocol(String),
    InvalidFormat(String),
}

impl std::fmt::Display for UrlValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyUrl => write!(f, "URL cannot be empty"),
            Self::DangerousProtocol(proto) => {
                write!(f, "Dangerous protocol blocked: {}", proto)
            }
            Self::InvalidFormat(msg) => write!(f, "Invalid URL format: {}", msg),
        }
    }
}

impl std::error::Error for UrlValidationError {}

/// 危险协议列表
const DANGEROUS_PROTOCOLS: &[&str] = &["javascript:", "data:", "vbscript:", "blob:"];

/// 验证 URL
///
/// 检查项目：
/// 1. URL 不为空
/// 2. 不是危险协议（javascript:, data: 等）
/// 3. 能被解析为绝对 URL
///
/// Returns the trimmed URL on success.
pub fn validate_url(url: &str) -> Result<&str, UrlValidationError> {
    let url = url.trim();

    if url.is_empty() {
        return Err(UrlValidationError::EmptyUrl);
    }

    let url_lower = url.to_lowercase();

    // 检查危险协议
    for proto in DANGEROUS_PROTOCOLS {
        if url_lower.starts_with(proto) {
            return Err(UrlValidationError::DangerousProtocol(proto.to_string()));
        }
    }

    // Url::parse 只接受绝对 URL
    Url::parse(url).map_err(|e| UrlValidationError::InvalidFormat(e.to_string()))?;

    Ok(url)
}

/// 获取 URL 验证错误的用户友好消息
pub fn validation_error_message(error: &UrlValidationError) -> &'static str {
    match error {
        UrlValidationError::EmptyUrl => "URL is required",
        UrlValidationError::DangerousProtocol(_) => "This URL protocol is not allowed",
        UrlValidationError::InvalidFormat(_) => "Invalid URL format",
    }
}
