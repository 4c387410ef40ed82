//! API 响应类型与错误码

use serde::Serialize;
use serde_repr::{Deserialize_repr, Serialize_repr};

/// API 错误码枚举
///
/// 使用 serde_repr 序列化为数字，按千位分域：
/// - 0: 成功
/// - 1000-1099: 通用错误
/// - 3000-3099: 链接错误
/// - 4000-4099: 日志错误
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize_repr, Deserialize_repr)]
#[repr(i32)]
pub enum ErrorCode {
    Success = 0,

    // 通用错误 1000-1099
    BadRequest = 1000,
    InternalServerError = 1005,

    // 链接错误 3000-3099
    LinkNotFound = 3000,
    LinkExpired = 3001,
    LinkValidationFailed = 3002,

    // 日志错误 4000-4099
    LogInvalidArgument = 4000,
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub code: ErrorCode,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}
