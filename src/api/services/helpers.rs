//! API 帮助函数

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, web};
use serde::Serialize;
use tracing::error;

use super::types::{ApiResponse, ErrorCode};
use crate::errors::ShortboxError;

/// 构建 JSON 响应
pub fn json_response<T: Serialize>(
    status: StatusCode,
    code: ErrorCode,
    message: impl Into<String>,
    data: Option<T>,
) -> HttpResponse {
    HttpResponse::build(status)
        .append_header(("Content-Type", "application/json; charset=utf-8"))
        .json(ApiResponse {
            code,
            message: message.into(),
            data,
        })
}

/// 构建成功响应
pub fn success_response<T: Serialize>(data: T) -> HttpResponse {
    json_response(StatusCode::OK, ErrorCode::Success, "OK", Some(data))
}

/// 构建错误响应
pub fn error_response(status: StatusCode, code: ErrorCode, message: &str) -> HttpResponse {
    json_response::<()>(status, code, message, None)
}

/// 从 ShortboxError 构建错误响应
///
/// 校验失败时 `data` 携带全部问题列表。
pub fn error_from_shortbox(err: &ShortboxError) -> HttpResponse {
    match err {
        ShortboxError::Validation(report) => json_response(
            StatusCode::BAD_REQUEST,
            ErrorCode::LinkValidationFailed,
            report.to_string(),
            Some(&report.issues),
        ),
        ShortboxError::NotFound(msg) => {
            error_response(StatusCode::NOT_FOUND, ErrorCode::LinkNotFound, msg)
        }
        ShortboxError::Expired(msg) => {
            error_response(StatusCode::GONE, ErrorCode::LinkExpired, msg)
        }
        ShortboxError::InvalidLogArgument(msg) => {
            error_response(StatusCode::BAD_REQUEST, ErrorCode::LogInvalidArgument, msg)
        }
        other => {
            error!("Request failed: {}", other);
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorCode::InternalServerError,
                &other.message(),
            )
        }
    }
}

/// 统一 Result → HttpResponse 转换
pub fn api_result<T: Serialize>(result: Result<T, ShortboxError>) -> HttpResponse {
    match result {
        Ok(data) => success_response(data),
        Err(e) => error_from_shortbox(&e),
    }
}

/// Run a blocking core call on the blocking pool and render the result
pub async fn blocking_api<T, F>(f: F) -> HttpResponse
where
    F: FnOnce() -> Result<T, ShortboxError> + Send + 'static,
    T: Serialize + Send + 'static,
{
    match web::block(f).await {
        Ok(result) => api_result(result),
        Err(e) => {
            error!("Blocking task failed: {}", e);
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorCode::InternalServerError,
                "Internal Server Error",
            )
        }
    }
}
