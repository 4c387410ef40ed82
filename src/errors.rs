use std::borrow::Cow;
use std::fmt;

use crate::services::validation::ValidationReport;

#[derive(Debug, Clone)]
pub enum ShortboxError {
    /// 批量创建被拒绝，携带所有条目的问题
    Validation(ValidationReport),
    NotFound(String),
    Expired(String),
    InvalidLogArgument(String),
    FileOperation(String),
    Serialization(String),
    Config(String),
}

impl ShortboxError {
    /// 获取错误代码
    pub fn code(&self) -> &'static str {
        match self {
            ShortboxError::Validation(_) => "E001",
            ShortboxError::NotFound(_) => "E002",
            ShortboxError::Expired(_) => "E003",
            ShortboxError::InvalidLogArgument(_) => "E004",
            ShortboxError::FileOperation(_) => "E005",
            ShortboxError::Serialization(_) => "E006",
            ShortboxError::Config(_) => "E007",
        }
    }

    /// 获取错误类型名称
    pub fn error_type(&self) -> &'static str {
        match self {
            ShortboxError::Validation(_) => "Validation Error",
            ShortboxError::NotFound(_) => "Resource Not Found",
            ShortboxError::Expired(_) => "Link Expired",
            ShortboxError::InvalidLogArgument(_) => "Invalid Log Argument",
            ShortboxError::FileOperation(_) => "File Operation Error",
            ShortboxError::Serialization(_) => "Serialization Error",
            ShortboxError::Config(_) => "Configuration Error",
        }
    }

    /// 获取错误详情
    pub fn message(&self) -> Cow<'_, str> {
        match self {
            ShortboxError::Validation(report) => Cow::Owned(report.to_string()),
            ShortboxError::NotFound(msg) => Cow::Borrowed(msg),
            ShortboxError::Expired(msg) => Cow::Borrowed(msg),
            ShortboxError::InvalidLogArgument(msg) => Cow::Borrowed(msg),
            ShortboxError::FileOperation(msg) => Cow::Borrowed(msg),
            ShortboxError::Serialization(msg) => Cow::Borrowed(msg),
            ShortboxError::Config(msg) => Cow::Borrowed(msg),
        }
    }

    /// 格式化为彩色输出
    pub fn format_colored(&self) -> String {
        use colored::Colorize;
        format!(
            "{} {} {}\n  {}",
            "[ERROR]".red().bold(),
            self.code().yellow(),
            self.error_type().red(),
            self.message().white()
        )
    }

    /// 格式化为简洁输出
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }

    /// The validation report, if this is a rejected batch
    pub fn validation_report(&self) -> Option<&ValidationReport> {
        match self {
            ShortboxError::Validation(report) => Some(report),
            _ => None,
        }
    }
}

impl fmt::Display for ShortboxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for ShortboxError {}

// 便捷的构造函数
impl ShortboxError {
    pub fn not_found<T: Into<String>>(msg: T) -> Self {
        ShortboxError::NotFound(msg.into())
    }

    pub fn expired<T: Into<String>>(msg: T) -> Self {
        ShortboxError::Expired(msg.into())
    }

    pub fn invalid_log_argument<T: Into<String>>(msg: T) -> Self {
        ShortboxError::InvalidLogArgument(msg.into())
    }

    pub fn file_operation<T: Into<String>>(msg: T) -> Self {
        ShortboxError::FileOperation(msg.into())
    }

    pub fn serialization<T: Into<String>>(msg: T) -> Self {
        ShortboxError::Serialization(msg.into())
    }

    pub fn config<T: Into<String>>(msg: T) -> Self {
        ShortboxError::Config(msg.into())
    }
}

impl From<ValidationReport> for ShortboxError {
    fn from(report: ValidationReport) -> Self {
        ShortboxError::Validation(report)
    }
}

impl From<std::io::Error> for ShortboxError {
    fn from(err: std::io::Error) -> Self {
        ShortboxError::FileOperation(err.to_string())
    }
}

impl From<serde_json::Error> for ShortboxError {
    fn from(err: serde_json::Error) -> Self {
        ShortboxError::Serialization(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ShortboxError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::validation::{ValidationIssue, ValidationIssueKind};

    #[test]
    fn test_codes_are_distinct() {
        let errors = [
            ShortboxError::Validation(ValidationReport::default()),
            ShortboxError::not_found("x"),
            ShortboxError::expired("x"),
            ShortboxError::invalid_log_argument("x"),
            ShortboxError::file_operation("x"),
            ShortboxError::serialization("x"),
            ShortboxError::config("x"),
        ];
        let codes: std::collections::HashSet<_> = errors.iter().map(|e| e.code()).collect();
        assert_eq!(codes.len(), errors.len());
    }

    #[test]
    fn test_validation_message_lists_issues() {
        let report = ValidationReport {
            issues: vec![ValidationIssue::new(
                2,
                ValidationIssueKind::InvalidUrl,
                "Invalid URL format",
            )],
        };
        let err = ShortboxError::from(report);
        assert!(err.to_string().starts_with("Validation Error"));
        assert!(err.to_string().contains("entry 2"));
        assert!(err.validation_report().is_some());
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: ShortboxError = io.into();
        assert!(matches!(err, ShortboxError::FileOperation(_)));
        assert!(err.message().contains("denied"));
    }
}
