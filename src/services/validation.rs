//! Batch input validation
//!
//! Every item is checked independently and stops at its own first problem.
//! Any problem anywhere rejects the whole batch, but all items are still
//! inspected so the caller gets the complete list at once.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use strum::Display;

use crate::config::FeaturesConfig;
use crate::utils::url_validator::{UrlValidationError, validate_url, validation_error_message};
use crate::utils::{MAX_SHORTCODE_LENGTH, MIN_SHORTCODE_LENGTH, is_valid_short_code};

/// One row of a create-batch request, as typed by the user
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShortenItem {
    pub url: String,
    /// Minutes; `None` or blank means the default validity
    #[serde(default)]
    pub validity: Option<String>,
    /// Custom code; `None` or blank means generate one
    #[serde(default)]
    pub shortcode: Option<String>,
}

impl ShortenItem {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    pub fn with_validity(mut self, minutes: impl ToString) -> Self {
        self.validity = Some(minutes.to_string());
        self
    }

    pub fn with_shortcode(mut self, code: impl Into<String>) -> Self {
        self.shortcode = Some(code.into());
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ValidationIssueKind {
    EmptyBatch,
    TooManyItems,
    MissingUrl,
    InvalidUrl,
    InvalidValidity,
    InvalidShortcode,
    DuplicateShortcode,
}

/// A problem with one item (`index` is 1-based) or with the whole batch (`index == 0`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationIssue {
    pub index: usize,
    pub kind: ValidationIssueKind,
    pub message: String,
}

impl ValidationIssue {
    pub fn new(index: usize, kind: ValidationIssueKind, message: impl Into<String>) -> Self {
        Self {
            index,
            kind,
            message: message.into(),
        }
    }

    fn batch(kind: ValidationIssueKind, message: impl Into<String>) -> Self {
        Self::new(0, kind, message)
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.index == 0 {
            write!(f, "{}", self.message)
        } else {
            write!(f, "{} for entry {}", self.message, self.index)
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub issues: Vec<ValidationIssue>,
}

impl ValidationReport {
    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn has(&self, kind: ValidationIssueKind) -> bool {
        self.issues.iter().any(|i| i.kind == kind)
    }

    pub fn first_kind(&self) -> Option<ValidationIssueKind> {
        self.issues.first().map(|i| i.kind)
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.issues.iter().map(ToString::to_string).collect();
        write!(f, "{}", parts.join("; "))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationPolicy {
    pub default_validity_minutes: u32,
    pub max_validity_minutes: u32,
    pub max_batch_size: usize,
}

impl Default for ValidationPolicy {
    fn default() -> Self {
        Self::from(&FeaturesConfig::default())
    }
}

impl From<&FeaturesConfig> for ValidationPolicy {
    fn from(features: &FeaturesConfig) -> Self {
        Self {
            default_validity_minutes: features.default_validity_minutes.max(1),
            max_validity_minutes: features.max_validity_minutes.max(1),
            max_batch_size: features.max_batch_size.max(1),
        }
    }
}

/// An item that passed every check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedItem {
    pub url: String,
    pub validity_minutes: u32,
    /// Custom code, already checked for format and uniqueness
    pub shortcode: Option<String>,
}

/// Parse the validity field; blank or absent falls back to the policy default
pub fn parse_validity(input: Option<&str>, policy: &ValidationPolicy) -> Result<u32, String> {
    let raw = match input.map(str::trim) {
        None | Some("") => return Ok(policy.default_validity_minutes),
        Some(raw) => raw,
    };

    let minutes: i64 = raw
        .parse()
        .map_err(|_| "Validity must be a positive integer".to_string())?;

    if minutes <= 0 {
        return Err("Validity must be a positive integer".to_string());
    }
    if minutes > i64::from(policy.max_validity_minutes) {
        return Err(format!(
            "Validity must not exceed {} minutes",
            policy.max_validity_minutes
        ));
    }

    // 上面已经限制了上界
    Ok(minutes as u32)
}

/// Blank custom codes count as "not supplied"
pub fn normalize_shortcode(input: Option<&str>) -> Option<&str> {
    input.map(str::trim).filter(|c| !c.is_empty())
}

fn validate_item<F>(
    index: usize,
    item: &ShortenItem,
    policy: &ValidationPolicy,
    seen_codes: &mut HashSet<String>,
    exists_in_store: &F,
) -> Result<ValidatedItem, ValidationIssue>
where
    F: Fn(&str) -> bool,
{
    let url = validate_url(&item.url).map_err(|e| {
        let kind = match e {
            UrlValidationError::EmptyUrl => ValidationIssueKind::MissingUrl,
            _ => ValidationIssueKind::InvalidUrl,
        };
        ValidationIssue::new(index, kind, validation_error_message(&e))
    })?;

    let validity_minutes = parse_validity(item.validity.as_deref(), policy)
        .map_err(|msg| ValidationIssue::new(index, ValidationIssueKind::InvalidValidity, msg))?;

    let shortcode = match normalize_shortcode(item.shortcode.as_deref()) {
        Some(code) => {
            if !is_valid_short_code(code) {
                return Err(ValidationIssue::new(
                    index,
                    ValidationIssueKind::InvalidShortcode,
                    format!(
                        "Shortcode must be alphanumeric ({}-{} chars)",
                        MIN_SHORTCODE_LENGTH, MAX_SHORTCODE_LENGTH
                    ),
                ));
            }
            if exists_in_store(code) || seen_codes.contains(code) {
                return Err(ValidationIssue::new(
                    index,
                    ValidationIssueKind::DuplicateShortcode,
                    "Shortcode already exists",
                ));
            }
            seen_codes.insert(code.to_string());
            Some(code.to_string())
        }
        None => None,
    };

    Ok(ValidatedItem {
        url: url.to_string(),
        validity_minutes,
        shortcode,
    })
}

/// Validate a whole batch against the current store
///
/// `exists_in_store` answers whether a code is already taken (case-sensitive).
/// Custom codes also collide with custom codes of earlier items in the batch.
pub fn validate_batch<F>(
    items: &[ShortenItem],
    policy: &ValidationPolicy,
    exists_in_store: F,
) -> Result<Vec<ValidatedItem>, ValidationReport>
where
    F: Fn(&str) -> bool,
{
    if items.is_empty() {
        return Err(ValidationReport {
            issues: vec![ValidationIssue::batch(
                ValidationIssueKind::EmptyBatch,
                "At least one URL is required",
            )],
        });
    }
    if items.len() > policy.max_batch_size {
        return Err(ValidationReport {
            issues: vec![ValidationIssue::batch(
                ValidationIssueKind::TooManyItems,
                format!("Cannot add more than {} URLs", policy.max_batch_size),
            )],
        });
    }

    let mut report = ValidationReport::default();
    let mut validated = Vec::with_capacity(items.len());
    let mut seen_codes = HashSet::new();

    for (i, item) in items.iter().enumerate() {
        match validate_item(i + 1, item, policy, &mut seen_codes, &exists_in_store) {
            Ok(v) => validated.push(v),
            Err(issue) => report.issues.push(issue),
        }
    }

    if report.is_empty() {
        Ok(validated)
    } else {
        Err(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy() -> ValidationPolicy {
        ValidationPolicy::default()
    }

    #[test]
    fn test_parse_validity() {
        let p = policy();
        assert_eq!(parse_validity(None, &p), Ok(30));
        assert_eq!(parse_validity(Some(""), &p), Ok(30));
        assert_eq!(parse_validity(Some("  "), &p), Ok(30));
        assert_eq!(parse_validity(Some("1"), &p), Ok(1));
        assert_eq!(parse_validity(Some(" 45 "), &p), Ok(45));
        assert!(parse_validity(Some("0"), &p).is_err());
        assert!(parse_validity(Some("-5"), &p).is_err());
        assert!(parse_validity(Some("1.5"), &p).is_err());
        assert!(parse_validity(Some("abc"), &p).is_err());
        assert!(parse_validity(Some("12abc"), &p).is_err());
        assert!(parse_validity(Some("525601"), &p).is_err());
        assert_eq!(parse_validity(Some("525600"), &p), Ok(525_600));
    }

    #[test]
    fn test_valid_batch() {
        let items = vec![
            ShortenItem::new("https://example.com"),
            ShortenItem::new("https://rust-lang.org")
                .with_validity(5)
                .with_shortcode(" rust2024 "),
        ];
        let validated = validate_batch(&items, &policy(), |_| false).unwrap();
        assert_eq!(validated.len(), 2);
        assert_eq!(validated[0].validity_minutes, 30);
        assert_eq!(validated[0].shortcode, None);
        assert_eq!(validated[1].validity_minutes, 5);
        assert_eq!(validated[1].shortcode.as_deref(), Some("rust2024"));
    }

    #[test]
    fn test_collects_issues_from_every_item() {
        let items = vec![
            ShortenItem::new(""),
            ShortenItem::new("https://ok.example"),
            ShortenItem::new("nope"),
            ShortenItem::new("https://ok.example").with_validity("0"),
            ShortenItem::new("https://ok.example").with_shortcode("a_b!"),
        ];
        let report = validate_batch(&items, &policy(), |_| false).unwrap_err();
        let kinds: Vec<_> = report.issues.iter().map(|i| (i.index, i.kind)).collect();
        assert_eq!(
            kinds,
            vec![
                (1, ValidationIssueKind::MissingUrl),
                (3, ValidationIssueKind::InvalidUrl),
                (4, ValidationIssueKind::InvalidValidity),
                (5, ValidationIssueKind::InvalidShortcode),
            ]
        );
        assert!(report.to_string().contains("URL is required for entry 1"));
    }

    #[test]
    fn test_item_stops_at_first_issue() {
        let items = vec![ShortenItem::new("bad").with_validity("-1")];
        let report = validate_batch(&items, &policy(), |_| false).unwrap_err();
        assert_eq!(report.issues.len(), 1);
        assert_eq!(report.issues[0].kind, ValidationIssueKind::InvalidUrl);
    }

    #[test]
    fn test_duplicate_against_store_is_case_sensitive() {
        let items = vec![ShortenItem::new("https://a.io").with_shortcode("abcd")];
        let report = validate_batch(&items, &policy(), |c| c == "abcd").unwrap_err();
        assert!(report.has(ValidationIssueKind::DuplicateShortcode));

        let items = vec![ShortenItem::new("https://a.io").with_shortcode("ABCD")];
        assert!(validate_batch(&items, &policy(), |c| c == "abcd").is_ok());
    }

    #[test]
    fn test_duplicate_within_batch() {
        let items = vec![
            ShortenItem::new("https://a.io").with_shortcode("same1"),
            ShortenItem::new("https://b.io").with_shortcode("same1"),
        ];
        let report = validate_batch(&items, &policy(), |_| false).unwrap_err();
        assert_eq!(report.issues.len(), 1);
        assert_eq!(report.issues[0].index, 2);
        assert_eq!(report.issues[0].kind, ValidationIssueKind::DuplicateShortcode);
    }

    #[test]
    fn test_batch_size_limits() {
        let report = validate_batch(&[], &policy(), |_| false).unwrap_err();
        assert_eq!(report.first_kind(), Some(ValidationIssueKind::EmptyBatch));

        let items = vec![ShortenItem::new("https://a.io"); 6];
        let report = validate_batch(&items, &policy(), |_| false).unwrap_err();
        assert_eq!(report.first_kind(), Some(ValidationIssueKind::TooManyItems));
        assert_eq!(report.to_string(), "Cannot add more than 5 URLs");

        let items = vec![ShortenItem::new("https://a.io"); 5];
        assert!(validate_batch(&items, &policy(), |_| false).is_ok());
    }

    #[test]
    fn test_blank_shortcode_means_generated() {
        let items = vec![ShortenItem::new("https://a.io").with_shortcode("   ")];
        let validated = validate_batch(&items, &policy(), |_| true).unwrap();
        assert_eq!(validated[0].shortcode, None);
    }
}
