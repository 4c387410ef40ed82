use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display};

/// Milliseconds in one minute of validity
pub const MS_PER_MINUTE: i64 = 60_000;

/// Source recorded when a resolution carries no referrer
pub const DIRECT_SOURCE: &str = "direct";

/// One successful resolution of a short code
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Click {
    /// Milliseconds since epoch at access time
    pub timestamp: i64,
    /// Referrer, or `"direct"`
    pub source: String,
    /// `"City, Country"` or `"Unknown"`
    pub geo: String,
}

impl Click {
    pub fn new(timestamp: i64, referrer: Option<&str>, geo: impl Into<String>) -> Self {
        let source = referrer
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .unwrap_or(DIRECT_SOURCE)
            .to_string();

        Self {
            timestamp,
            source,
            geo: geo.into(),
        }
    }
}

/// Stored record for one short code
///
/// The persisted field names follow the layout the browser version of the
/// tool wrote (`originalURL`, `createdAt`, ...), so existing blobs load as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    /// Filled from the map key on load when absent
    #[serde(default)]
    pub shortcode: String,
    #[serde(rename = "originalURL")]
    pub original_url: String,
    pub created_at: i64,
    pub expires_at: i64,
    #[serde(default)]
    pub clicks: Vec<Click>,
}

impl Entry {
    /// Build a fresh entry; `expires_at = created_at + validity_minutes * 60000`
    pub fn new(
        shortcode: impl Into<String>,
        original_url: impl Into<String>,
        created_at: i64,
        validity_minutes: u32,
    ) -> Self {
        Self {
            shortcode: shortcode.into(),
            original_url: original_url.into(),
            created_at,
            expires_at: created_at + i64::from(validity_minutes) * MS_PER_MINUTE,
            clicks: Vec::new(),
        }
    }

    /// Expiry is strict: an entry is still active at exactly `expires_at`
    pub fn is_expired_at(&self, now_ms: i64) -> bool {
        now_ms > self.expires_at
    }

    pub fn status_at(&self, now_ms: i64) -> EntryStatus {
        if self.is_expired_at(now_ms) {
            EntryStatus::Expired
        } else {
            EntryStatus::Active
        }
    }

    pub fn click_count(&self) -> usize {
        self.clicks.len()
    }
}

/// Lazily evaluated lifecycle state of an entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, AsRefStr)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum EntryStatus {
    Active,
    Expired,
}

/// Shortcode → entry, persisted as one JSON object
pub type Mapping = BTreeMap<String, Entry>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expiry_computation() {
        let entry = Entry::new("abcd", "https://example.com", 1_000, 30);
        assert_eq!(entry.expires_at, 1_000 + 30 * 60_000);
        assert!(entry.expires_at > entry.created_at);
    }

    #[test]
    fn test_expiry_boundary_is_inclusive() {
        let entry = Entry::new("abcd", "https://example.com", 0, 1);
        assert!(!entry.is_expired_at(60_000));
        assert!(entry.is_expired_at(60_001));
        assert_eq!(entry.status_at(60_000), EntryStatus::Active);
        assert_eq!(entry.status_at(60_001), EntryStatus::Expired);
    }

    #[test]
    fn test_click_source_defaults_to_direct() {
        assert_eq!(Click::new(1, None, "Unknown").source, "direct");
        assert_eq!(Click::new(1, Some("   "), "Unknown").source, "direct");
        assert_eq!(
            Click::new(1, Some("https://news.ycombinator.com/"), "Unknown").source,
            "https://news.ycombinator.com/"
        );
    }

    #[test]
    fn test_entry_serializes_with_browser_field_names() {
        let entry = Entry::new("abcd", "https://example.com", 5, 1);
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["originalURL"], "https://example.com");
        assert_eq!(json["createdAt"], 5);
        assert_eq!(json["expiresAt"], 60_005);
        assert!(json["clicks"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_entry_without_shortcode_field_deserializes() {
        let json = r#"{"originalURL":"https://a.io","createdAt":1,"expiresAt":2,"clicks":[]}"#;
        let entry: Entry = serde_json::from_str(json).unwrap();
        assert!(entry.shortcode.is_empty());
        assert_eq!(entry.original_url, "https://a.io");
    }

    #[test]
    fn test_status_display() {
        assert_eq!(EntryStatus::Active.to_string(), "active");
        assert_eq!(EntryStatus::Expired.as_ref(), "expired");
    }
}
