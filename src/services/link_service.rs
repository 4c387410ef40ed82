//! Link lifecycle service
//!
//! Shared by the CLI commands and the HTTP handlers. All operations are
//! synchronous; the HTTP layer runs them on the blocking pool.

use std::collections::HashSet;
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info};

use super::geoip::{GeoLookup, UNKNOWN_LOCATION};
use super::validation::{ShortenItem, ValidationPolicy, validate_batch};
use crate::config::FeaturesConfig;
use crate::errors::{Result, ShortboxError};
use crate::storage::{Click, Entry, EntryStatus, MappingStore};
use crate::utils::{Clock, MAX_SHORTCODE_LENGTH, MIN_SHORTCODE_LENGTH, generate_unique_code};

// ============ DTOs ============

/// One entry of a successful create-batch
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedLink {
    pub shortcode: String,
    #[serde(rename = "originalURL")]
    pub original_url: String,
    pub created_at: i64,
    pub expires_at: i64,
    pub short_url: String,
}

/// Entry plus its lifecycle state at query time
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryStats {
    #[serde(flatten)]
    pub entry: Entry,
    pub status: EntryStatus,
    pub click_count: usize,
    pub short_url: String,
}

#[derive(Debug, Clone)]
pub struct LinkSettings {
    pub shortcode_length: usize,
    pub policy: ValidationPolicy,
    pub base_url: String,
}

impl From<&FeaturesConfig> for LinkSettings {
    fn from(features: &FeaturesConfig) -> Self {
        Self {
            shortcode_length: features
                .shortcode_length
                .clamp(MIN_SHORTCODE_LENGTH, MAX_SHORTCODE_LENGTH),
            policy: ValidationPolicy::from(features),
            base_url: features.base_url.trim_end_matches('/').to_string(),
        }
    }
}

impl Default for LinkSettings {
    fn default() -> Self {
        Self::from(&FeaturesConfig::default())
    }
}

// ============ Service ============

pub struct LinkService {
    store: Arc<MappingStore>,
    geo: Arc<dyn GeoLookup>,
    clock: Arc<dyn Clock>,
    settings: LinkSettings,
}

impl LinkService {
    pub fn new(
        store: Arc<MappingStore>,
        geo: Arc<dyn GeoLookup>,
        clock: Arc<dyn Clock>,
        settings: LinkSettings,
    ) -> Self {
        Self {
            store,
            geo,
            clock,
            settings,
        }
    }

    pub fn short_url(&self, shortcode: &str) -> String {
        format!("{}/{}", self.settings.base_url, shortcode)
    }

    /// Validate and persist a batch
    ///
    /// Either every item is stored or none is. Generated codes avoid the
    /// existing store, the batch's custom codes and each other.
    pub fn create_batch(&self, items: &[ShortenItem]) -> Result<Vec<CreatedLink>> {
        let now = self.clock.now_millis();
        let length = self.settings.shortcode_length;

        let created = self.store.update(|mapping| {
            let validated =
                validate_batch(items, &self.settings.policy, |c| mapping.contains_key(c))?;

            let reserved: HashSet<String> = validated
                .iter()
                .filter_map(|v| v.shortcode.clone())
                .collect();

            let mut created = Vec::with_capacity(validated.len());
            for item in validated {
                let code = match item.shortcode {
                    Some(code) => code,
                    None => generate_unique_code(length, |c| {
                        mapping.contains_key(c) || reserved.contains(c)
                    }),
                };

                let entry = Entry::new(code.as_str(), item.url, now, item.validity_minutes);
                created.push(CreatedLink {
                    short_url: self.short_url(&code),
                    shortcode: code.clone(),
                    original_url: entry.original_url.clone(),
                    created_at: entry.created_at,
                    expires_at: entry.expires_at,
                });
                mapping.insert(code, entry);
            }
            Ok(created)
        })?;

        info!("Created {} short link(s)", created.len());
        Ok(created)
    }

    /// Every stored entry, active and expired, oldest first
    pub fn list_all(&self) -> Vec<EntryStats> {
        let now = self.clock.now_millis();
        let mut all: Vec<EntryStats> = self
            .store
            .load()
            .into_values()
            .map(|entry| self.to_stats(entry, now))
            .collect();

        all.sort_by(|a, b| {
            a.entry
                .created_at
                .cmp(&b.entry.created_at)
                .then_with(|| a.entry.shortcode.cmp(&b.entry.shortcode))
        });
        all
    }

    /// One entry without recording a click
    pub fn get(&self, shortcode: &str) -> Result<EntryStats> {
        let entry = self.store.get(shortcode).ok_or_else(|| {
            ShortboxError::not_found(format!("Shortcode not found: {}", shortcode))
        })?;
        Ok(self.to_stats(entry, self.clock.now_millis()))
    }

    /// Resolve a shortcode to its target and record the click
    ///
    /// Unknown and expired codes leave the store untouched.
    pub fn resolve(&self, shortcode: &str, referrer: Option<&str>) -> Result<String> {
        let entry = self.store.get(shortcode).ok_or_else(|| {
            ShortboxError::not_found(format!("Shortcode not found: {}", shortcode))
        })?;

        let now = self.clock.now_millis();
        if entry.is_expired_at(now) {
            return Err(ShortboxError::expired(format!(
                "Short link has expired: {}",
                shortcode
            )));
        }

        // geo 查询在写锁之外进行
        let geo = match self.geo.lookup() {
            Ok(info) => info.label(),
            Err(e) => {
                debug!("Geo lookup via {} failed: {}", self.geo.name(), e);
                UNKNOWN_LOCATION.to_string()
            }
        };

        self.store.add_click(shortcode, Click::new(now, referrer, geo))?;
        debug!("Resolved {} -> {}", shortcode, entry.original_url);
        Ok(entry.original_url)
    }

    fn to_stats(&self, entry: Entry, now: i64) -> EntryStats {
        EntryStats {
            status: entry.status_at(now),
            click_count: entry.click_count(),
            short_url: self.short_url(&entry.shortcode),
            entry,
        }
    }
}
