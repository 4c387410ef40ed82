use std::sync::{Arc, OnceLock};

use arc_swap::ArcSwap;

use super::StaticConfig;

static CONFIG: OnceLock<ArcSwap<StaticConfig>> = OnceLock::new();

/// Get the global configuration instance
///
/// Falls back to defaults when `init_config` was never called, so library
/// users and tests don't need any setup.
pub fn get_config() -> Arc<StaticConfig> {
    CONFIG
        .get_or_init(|| ArcSwap::from_pointee(StaticConfig::default()))
        .load_full()
}

/// Initialize the global configuration
///
/// Loads `path` (or "config.toml" in the current directory when `None`)
/// plus `SB__*` environment overrides. Calling it again has no effect.
///
/// An explicitly given file must load; the error is returned and the global
/// configuration is left untouched. A broken default file only falls back to
/// defaults.
///
/// # Examples
/// ```no_run
/// use shortbox::config::init_config;
/// init_config(None).expect("config");
/// ```
pub fn init_config(path: Option<&str>) -> Result<(), String> {
    let config = match path {
        Some(p) => StaticConfig::try_load(Some(p))?,
        None => StaticConfig::load(None),
    };
    CONFIG.get_or_init(|| ArcSwap::from_pointee(config));
    Ok(())
}
