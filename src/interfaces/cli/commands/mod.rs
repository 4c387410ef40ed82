//! CLI command implementations

mod config_gen;
mod logs;
mod resolve;
mod shorten;
mod stats;

pub use config_gen::config_generate;
pub use logs::{clear_logs, send_log, show_logs};
pub use resolve::resolve_code;
pub use shorten::shorten_urls;
pub use stats::{list_stats, show_entry};

use chrono::{DateTime, Utc};

/// Milliseconds since epoch → "YYYY-MM-DD HH:MM:SS UTC"
pub(crate) fn format_millis(ms: i64) -> String {
    DateTime::<Utc>::from_timestamp_millis(ms)
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| ms.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_millis() {
        assert_eq!(format_millis(0), "1970-01-01 00:00:00 UTC");
        assert_eq!(format_millis(1_700_000_000_123), "2023-11-14 22:13:20 UTC");
    }
}
