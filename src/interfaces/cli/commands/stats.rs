//! Statistics commands

use colored::Colorize;

use super::format_millis;
use crate::interfaces::cli::CliError;
use crate::runtime::lifetime::startup::AppContext;
use crate::services::EntryStats;
use crate::storage::EntryStatus;

/// Clicks shown per entry in the list view
const RECENT_CLICKS: usize = 3;

pub fn list_stats(ctx: &AppContext, json: bool) -> Result<(), CliError> {
    let all = ctx.link_service.list_all();

    if json {
        let out = serde_json::to_string_pretty(&all)
            .map_err(|e| CliError::CommandError(format!("Failed to serialize stats: {}", e)))?;
        println!("{}", out);
        return Ok(());
    }

    if all.is_empty() {
        println!("{} No short links found", "ℹ".bold().blue());
        return Ok(());
    }

    println!("{}", "Short link statistics:".bold().green());
    println!();
    for stats in &all {
        print_entry(stats, false);
    }
    println!();

    let active = all
        .iter()
        .filter(|s| s.status == EntryStatus::Active)
        .count();
    println!(
        "{} Total {} short links ({} active, {} expired)",
        "ℹ".bold().blue(),
        all.len().to_string().green(),
        active,
        all.len() - active
    );
    Ok(())
}

pub fn show_entry(ctx: &AppContext, code: &str) -> Result<(), CliError> {
    let stats = ctx.link_service.get(code)?;
    print_entry(&stats, true);
    Ok(())
}

fn print_entry(stats: &EntryStats, all_clicks: bool) {
    let entry = &stats.entry;
    let status = match stats.status {
        EntryStatus::Active => stats.status.as_ref().green(),
        EntryStatus::Expired => stats.status.as_ref().red(),
    };

    println!(
        "  {} -> {} [{}]",
        entry.shortcode.cyan(),
        entry.original_url.blue().underline(),
        status
    );
    println!(
        "    {}",
        format!(
            "created: {}  expires: {}  clicks: {}",
            format_millis(entry.created_at),
            format_millis(entry.expires_at),
            stats.click_count
        )
        .dimmed()
    );

    // 列表视图只展示最近 3 次点击
    let skip = if all_clicks {
        0
    } else {
        entry.clicks.len().saturating_sub(RECENT_CLICKS)
    };
    if skip > 0 {
        println!("      {}", earlier_clicks_hint(skip, &entry.shortcode).dimmed());
    }
    for click in entry.clicks.iter().skip(skip) {
        println!(
            "      {} {} {}",
            format_millis(click.timestamp).dimmed(),
            click.source.yellow(),
            click.geo
        );
    }
}

fn earlier_clicks_hint(hidden: usize, shortcode: &str) -> String {
    format!(
        "… {} earlier click(s) (see `show {}`)",
        hidden, shortcode
    )
}
