//! Shorten command

use colored::Colorize;

use super::format_millis;
use crate::interfaces::cli::CliError;
use crate::runtime::lifetime::startup::AppContext;
use crate::services::ShortenItem;

pub fn shorten_urls(
    ctx: &AppContext,
    urls: Vec<String>,
    validity: Option<String>,
    code: Option<String>,
) -> Result<(), CliError> {
    if code.is_some() && urls.len() > 1 {
        return Err(CliError::ParseError(
            "--code can only be used with a single URL".to_string(),
        ));
    }

    let items: Vec<ShortenItem> = urls
        .into_iter()
        .map(|url| ShortenItem {
            url,
            validity: validity.clone(),
            shortcode: code.clone(),
        })
        .collect();

    let created = match ctx.link_service.create_batch(&items) {
        Ok(created) => created,
        Err(e) => {
            if let Some(report) = e.validation_report() {
                for issue in &report.issues {
                    println!("{} {}", "✗".bold().red(), issue.to_string().red());
                }
            }
            return Err(e.into());
        }
    };

    for link in &created {
        println!(
            "{} Created short link: {} -> {} (expires: {})",
            "✓".bold().green(),
            link.shortcode.cyan(),
            link.original_url.blue().underline(),
            format_millis(link.expires_at).yellow()
        );
        println!("  {}", link.short_url.magenta());
    }

    Ok(())
}
