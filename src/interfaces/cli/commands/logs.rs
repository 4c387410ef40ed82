//! Logging sink commands

use colored::Colorize;

use crate::interfaces::cli::CliError;
use crate::runtime::lifetime::startup::AppContext;
use crate::services::LogOutcome;

pub fn send_log(
    ctx: &AppContext,
    stack: &str,
    level: &str,
    package: &str,
    message: &str,
) -> Result<(), CliError> {
    match ctx.log_sink.log(stack, level, package, message)? {
        LogOutcome::Delivered => {
            println!("{} Log delivered", "✓".bold().green());
        }
        LogOutcome::Queued => {
            println!(
                "{} Remote delivery unavailable, log kept in local queue",
                "ℹ".bold().yellow()
            );
        }
    }
    Ok(())
}

pub fn show_logs(ctx: &AppContext) -> Result<(), CliError> {
    let queued = ctx.log_sink.queued();
    if queued.is_empty() {
        println!("{} Local log queue is empty", "ℹ".bold().blue());
        return Ok(());
    }

    for log in &queued {
        println!(
            "  {} {} {} {} {}",
            log.timestamp.dimmed(),
            log.stack.as_ref().cyan(),
            log.level.as_ref().yellow(),
            log.package.as_ref().magenta(),
            log.message
        );
    }
    println!();
    println!(
        "{} {} queued log(s)",
        "ℹ".bold().blue(),
        queued.len().to_string().green()
    );
    Ok(())
}

pub fn clear_logs(ctx: &AppContext) -> Result<(), CliError> {
    let removed = ctx.log_sink.clear_queue()?;
    println!(
        "{} Removed {} queued log(s)",
        "✓".bold().green(),
        removed.to_string().green()
    );
    Ok(())
}
