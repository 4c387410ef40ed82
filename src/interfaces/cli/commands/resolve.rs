//! Resolve command

use colored::Colorize;

use crate::interfaces::cli::CliError;
use crate::runtime::lifetime::startup::AppContext;

pub fn resolve_code(ctx: &AppContext, code: &str, referrer: Option<&str>) -> Result<(), CliError> {
    let target = ctx.link_service.resolve(code, referrer)?;
    println!(
        "{} {} -> {}",
        "→".bold().green(),
        code.cyan(),
        target.blue().underline()
    );
    Ok(())
}
