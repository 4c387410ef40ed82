//! CLI interface module
//!
//! Command handlers print human-readable, colored output. They run against
//! the same [`AppContext`] the server uses.

pub mod commands;

use std::fmt;

use crate::cli::{Commands, ConfigCommands};
use crate::errors::ShortboxError;
use crate::runtime::lifetime::startup::AppContext;
use commands::{
    clear_logs, config_generate, list_stats, resolve_code, send_log, show_entry, show_logs,
    shorten_urls,
};

#[derive(Debug)]
pub enum CliError {
    StorageError(String),
    ParseError(String),
    CommandError(String),
    Service(ShortboxError),
}

impl CliError {
    /// Format as simple output
    pub fn format_simple(&self) -> String {
        match self {
            CliError::StorageError(msg) => format!("Storage error: {}", msg),
            CliError::ParseError(msg) => format!("Parse error: {}", msg),
            CliError::CommandError(msg) => format!("Command error: {}", msg),
            CliError::Service(err) => err.format_simple(),
        }
    }

    /// Format as colored output
    pub fn format_colored(&self) -> String {
        use colored::Colorize;
        match self {
            CliError::StorageError(msg) => {
                format!("{} {}", "Storage error:".red().bold(), msg.white())
            }
            CliError::ParseError(msg) => {
                format!("{} {}", "Parse error:".yellow().bold(), msg.white())
            }
            CliError::CommandError(msg) => {
                format!("{} {}", "Command error:".red().bold(), msg.white())
            }
            CliError::Service(err) => err.format_colored(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for CliError {}

impl From<ShortboxError> for CliError {
    fn from(err: ShortboxError) -> Self {
        CliError::Service(err)
    }
}

/// `config` subcommands; none of them touch storage
pub fn run_config_command(action: ConfigCommands) -> Result<(), CliError> {
    match action {
        ConfigCommands::Generate { output_path, force } => config_generate(output_path, force),
    }
}

/// Run a CLI command from clap-parsed input
pub fn run_cli_command(ctx: &AppContext, cmd: Commands) -> Result<(), CliError> {
    match cmd {
        Commands::Shorten {
            urls,
            validity,
            code,
        } => shorten_urls(ctx, urls, validity, code),

        Commands::Stats { json } => list_stats(ctx, json),

        Commands::Resolve { code, referrer } => resolve_code(ctx, &code, referrer.as_deref()),

        Commands::Show { code } => show_entry(ctx, &code),

        Commands::Log {
            stack,
            level,
            package,
            message,
        } => send_log(ctx, &stack, &level, &package, &message),

        Commands::Logs { clear } => {
            if clear {
                clear_logs(ctx)
            } else {
                show_logs(ctx)
            }
        }

        Commands::Config { action } => run_config_command(action),

        Commands::Serve => Err(CliError::CommandError(
            "serve is handled by the server runtime".to_string(),
        )),
    }
}
