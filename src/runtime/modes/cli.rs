//! CLI mode
//!
//! Builds the application context and delegates to the command handlers.

use crate::cli::Commands;
use crate::config::get_config;
use crate::interfaces::cli::{CliError, run_cli_command};
use crate::runtime::lifetime::startup::AppContext;

/// Run one CLI command (everything except `serve`)
pub fn run_cli(cmd: Commands) -> Result<(), CliError> {
    // config generate 不需要存储
    if let Commands::Config { action } = cmd {
        return crate::interfaces::cli::run_config_command(action);
    }

    let config = get_config();
    let ctx = AppContext::from_config(&config)
        .map_err(|e| CliError::StorageError(format!("{:#}", e)))?;
    run_cli_command(&ctx, cmd)
}
