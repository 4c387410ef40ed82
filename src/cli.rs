//! Command-line interface definitions using clap

use clap::{Parser, Subcommand};

/// shortbox - expiring short links with click statistics
#[derive(Parser, Debug)]
#[command(name = "shortbox")]
#[command(version)]
#[command(about = "A single-user URL shortener with expiring links", long_about = None)]
pub struct Cli {
    /// Config file path (default: config.toml, optional)
    #[arg(long, short = 'c', global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Shorten one or more URLs in a single batch
    ///
    /// Usage: shorten <URL>... [--validity MIN] [--code CODE]
    Shorten {
        /// Target URLs
        #[arg(required = true, num_args = 1..)]
        urls: Vec<String>,

        /// Validity in minutes for every URL of the batch
        #[arg(long, short = 'v', allow_negative_numbers = true)]
        validity: Option<String>,

        /// Custom short code (single URL only)
        #[arg(long)]
        code: Option<String>,
    },

    /// List all short links with status and clicks
    Stats {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Resolve a short code and record the click
    Resolve {
        code: String,

        /// Referrer recorded as click source (default: direct)
        #[arg(long)]
        referrer: Option<String>,
    },

    /// Show one short link without recording a click
    Show { code: String },

    /// Send a record through the logging sink
    Log {
        /// backend | frontend
        stack: String,
        /// debug | info | warn | error | fatal
        level: String,
        /// api | component | hook | page | state | style | auth | config | middleware | utils
        package: String,
        message: String,
    },

    /// Show the local log queue
    Logs {
        /// Remove every queued record
        #[arg(long)]
        clear: bool,
    },

    /// Run the HTTP server
    Serve,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },
}

/// Configuration management commands
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Generate example configuration file
    Generate {
        /// Output path (default: config.example.toml)
        output_path: Option<String>,

        /// Force overwrite without confirmation
        #[arg(long)]
        force: bool,
    },
}
