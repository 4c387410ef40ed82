use clap::Parser;
use colored::Colorize;

use shortbox::cli::{Cli, Commands};
use shortbox::config::{get_config, init_config};
use shortbox::runtime::lifetime::startup::AppContext;
use shortbox::runtime::modes::{run_cli, run_server};
use shortbox::system::{ConsoleTarget, init_logging};

fn main() {
    let cli = Cli::parse();
    dotenvy::dotenv().ok();

    // 显式指定的配置文件加载失败时直接退出，避免误用默认数据目录
    if let Err(e) = init_config(cli.config.as_deref()) {
        eprintln!("{} {}", "[ERROR]".red().bold(), e);
        std::process::exit(1);
    }
    let config = get_config();

    let console = match cli.command {
        Commands::Serve => ConsoleTarget::Stdout,
        _ => ConsoleTarget::Stderr,
    };
    let guard = match init_logging(&config.logging, console) {
        Ok(guard) => Some(guard),
        Err(e) => {
            eprintln!("{} {:#}", "[WARN]".yellow().bold(), e);
            None
        }
    };

    let code = match cli.command {
        Commands::Serve => {
            let result = AppContext::from_config(&config).and_then(|ctx| {
                actix_web::rt::System::new().block_on(run_server(ctx, &config.server))
            });
            match result {
                Ok(()) => 0,
                Err(e) => {
                    tracing::error!("Server failed: {:#}", e);
                    eprintln!("{} {:#}", "[ERROR]".red().bold(), e);
                    1
                }
            }
        }
        cmd => match run_cli(cmd) {
            Ok(()) => 0,
            Err(e) => {
                eprintln!("{}", e.format_colored());
                1
            }
        },
    };

    drop(guard);
    std::process::exit(code);
}
