//! lazydep - on-demand package cache
//!
//! CLI entry point that dispatches to subcommands.

use clap::Parser;
use console::style;
use lazydep::cli::{commands, Cli, Commands};
use lazydep::config::ConfigManager;
use lazydep::error::LazydepResult;
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", style("Error:").red().bold(), e);
            if let Some(hint) = e.hint() {
                eprintln!("{} {}", style("Hint:").yellow(), hint);
            }
            ExitCode::FAILURE
        }
    }
}

async fn run() -> LazydepResult<()> {
    let cli = Cli::parse();

    let config_manager = match cli.config {
        Some(ref path) => ConfigManager::with_path(path.clone()),
        None => ConfigManager::new(),
    };
    let config = config_manager.load().await?;

    // 0 = warn (spinners only), 1 = info, 2+ = debug
    let filter = match cli.verbose {
        0 => EnvFilter::new("lazydep=warn"),
        1 => EnvFilter::new("lazydep=info"),
        _ => EnvFilter::new("lazydep=debug"),
    };

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);
    if config.general.log_format == "json" {
        subscriber.json().init();
    } else {
        subscriber.without_time().init();
    }

    debug!("Using config {}", config_manager.path().display());

    match cli.command {
        Commands::List(args) => commands::list(args, &config).await,
        Commands::Add(args) => commands::add(args, &config, &config_manager).await,
        Commands::Remove(args) => commands::remove(args, &config).await,
        Commands::Import(args) => commands::import(args, &config, &config_manager).await,
        Commands::Config(args) => commands::config(args, &config, &config_manager).await,
    }
}
