pub mod commands;
pub mod models;
pub mod services;
mod utils;

use clap::Parser;
use commands::{Cli, Command};
use models::config::AppConfig;
use services::config::ConfigManager;
use std::process::ExitCode;
use tracing::{error, warn};

/// Command line entrypoint
pub fn run() -> ExitCode {
    let cli = Cli::parse();
    utils::logging::init_logging(cli.verbose, cli.log_json);

    match dispatch(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn dispatch(cli: Cli) -> Result<(), String> {
    match cli.command {
        Command::Config { action } => {
            let manager = ConfigManager::new()?;
            let output = commands::config::handle_config(&manager, &action)?;
            println!("{}", output);
            Ok(())
        }
        Command::Run(args) => {
            let mut config = load_run_config(ConfigManager::new())?;
            commands::run::apply_overrides(&mut config, &args);

            // Images are processed strictly one at a time
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .map_err(|e| format!("Failed to start async runtime: {}", e))?;

            runtime.block_on(commands::run::run_batch(&args, &config))
        }
    }
}

/// A run needs no config file, so a missing config directory means defaults
fn load_run_config(manager: Result<ConfigManager, String>) -> Result<AppConfig, String> {
    match manager {
        Ok(manager) => manager.load(),
        Err(e) => {
            warn!("{}, using default settings", e);
            Ok(AppConfig::default())
        }
    }
}
