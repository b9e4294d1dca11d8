pub mod config;
pub mod run;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(
    name = "mileage-tracker",
    version,
    about = "Read odometer photos and pair entry/exit mileage"
)]
pub struct Cli {
    /// Debug-level logging
    #[arg(long, global = true)]
    pub verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Recognize a batch of photos and pair the readings
    Run(run::RunArgs),
    /// Inspect or initialize the config file
    Config {
        #[command(subcommand)]
        action: config::ConfigAction,
    },
}
