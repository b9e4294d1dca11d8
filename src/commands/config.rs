use crate::models::config::AppConfig;
use crate::services::config::ConfigManager;
use clap::Subcommand;

#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Print the config file location
    Path,
    /// Print the effective configuration as JSON
    Show,
    /// Write the default configuration to disk
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },
}

/// Execute a `config` subcommand and return the text to print
pub fn handle_config(manager: &ConfigManager, action: &ConfigAction) -> Result<String, String> {
    match action {
        ConfigAction::Path => Ok(manager.config_file_path().display().to_string()),
        ConfigAction::Show => {
            let config = manager.load()?;
            serde_json::to_string_pretty(&config)
                .map_err(|e| format!("Failed to serialize config: {}", e))
        }
        ConfigAction::Init { force } => {
            if manager.config_exists() && !force {
                return Err(format!(
                    "Config file already exists at {} (use --force to overwrite)",
                    manager.config_file_path().display()
                ));
            }

            manager.save(&AppConfig::default())?;
            Ok(format!(
                "Wrote default config to {}",
                manager.config_file_path().display()
            ))
        }
    }
}
