//! CLI interface module

pub mod commands;

use std::fmt;

use crate::cli::{Commands, ConfigCommands};
use crate::config::StaticConfig;
use commands::{config_generate, resolve_uri, search_index};

#[derive(Debug)]
pub enum CliError {
    ConfigError(String),
    CommandError(String),
}

impl CliError {
    pub fn format_simple(&self) -> String {
        match self {
            CliError::ConfigError(msg) => format!("Config error: {}", msg),
            CliError::CommandError(msg) => format!("Command error: {}", msg),
        }
    }

    pub fn format_colored(&self) -> String {
        use colored::Colorize;
        match self {
            CliError::ConfigError(msg) => {
                format!("{} {}", "Config error:".yellow().bold(), msg.white())
            }
            CliError::CommandError(msg) => {
                format!("{} {}", "Command error:".red().bold(), msg.white())
            }
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for CliError {}

impl From<crate::errors::SiteGlueError> for CliError {
    fn from(err: crate::errors::SiteGlueError) -> Self {
        match err {
            crate::errors::SiteGlueError::Config(msg)
            | crate::errors::SiteGlueError::InvalidRule(msg) => CliError::ConfigError(msg),
            other => CliError::CommandError(other.to_string()),
        }
    }
}

/// Run a one-off CLI command (everything except `serve`)
pub async fn run_cli_command(cmd: Commands, config: &StaticConfig) -> Result<(), CliError> {
    match cmd {
        Commands::Resolve { uri } => resolve_uri(config, &uri).await,
        Commands::Search { term, json } => search_index(config, &term, json).await,
        Commands::Config {
            action: ConfigCommands::Generate { output_path, force },
        } => config_generate(output_path, force).await,
        Commands::Serve => Err(CliError::CommandError(
            "serve is not a one-off command".to_string(),
        )),
    }
}
