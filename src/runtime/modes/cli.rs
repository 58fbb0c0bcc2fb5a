//! CLI mode
//!
//! One-off commands; delegates to the CLI implementation.

use crate::cli::Commands;
use crate::config::StaticConfig;
use crate::interfaces::cli::CliError;

pub async fn run_cli(cmd: Commands, config: &StaticConfig) -> Result<(), CliError> {
    crate::runtime::lifetime::startup::install_crypto_provider();
    crate::interfaces::cli::run_cli_command(cmd, config).await
}
