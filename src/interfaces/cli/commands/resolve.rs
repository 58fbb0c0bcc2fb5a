use colored::Colorize;

use crate::config::StaticConfig;
use crate::interfaces::cli::CliError;
use crate::runtime::lifetime::startup::build_resolver;
use crate::services::Resolution;
use crate::services::resolver::normalize_uri;

/// Print what the server would answer for `uri`
pub async fn resolve_uri(config: &StaticConfig, uri: &str) -> Result<(), CliError> {
    let resolver = build_resolver(config).map_err(|e| CliError::ConfigError(format!("{:#}", e)))?;

    println!("{} {}", "Normalized:".dimmed(), normalize_uri(uri));
    match resolver.resolve(uri).await {
        Resolution::Redirect { location } => {
            println!("{} {}", "301 Moved Permanently".green().bold(), location.blue());
        }
        Resolution::Gone { uri } => {
            println!("{} {}", "410 Gone".yellow().bold(), uri);
        }
        Resolution::NotFound { uri } => {
            println!("{} {}", "404 Not Found".red().bold(), uri);
        }
    }
    Ok(())
}
