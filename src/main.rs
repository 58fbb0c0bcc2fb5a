use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, info};

use siteglue::cli::{Cli, Commands};
use siteglue::config::init_config;
use siteglue::runtime::modes::{run_cli, run_server};
use siteglue::system::init_logging;

#[actix_web::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config = match init_config(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e.format_colored());
            std::process::exit(1);
        }
    };

    match cli.command {
        None | Some(Commands::Serve) => {
            let _guard = init_logging(&config.logging).context("Failed to initialize logging")?;
            info!("siteglue {} starting", env!("CARGO_PKG_VERSION"));
            debug!("Configuration loaded from {}", cli.config);
            run_server(&config, &cli.config).await
        }
        Some(cmd) => {
            if let Err(e) = run_cli(cmd, &config).await {
                eprintln!("{}", e.format_colored());
                std::process::exit(1);
            }
            Ok(())
        }
    }
}
