//! Command-line interface definitions using clap

use clap::{Parser, Subcommand};

use crate::config::DEFAULT_CONFIG_PATH;

/// siteglue - dynamic request handlers for a static website
#[derive(Parser, Debug)]
#[command(name = "siteglue")]
#[command(version)]
#[command(about = "Redirects, micropub, search and webmentions for a static site", long_about = None)]
pub struct Cli {
    /// Configuration file (TOML)
    #[arg(long, short = 'c', global = true, default_value = DEFAULT_CONFIG_PATH)]
    pub config: String,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Run the HTTP server (default)
    Serve,

    /// Show how a request URI resolves against the rule tables
    Resolve {
        /// Request URI, e.g. /2014/05/old_post/
        uri: String,
    },

    /// Query the search database
    Search {
        /// Search term
        term: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },
}

/// Configuration management commands
#[derive(Subcommand, Debug, PartialEq, Eq)]
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
