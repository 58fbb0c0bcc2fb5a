//! Execution modes

pub mod cli;
pub mod server;

pub use cli::run_cli;
pub use server::{configure_app, run_server};
