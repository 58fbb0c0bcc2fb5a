//! CLI command implementations

mod config_gen;
mod resolve;
mod search;

pub use config_gen::config_generate;
pub use resolve::resolve_uri;
pub use search::search_index;
