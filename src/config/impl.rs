use std::sync::{Arc, OnceLock};

use arc_swap::ArcSwap;

use super::StaticConfig;
use crate::errors::Result;

static CONFIG: OnceLock<ArcSwap<StaticConfig>> = OnceLock::new();

/// Get the global configuration instance
///
/// Returns an Arc pointer to the configuration, which is cheap to clone
/// and doesn't hold any locks. Falls back to defaults when `init_config`
/// has not run (tests, one-off CLI commands).
pub fn get_config() -> Arc<StaticConfig> {
    CONFIG
        .get_or_init(|| ArcSwap::from_pointee(StaticConfig::default()))
        .load_full()
}

/// Initialize the global configuration from `path`
///
/// # Examples
/// ```no_run
/// use siteglue::config::init_config;
/// init_config("config.toml").unwrap();
/// ```
pub fn init_config(path: &str) -> Result<Arc<StaticConfig>> {
    let loaded = StaticConfig::load(path)?;
    set_config(loaded);
    Ok(get_config())
}

/// Replace the global configuration
pub fn set_config(config: StaticConfig) {
    CONFIG
        .get_or_init(|| ArcSwap::from_pointee(StaticConfig::default()))
        .store(Arc::new(config));
}
