//! SIGHUP driven rule table reload (unix only)

use std::sync::Arc;

use crate::config::{StaticConfig, set_config};
use crate::errors::{Result, SiteGlueError};
use crate::rules::RuleTable;
use crate::services::Resolver;

/// Re-read `config_path`, rebuild the rule table and swap both in
///
/// File access (config file, rules file, content tree scan) runs on the
/// blocking pool. On error the current rules and config stay in place.
pub async fn reload_from_path(config_path: &str, resolver: &Resolver) -> Result<()> {
    let path = config_path.to_string();
    let (config, table) = tokio::task::spawn_blocking(move || {
        let config = StaticConfig::load(&path)?;
        let table = RuleTable::from_config(&config.rules)?;
        Ok::<_, SiteGlueError>((config, table))
    })
    .await
    .map_err(|e| SiteGlueError::config(format!("reload task failed: {}", e)))??;

    resolver.replace_rules(table);
    set_config(config);
    Ok(())
}

#[cfg(unix)]
pub fn setup_reload_mechanism(config_path: String, resolver: Arc<Resolver>) {
    use tokio::signal::unix::{SignalKind, signal};
    use tracing::{error, info, warn};

    tokio::spawn(async move {
        let mut stream = match signal(SignalKind::hangup()) {
            Ok(s) => s,
            Err(e) => {
                warn!(
                    "Failed to create SIGHUP handler: {}. Rule reload via signal disabled.",
                    e
                );
                return;
            }
        };

        while stream.recv().await.is_some() {
            info!("Received SIGHUP, reloading rule tables...");

            if let Err(e) = reload_from_path(&config_path, &resolver).await {
                error!("Reload failed, keeping current rules: {}", e);
            }
        }
    });
}

#[cfg(not(unix))]
pub fn setup_reload_mechanism(_config_path: String, _resolver: Arc<Resolver>) {
    tracing::debug!("Signal based reload is not available on this platform");
}
