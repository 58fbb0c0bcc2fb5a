use std::fs;
use std::path::Path;

use serde::Deserialize;
use tracing::{debug, info, warn};

use super::RuleTable;
use crate::config::{RedirectRule, RewriteRule, RulesConfig};
use crate::errors::{Result, SiteGlueError};

/// Layout of the optional standalone rules file
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RulesFile {
    #[serde(default)]
    pub redirects: Vec<RedirectRule>,
    #[serde(default)]
    pub rewrites: Vec<RewriteRule>,
    #[serde(default)]
    pub gone: Vec<String>,
    #[serde(default)]
    pub gone_patterns: Vec<String>,
}

impl RulesFile {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|e| {
            SiteGlueError::file_operation(format!(
                "cannot read rules file {}: {}",
                path.display(),
                e
            ))
        })?;
        Ok(toml::from_str(&raw)?)
    }
}

/// Entries found in a content tree
#[derive(Debug, Default)]
pub struct ContentRules {
    /// `(slug, target)` from `*.lnk`
    pub redirects: Vec<(String, String)>,
    /// slugs from `*.ptr`
    pub gone: Vec<String>,
}

/// Scan `<dir>/<category>/*.lnk` and `<dir>/<category>/*.ptr`
pub fn scan_content_dir<P: AsRef<Path>>(dir: P) -> Result<ContentRules> {
    let dir = dir.as_ref();
    let mut found = ContentRules::default();

    for category in fs::read_dir(dir)? {
        let category = category?.path();
        if !category.is_dir() {
            continue;
        }

        for entry in fs::read_dir(&category)? {
            let path = entry?.path();
            let Some(slug) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };

            match path.extension().and_then(|e| e.to_str()) {
                Some("lnk") => {
                    let target = fs::read_to_string(&path)?.trim().to_string();
                    if target.is_empty() {
                        warn!("Empty redirect file ignored: {}", path.display());
                        continue;
                    }
                    found.redirects.push((slug.to_string(), target));
                }
                Some("ptr") => found.gone.push(slug.to_string()),
                _ => {}
            }
        }
    }

    debug!(
        "Content scan of {}: {} redirects, {} gone",
        dir.display(),
        found.redirects.len(),
        found.gone.len()
    );
    Ok(found)
}

impl RuleTable {
    /// Build from inline config, the optional rules file and the content tree
    pub fn from_config(config: &RulesConfig) -> Result<Self> {
        let mut table = RuleTable::new();

        table.extend(
            &config.redirects,
            &config.rewrites,
            &config.gone,
            &config.gone_patterns,
        )?;

        if let Some(ref file) = config.file {
            let extra = RulesFile::from_path(file)?;
            table.extend(
                &extra.redirects,
                &extra.rewrites,
                &extra.gone,
                &extra.gone_patterns,
            )?;
        }

        if let Some(ref dir) = config.content_dir {
            let content = scan_content_dir(dir)?;
            for (slug, target) in content.redirects {
                table.add_redirect(slug, target);
            }
            for slug in content.gone {
                table.add_gone(slug);
            }
        }

        info!(
            "Rule table loaded: {} redirects, {} rewrites, {} gone, {} gone patterns",
            table.redirect_count(),
            table.rewrite_count(),
            table.gone_count(),
            table.gone_pattern_count()
        );
        Ok(table)
    }

    fn extend(
        &mut self,
        redirects: &[RedirectRule],
        rewrites: &[RewriteRule],
        gone: &[String],
        gone_patterns: &[String],
    ) -> Result<()> {
        for rule in redirects {
            self.add_redirect(rule.from.trim_matches('/'), rule.to.as_str());
        }
        for rule in rewrites {
            self.add_rewrite(&rule.pattern, &rule.target)?;
        }
        for uri in gone {
            self.add_gone(uri.trim_matches('/'));
        }
        for pattern in gone_patterns {
            self.add_gone_pattern(pattern)?;
        }
        Ok(())
    }
}
