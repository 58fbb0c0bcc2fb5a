//! Redirect / gone resolution for requests no other route claims

use std::path::PathBuf;
use std::sync::Arc;

use arc_swap::ArcSwap;
use tracing::{debug, info, trace};

use crate::config::{RulesConfig, SiteConfig};
use crate::errors::Result;
use crate::rules::{RuleMatch, RuleTable};

/// What to answer for a request uri
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Gone { uri: String },
    Redirect { location: String },
    NotFound { uri: String },
}

/// 允许出现在 URL 中的字符（其余全部丢弃）
fn is_url_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || "$-_.+!*'(),{}|\\^~[]`<>#%\";/?:@&=".contains(c)
}

/// Sanitize a raw request uri into a rule table key
///
/// Characters not allowed in URLs are dropped, `../`, `/feed/` and `/atom/`
/// are removed and slashes are trimmed from both ends.
pub fn normalize_uri(request_uri: &str) -> String {
    let sanitized: String = request_uri.chars().filter(|c| is_url_char(*c)).collect();
    sanitized
        .replace("../", "")
        .replace("/feed/", "")
        .replace("/atom/", "")
        .trim_matches('/')
        .to_string()
}

pub struct Resolver {
    rules: ArcSwap<RuleTable>,
    site_url: String,
    docroot: PathBuf,
}

impl Resolver {
    pub fn new(rules: RuleTable, site: &SiteConfig) -> Self {
        Self {
            rules: ArcSwap::from_pointee(rules),
            site_url: site.url.trim_end_matches('/').to_string(),
            docroot: PathBuf::from(&site.docroot),
        }
    }

    /// Absolute `Location` for a rule target
    pub fn absolute_target(&self, target: &str) -> String {
        if target.starts_with("http") {
            target.to_string()
        } else {
            format!("{}/{}/", self.site_url, target.trim_matches('/'))
        }
    }

    pub async fn resolve(&self, request_uri: &str) -> Resolution {
        let uri = normalize_uri(request_uri);
        let rules = self.rules.load();

        match rules.lookup(&uri) {
            RuleMatch::Gone => {
                debug!("Gone: {}", uri);
                Resolution::Gone { uri }
            }
            RuleMatch::Redirect(target) => {
                let location = self.absolute_target(&target);
                debug!("Redirect: {} -> {}", uri, location);
                Resolution::Redirect { location }
            }
            RuleMatch::Candidate(candidate) => {
                let index = self.docroot.join(&candidate).join("index.html");
                if tokio::fs::try_exists(&index).await.unwrap_or(false) {
                    let location = self.absolute_target(&candidate);
                    debug!("Redirect (dashed): {} -> {}", uri, location);
                    Resolution::Redirect { location }
                } else {
                    trace!("No page for dashed candidate {}", candidate);
                    Resolution::NotFound { uri }
                }
            }
            RuleMatch::NoMatch => {
                trace!("Not found: {}", uri);
                Resolution::NotFound { uri }
            }
        }
    }

    /// Rebuild the rule table and swap it in; the old table stays on error
    pub fn reload(&self, config: &RulesConfig) -> Result<()> {
        let table = RuleTable::from_config(config)?;
        self.replace_rules(table);
        Ok(())
    }

    /// Swap in an already built table
    pub fn replace_rules(&self, table: RuleTable) {
        self.rules.store(Arc::new(table));
        info!("Rule table reloaded");
    }

    pub fn rules(&self) -> Arc<RuleTable> {
        self.rules.load_full()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_uri() {
        assert_eq!(normalize_uri("/some/post/"), "some/post");
        assert_eq!(normalize_uri("/a/../../b/"), "a/b");
        assert_eq!(normalize_uri("/journal/feed/"), "journal");
        assert_eq!(normalize_uri("/x/atom/y"), "xy");
        assert_eq!(normalize_uri("/caf\u{e9} space/"), "cafspace");
        assert_eq!(normalize_uri("///"), "");
    }

    #[test]
    fn test_normalize_keeps_query_characters() {
        assert_eq!(normalize_uri("/?p=123&x=y"), "?p=123&x=y");
    }

    #[test]
    fn test_absolute_target() {
        let resolver = Resolver::new(RuleTable::new(), &SiteConfig::default());
        assert_eq!(
            resolver.absolute_target("https://other.example/x"),
            "https://other.example/x"
        );
        assert_eq!(
            resolver.absolute_target("/new-post/"),
            "https://example.net/new-post/"
        );
        assert_eq!(resolver.absolute_target("a/b"), "https://example.net/a/b/");
    }
}
