//! Redirect and gone rule tables
//!
//! A `RuleTable` is built once at startup (and again on reload) from the
//! configured tables, an optional rules file and the content tree. Lookups
//! are read-only and lock-free.

mod loader;

use std::collections::{HashMap, HashSet};

use regex::{Regex, RegexBuilder};

use crate::errors::{Result, SiteGlueError};

pub use loader::{ContentRules, RulesFile, scan_content_dir};

/// Outcome of a rule table lookup for a normalized uri
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleMatch {
    /// Content was deleted
    Gone,
    /// Raw redirect target, relative or absolute
    Redirect(String),
    /// No rule matched but the uri contains `_`; the dashed variant may exist
    Candidate(String),
    NoMatch,
}

/// Regex rewrite, compiled case-insensitive
#[derive(Debug, Clone)]
pub struct CompiledRewrite {
    pattern: Regex,
    target: String,
}

impl CompiledRewrite {
    pub fn new(pattern: &str, target: &str) -> Result<Self> {
        let compiled = RegexBuilder::new(pattern)
            .case_insensitive(true)
            .build()
            .map_err(|e| {
                SiteGlueError::invalid_rule(format!("rewrite pattern '{}': {}", pattern, e))
            })?;
        Ok(Self {
            pattern: compiled,
            target: target.to_string(),
        })
    }

    /// Apply to `uri`, substituting `$1`..`$9` with the captured groups
    pub fn apply(&self, uri: &str) -> Option<String> {
        let caps = self.pattern.captures(uri)?;
        let mut target = self.target.clone();
        // 从 $9 倒序替换，组不存在时替换为空串
        for idx in (1..=9).rev() {
            let placeholder = format!("${}", idx);
            if target.contains(&placeholder) {
                let value = caps.get(idx).map(|m| m.as_str()).unwrap_or("");
                target = target.replace(&placeholder, value);
            }
        }
        Some(target)
    }
}

#[derive(Debug, Clone, Default)]
pub struct RuleTable {
    redirects: HashMap<String, String>,
    rewrites: Vec<CompiledRewrite>,
    gone: HashSet<String>,
    gone_patterns: Vec<Regex>,
}

impl RuleTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_redirect(&mut self, from: impl Into<String>, to: impl Into<String>) {
        self.redirects.insert(from.into(), to.into());
    }

    pub fn add_rewrite(&mut self, pattern: &str, target: &str) -> Result<()> {
        self.rewrites.push(CompiledRewrite::new(pattern, target)?);
        Ok(())
    }

    pub fn add_gone(&mut self, uri: impl Into<String>) {
        self.gone.insert(uri.into());
    }

    pub fn add_gone_pattern(&mut self, pattern: &str) -> Result<()> {
        let compiled = Regex::new(pattern).map_err(|e| {
            SiteGlueError::invalid_rule(format!("gone pattern '{}': {}", pattern, e))
        })?;
        self.gone_patterns.push(compiled);
        Ok(())
    }

    /// Look up a normalized uri (no leading or trailing slashes)
    ///
    /// Order: gone patterns, rewrites, exact gone, exact redirect,
    /// underscore candidate.
    pub fn lookup(&self, uri: &str) -> RuleMatch {
        if self.gone_patterns.iter().any(|re| re.is_match(uri)) {
            return RuleMatch::Gone;
        }

        if let Some(target) = self.rewrites.iter().find_map(|rw| rw.apply(uri)) {
            return RuleMatch::Redirect(target);
        }

        if self.gone.contains(uri) {
            return RuleMatch::Gone;
        }

        if let Some(target) = self.redirects.get(uri) {
            return RuleMatch::Redirect(target.clone());
        }

        if uri.contains('_') {
            return RuleMatch::Candidate(uri.replace('_', "-"));
        }

        RuleMatch::NoMatch
    }

    pub fn redirect_count(&self) -> usize {
        self.redirects.len()
    }

    pub fn rewrite_count(&self) -> usize {
        self.rewrites.len()
    }

    pub fn gone_count(&self) -> usize {
        self.gone.len()
    }

    pub fn gone_pattern_count(&self) -> usize {
        self.gone_patterns.len()
    }
}
