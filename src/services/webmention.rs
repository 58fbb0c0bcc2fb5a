//! Webmention receiver: validate and queue incoming mentions

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::queue::PostQueue;
use crate::errors::{Result, SiteGlueError};
use crate::utils::{host_in, parse_http_url};

/// Form fields of a webmention request
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MentionForm {
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub target: String,
}

/// Queued mention
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Mention {
    pub source: String,
    pub target: String,
    /// RFC 3339
    pub received: String,
}

pub struct WebmentionService {
    domains: Vec<String>,
    queue: PostQueue,
}

impl WebmentionService {
    pub fn new(domains: Vec<String>, queue: PostQueue) -> Self {
        Self { domains, queue }
    }

    pub fn validate(&self, form: &MentionForm) -> Result<Mention> {
        let source = parse_http_url(&form.source).map_err(|e| {
            debug!("Rejected source '{}': {}", form.source, e);
            SiteGlueError::validation("invalid source url")
        })?;
        let target = parse_http_url(&form.target).map_err(|e| {
            debug!("Rejected target '{}': {}", form.target, e);
            SiteGlueError::validation("invalid target url")
        })?;

        if !host_in(&target, &self.domains) {
            return Err(SiteGlueError::validation("target domain is not me"));
        }
        if host_in(&source, &self.domains) {
            return Err(SiteGlueError::validation("selfpings are not allowed"));
        }

        Ok(Mention {
            source: source.to_string(),
            target: target.to_string(),
            received: Utc::now().to_rfc3339(),
        })
    }

    pub async fn receive(&self, form: &MentionForm) -> Result<Mention> {
        let mention = self.validate(form)?;
        self.queue.push(&mention).await?;
        info!("Webmention queued: {} -> {}", mention.source, mention.target);
        Ok(mention)
    }
}
