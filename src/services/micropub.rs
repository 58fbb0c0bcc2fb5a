//! Micropub publishing flow
//!
//! Decode the payload, authenticate the token, then either bookmark a like
//! or queue the post for the site generator.

use std::path::PathBuf;
use std::sync::Arc;

use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use super::indieauth::TokenVerifier;
use super::queue::PostQueue;
use super::wallabag::Bookmarker;
use crate::errors::{Result, SiteGlueError};
use crate::utils::parse_form;

/// Where an accepted post went
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Publication {
    Bookmarked(String),
    Queued(PathBuf),
}

/// JSON first, bracket-key form data as fallback
pub fn decode_payload(raw: &str) -> Result<Map<String, Value>> {
    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(map)) if !map.is_empty() => return Ok(map),
        Ok(_) => debug!("JSON payload empty or not an object, trying form data"),
        Err(_) => debug!("failed to decode JSON, trying form data"),
    }

    let form = parse_form(raw);
    if form.is_empty() {
        return Err(SiteGlueError::validation("invalid POST contents"));
    }
    Ok(form)
}

fn as_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// Token from `access_token` (removed from the payload) or the
/// `Authorization` header
pub fn extract_token(payload: &mut Map<String, Value>, authorization: Option<&str>) -> Option<String> {
    let token = match payload.remove("access_token") {
        Some(value) => as_text(&value),
        None => authorization.map(|header| header.replace("Bearer", "").trim().to_string()),
    };
    token.filter(|t| !t.is_empty())
}

/// `properties.like-of`, else `like-of`; arrays yield their last element
pub fn like_of(payload: &Map<String, Value>) -> Option<String> {
    let nested = payload
        .get("properties")
        .and_then(|p| p.get("like-of"))
        .filter(|v| !v.is_null());
    let value = nested.or_else(|| payload.get("like-of"))?;

    let picked = match value {
        Value::Array(items) => items.last()?,
        other => other,
    };
    as_text(picked).filter(|url| !url.is_empty())
}

pub struct MicropubService {
    verifier: Arc<dyn TokenVerifier>,
    bookmarker: Option<Arc<dyn Bookmarker>>,
    queue: PostQueue,
    site_name: String,
    categories: Vec<String>,
}

impl MicropubService {
    pub fn new(
        verifier: Arc<dyn TokenVerifier>,
        bookmarker: Option<Arc<dyn Bookmarker>>,
        queue: PostQueue,
        site_name: &str,
        categories: Vec<String>,
    ) -> Self {
        Self {
            verifier,
            bookmarker,
            queue,
            site_name: site_name.to_string(),
            categories,
        }
    }

    /// Answer to `q=config`
    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    async fn authenticate(&self, token: &str) -> Result<()> {
        let info = self.verifier.verify(token).await?;
        if !info
            .me
            .to_lowercase()
            .contains(&self.site_name.to_lowercase())
        {
            warn!("Token for foreign identity rejected: {}", info.me);
            return Err(SiteGlueError::unauthorized("wrong domain"));
        }
        debug!("Token accepted for {} (scope: {})", info.me, info.scope);
        Ok(())
    }

    pub async fn publish(&self, raw: &str, authorization: Option<&str>) -> Result<Publication> {
        let mut payload = decode_payload(raw)?;

        let token = extract_token(&mut payload, authorization)
            .ok_or_else(|| SiteGlueError::unauthorized("missing token"))?;
        self.authenticate(&token).await?;

        if let Some(url) = like_of(&payload) {
            match self.bookmarker {
                Some(ref bookmarker) => {
                    bookmarker.bookmark(&url).await?;
                    info!("Like bookmarked: {}", url);
                    return Ok(Publication::Bookmarked(url));
                }
                None => debug!("No bookmarking service configured, queueing like"),
            }
        }

        let path = self.queue.push(&Value::Object(payload)).await?;
        info!("Micropub post queued: {}", path.display());
        Ok(Publication::Queued(path))
    }
}
