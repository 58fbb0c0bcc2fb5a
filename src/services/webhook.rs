//! "Webmention received" notification hook

use std::sync::Arc;

use serde_json::Value;
use subtle::ConstantTimeEq;
use tracing::{info, warn};

use super::mailer::Mailer;
use crate::errors::{Result, SiteGlueError};

pub struct WebhookService {
    secret: String,
    author_email: String,
    mailer: Arc<dyn Mailer>,
}

impl WebhookService {
    pub fn new(secret: &str, author_email: &str, mailer: Arc<dyn Mailer>) -> Self {
        if secret.is_empty() {
            warn!("Webhook secret is empty, every notification will be rejected");
        }
        Self {
            secret: secret.to_string(),
            author_email: author_email.to_string(),
            mailer,
        }
    }

    fn secret_matches(&self, candidate: &str) -> bool {
        !self.secret.is_empty() && bool::from(self.secret.as_bytes().ct_eq(candidate.as_bytes()))
    }

    /// Validate the payload and mail the raw body to the author
    pub async fn notify(&self, raw: &str) -> Result<()> {
        let payload: Value = serde_json::from_str(raw)
            .map_err(|_| SiteGlueError::serialization("Unprocessable Entity"))?;

        let secret = payload.get("secret").and_then(Value::as_str);
        if !secret.is_some_and(|s| self.secret_matches(s)) {
            warn!("Webhook call with missing or wrong secret");
            return Err(SiteGlueError::validation("Bad Request"));
        }

        let source = match payload.get("source") {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Null) | None => String::new(),
            Some(other) => other.to_string(),
        };
        let subject = format!("[webmention] {}", source);

        self.mailer.send(&self.author_email, &subject, raw).await?;
        info!("Webmention notification mailed for {}", source);
        Ok(())
    }
}
