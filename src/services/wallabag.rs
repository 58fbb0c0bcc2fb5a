//! Wallabag read-it-later client used for micropub likes

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, info, warn};
use ureq::Agent;

use crate::config::WallabagConfig;
use crate::errors::{Result, SiteGlueError};

#[async_trait]
pub trait Bookmarker: Send + Sync {
    /// Save `url` for later; failures are `Remote` errors
    async fn bookmark(&self, url: &str) -> Result<()>;
}

/// Password grant + `POST /api/entries`
#[derive(Clone)]
pub struct WallabagClient {
    config: WallabagConfig,
    agent: Agent,
}

impl WallabagClient {
    pub fn new(config: WallabagConfig, timeout: Duration) -> Self {
        // 需要读取错误响应的 body，所以不把 4xx/5xx 当作错误
        let agent = Agent::config_builder()
            .timeout_global(Some(timeout))
            .http_status_as_error(false)
            .build()
            .into();
        Self { config, agent }
    }

    fn base_url(&self) -> &str {
        self.config.url.trim_end_matches('/')
    }

    fn post_form(
        agent: &Agent,
        url: &str,
        bearer: Option<&str>,
        form: &[(&str, &str)],
    ) -> Result<String> {
        let mut req = agent.post(url);
        if let Some(token) = bearer {
            req = req.header("Authorization", format!("Bearer {}", token));
        }

        let resp = req.send_form(form.iter().copied()).map_err(|e| {
            warn!("Wallabag request to \"{}\" failed: {}", url, e);
            SiteGlueError::remote(format!("wallabag request failed: {}", e))
        })?;

        resp.into_body()
            .read_to_string()
            .map_err(|e| SiteGlueError::remote(format!("unreadable wallabag reply: {}", e)))
    }

    /// 同步执行完整流程（在 spawn_blocking 中调用）
    fn bookmark_sync(&self, target: &str) -> Result<()> {
        let base = self.base_url();

        let token_reply = Self::post_form(
            &self.agent,
            &format!("{}/oauth/v2/token", base),
            None,
            &[
                ("client_id", self.config.client_id.as_str()),
                ("client_secret", self.config.client_secret.as_str()),
                ("username", self.config.username.as_str()),
                ("password", self.config.password.as_str()),
                ("grant_type", "password"),
            ],
        )?;

        let access_token = access_token_from(&token_reply)?;
        debug!("Obtained wallabag access token");

        let save_reply = Self::post_form(
            &self.agent,
            &format!("{}/api/entries", base),
            Some(&access_token),
            &[("url", target), ("archive", "1")],
        )?;

        if serde_json::from_str::<Value>(&save_reply).is_err() {
            return Err(SiteGlueError::remote(format!(
                "failed to parse response to save from wallabag: {}",
                save_reply
            )));
        }

        info!("Saved to wallabag: {}", target);
        Ok(())
    }
}

/// Pull `access_token` out of the OAuth reply
fn access_token_from(reply: &str) -> Result<String> {
    serde_json::from_str::<Value>(reply)
        .ok()
        .and_then(|v| v.get("access_token").and_then(Value::as_str).map(String::from))
        .ok_or_else(|| {
            SiteGlueError::remote(format!(
                "failed to obtain access token from wallabag: {}",
                reply
            ))
        })
}

#[async_trait]
impl Bookmarker for WallabagClient {
    async fn bookmark(&self, url: &str) -> Result<()> {
        let client = self.clone();
        let url = url.to_string();
        tokio::task::spawn_blocking(move || client.bookmark_sync(&url))
            .await
            .map_err(|e| SiteGlueError::remote(format!("wallabag request aborted: {}", e)))?
    }
}
