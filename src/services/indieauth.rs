//! IndieAuth token verification against a remote token endpoint

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{trace, warn};
use ureq::Agent;

use crate::errors::{Result, SiteGlueError};

/// Fields of a token endpoint reply that matter here
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenInfo {
    pub me: String,
    pub scope: String,
}

#[async_trait]
pub trait TokenVerifier: Send + Sync {
    /// Verify a bearer token; any failure is an `Unauthorized` error
    async fn verify(&self, token: &str) -> Result<TokenInfo>;
}

fn value_to_string(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// Parse a token endpoint reply (JSON object or form encoded)
pub fn parse_verification(body: &str) -> Result<TokenInfo> {
    let (mut me, mut scope) = (None, None);

    match serde_json::from_str::<Value>(body) {
        Ok(Value::Object(map)) => {
            me = map.get("me").and_then(value_to_string);
            scope = map.get("scope").and_then(value_to_string);
        }
        _ => {
            // form 编码的响应，先整体 urldecode 再拆分
            let decoded = urlencoding::decode(body)
                .map(|s| s.into_owned())
                .unwrap_or_else(|_| body.to_string());
            for (key, value) in url::form_urlencoded::parse(decoded.as_bytes()) {
                match key.as_ref() {
                    "me" => me = Some(value.into_owned()),
                    "scope" => scope = Some(value.into_owned()),
                    _ => {}
                }
            }
        }
    }

    let scope = scope.ok_or_else(|| SiteGlueError::unauthorized("missing \"scope\""))?;
    let me = me.ok_or_else(|| SiteGlueError::unauthorized("missing \"me\""))?;
    Ok(TokenInfo { me, scope })
}

/// Verifier calling the configured token endpoint with `ureq`
pub struct IndieAuthVerifier {
    endpoint: String,
    agent: Agent,
}

impl IndieAuthVerifier {
    pub fn new(endpoint: &str, timeout: Duration) -> Self {
        let agent = Agent::config_builder()
            .timeout_global(Some(timeout))
            .build()
            .into();
        Self {
            endpoint: endpoint.to_string(),
            agent,
        }
    }

    /// 同步请求，在 spawn_blocking 中调用
    fn fetch_sync(agent: Agent, endpoint: String, token: String) -> Result<String> {
        let resp = agent
            .get(&endpoint)
            .header("Content-Type", "application/x-www-form-urlencoded")
            .header("Authorization", format!("Bearer {}", token))
            .call()
            .map_err(|e| {
                warn!("Token endpoint request to \"{}\" failed: {}", endpoint, e);
                SiteGlueError::unauthorized(format!("token verification failed: {}", e))
            })?;

        resp.into_body().read_to_string().map_err(|e| {
            SiteGlueError::unauthorized(format!("unreadable token endpoint reply: {}", e))
        })
    }
}

#[async_trait]
impl TokenVerifier for IndieAuthVerifier {
    async fn verify(&self, token: &str) -> Result<TokenInfo> {
        let agent = self.agent.clone();
        let endpoint = self.endpoint.clone();
        let token = token.to_string();

        let body = tokio::task::spawn_blocking(move || Self::fetch_sync(agent, endpoint, token))
            .await
            .map_err(|e| {
                SiteGlueError::unauthorized(format!("token verification aborted: {}", e))
            })??;

        trace!("Token endpoint replied: {}", body);
        parse_verification(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_json_reply() {
        let info = parse_verification(
            r#"{"me":"https://example.net/","scope":"create update","client_id":"x"}"#,
        )
        .unwrap();
        assert_eq!(info.me, "https://example.net/");
        assert_eq!(info.scope, "create update");
    }

    #[test]
    fn test_parse_form_reply() {
        let info =
            parse_verification("me=https%3A%2F%2Fexample.net%2F&scope=create&issued_by=x").unwrap();
        assert_eq!(info.me, "https://example.net/");
        assert_eq!(info.scope, "create");
    }

    #[test]
    fn test_missing_fields() {
        let err = parse_verification("me=https://example.net/").unwrap_err();
        assert_eq!(err.message(), "missing \"scope\"");

        let err = parse_verification(r#"{"scope":"create"}"#).unwrap_err();
        assert_eq!(err.message(), "missing \"me\"");

        let err = parse_verification(r#"{"error":"invalid_token"}"#).unwrap_err();
        assert!(matches!(err, SiteGlueError::Unauthorized(_)));
    }
}
