//! URL 验证模块
//!
//! Webmention source/target 与 micropub like-of URL 的校验

use url::Url;

/// URL 验证错误
#[derive(Debug)]
pub enum UrlValidationError {
    EmptyUrl,
    InvalidProtocol(String),
    InvalidFormat(String),
    MissingHost,
}

impl std::fmt::Display for UrlValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyUrl => write!(f, "URL cannot be empty"),
            Self::InvalidProtocol(proto) => write!(
                f,
                "Invalid protocol: {}. Only http:// and https:// are allowed",
                proto
            ),
            Self::InvalidFormat(msg) => write!(f, "Invalid URL format: {}", msg),
            Self::MissingHost => write!(f, "URL has no host"),
        }
    }
}

impl std::error::Error for UrlValidationError {}

/// Parse an absolute http(s) URL that carries a host
pub fn parse_http_url(url: &str) -> Result<Url, UrlValidationError> {
    let url = url.trim();

    if url.is_empty() {
        return Err(UrlValidationError::EmptyUrl);
    }

    let url_lower = url.to_lowercase();
    if !url_lower.starts_with("http://") && !url_lower.starts_with("https://") {
        let proto = url_lower
            .split(':')
            .next()
            .map(|s| format!("{}:", s))
            .unwrap_or_default();
        return Err(UrlValidationError::InvalidProtocol(proto));
    }

    let parsed = Url::parse(url).map_err(|e| UrlValidationError::InvalidFormat(e.to_string()))?;
    if parsed.host_str().is_none_or(str::is_empty) {
        return Err(UrlValidationError::MissingHost);
    }
    Ok(parsed)
}

/// Whether `url`'s host is one of `domains` (case-insensitive)
pub fn host_in(url: &Url, domains: &[String]) -> bool {
    url.host_str()
        .is_some_and(|host| domains.iter().any(|d| d.eq_ignore_ascii_case(host)))
}
