pub mod fallback;
pub mod health;
pub mod micropub;
pub mod search;
pub mod webhook;
pub mod webmention;

use actix_web::HttpResponse;
use actix_web::http::StatusCode;
use tracing::{error, info};

use crate::api::constants::CONTENT_TYPE_TEXT;
use crate::errors::SiteGlueError;

pub use fallback::{FallbackService, fallback_service};
pub use health::{AppStartTime, HealthService, health_routes};
pub use micropub::{MicropubEndpoint, micropub_routes};
pub use search::{SearchEndpoint, search_routes};
pub use webhook::{WebhookEndpoint, webhook_routes};
pub use webmention::{WebmentionEndpoint, webmention_routes};

#[inline]
pub(crate) fn text_response(status: StatusCode, body: impl Into<String>) -> HttpResponse {
    HttpResponse::build(status)
        .insert_header(("Content-Type", CONTENT_TYPE_TEXT))
        .body(body.into())
}

/// Map a service error to a plain text reply
///
/// Client errors echo the message; server errors are logged and answered
/// generically.
pub(crate) fn error_response(err: &SiteGlueError) -> HttpResponse {
    let status = err.http_status();
    if status.is_server_error() {
        error!("{} {}: {}", err.code(), err.error_type(), err.message());
        text_response(status, "Internal Server Error")
    } else {
        info!("{} {}: {}", status.as_u16(), err.code(), err.message());
        text_response(status, err.message())
    }
}

/// Decode a urlencoded string into `(key, value)` pairs
pub(crate) fn query_pairs(raw: &str) -> Vec<(String, String)> {
    url::form_urlencoded::parse(raw.as_bytes())
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect()
}
