//! API 模块常量定义

/// 请求 ID 响应头
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// POST body 上限
pub const MAX_PAYLOAD_BYTES: usize = 1024 * 1024;

pub const CONTENT_TYPE_HTML: &str = "text/html; charset=utf-8";
pub const CONTENT_TYPE_TEXT: &str = "text/plain; charset=utf-8";
pub const CONTENT_TYPE_XML: &str = "text/xml; charset=utf-8";
pub const CONTENT_TYPE_JSON: &str = "application/json; charset=utf-8";
