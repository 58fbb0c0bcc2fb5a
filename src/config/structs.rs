use serde::{Deserialize, Serialize};

use crate::errors::{Result, SiteGlueError};

/// 默认配置文件路径
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// 静态配置（从 TOML 加载，启动时使用）
///
/// 优先级：ENV > config.toml > 默认值
/// ENV 前缀：SG，分隔符：__
/// 示例：SG__SERVER__PORT=9999
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StaticConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub site: SiteConfig,
    #[serde(default)]
    pub routes: RouteConfig,
    #[serde(default)]
    pub rules: RulesConfig,
    #[serde(default)]
    pub micropub: MicropubConfig,
    #[serde(default)]
    pub wallabag: Option<WallabagConfig>,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub webhook: WebhookConfig,
    #[serde(default)]
    pub smtp: SmtpConfig,
    #[serde(default)]
    pub webmention: WebmentionConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl StaticConfig {
    /// Load from the given TOML file (optional) and `SG__*` environment variables
    ///
    /// A missing file is not an error, a malformed one is.
    pub fn load(path: &str) -> Result<Self> {
        use config::{Config, Environment, File};

        let settings = Config::builder()
            .add_source(File::with_name(path).required(false))
            .add_source(
                Environment::with_prefix("SG")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| SiteGlueError::config(format!("failed to build config: {}", e)))?;

        settings
            .try_deserialize::<StaticConfig>()
            .map_err(|e| SiteGlueError::config(format!("failed to deserialize config: {}", e)))
    }

    /// 生成示例 TOML 配置文件
    pub fn generate_sample_config() -> String {
        let mut sample = Self::default();
        sample.rules.redirects.push(RedirectRule {
            from: "old-post".to_string(),
            to: "new-post".to_string(),
        });
        sample.rules.rewrites.push(RewriteRule {
            pattern: "^(?:[0-9]{4})/[0-9]{2}/(.*)$".to_string(),
            target: "$1".to_string(),
        });
        sample.rules.gone.push("deleted-post".to_string());
        sample.rules.gone_patterns.push("^wp-(?:content|admin)".to_string());
        sample.wallabag = Some(WallabagConfig::default());
        toml::to_string_pretty(&sample)
            .unwrap_or_else(|e| format!("# Error generating sample config: {}", e))
    }
}

/// 服务器配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_server_host")]
    pub host: String,
    #[serde(default = "default_server_port")]
    pub port: u16,
    #[serde(default)]
    pub unix_socket: Option<String>,
    #[serde(default = "default_cpu_count")]
    pub cpu_count: usize,
}

/// 站点信息
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Base URL, no trailing slash
    #[serde(default = "default_site_url")]
    pub url: String,
    /// Domain an IndieAuth `me` has to contain
    #[serde(default = "default_site_name")]
    pub name: String,
    /// Hosts that count as this site for webmentions
    #[serde(default = "default_site_domains")]
    pub domains: Vec<String>,
    /// Generated site root, used for `slug_name` -> `slug-name` fallbacks
    #[serde(default = "default_docroot")]
    pub docroot: String,
}

/// 路由配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteConfig {
    #[serde(default = "default_micropub_route")]
    pub micropub: String,
    #[serde(default = "default_search_route")]
    pub search: String,
    #[serde(default = "default_webhook_route")]
    pub webhook: String,
    #[serde(default = "default_webmention_route")]
    pub webmention: String,
    #[serde(default = "default_health_route")]
    pub health: String,
}

/// 重定向 / 410 规则表
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct RulesConfig {
    /// Extra TOML file holding the same four tables
    #[serde(default)]
    pub file: Option<String>,
    /// Content tree scanned for `*.lnk` (redirect) and `*.ptr` (gone) files
    #[serde(default)]
    pub content_dir: Option<String>,
    #[serde(default)]
    pub redirects: Vec<RedirectRule>,
    #[serde(default)]
    pub rewrites: Vec<RewriteRule>,
    #[serde(default)]
    pub gone: Vec<String>,
    #[serde(default)]
    pub gone_patterns: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RedirectRule {
    pub from: String,
    pub to: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RewriteRule {
    pub pattern: String,
    pub target: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MicropubConfig {
    #[serde(default = "default_token_endpoint")]
    pub token_endpoint: String,
    #[serde(default = "default_micropub_queue_dir")]
    pub queue_dir: String,
    /// Answer to `q=config`
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default = "default_http_timeout")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct WallabagConfig {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub client_id: String,
    #[serde(default)]
    pub client_secret: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    #[serde(default = "default_search_database")]
    pub database: String,
    #[serde(default = "default_search_pool_size")]
    pub pool_size: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct WebhookConfig {
    #[serde(default)]
    pub secret: String,
    #[serde(default)]
    pub author_email: String,
    #[serde(default)]
    pub from_email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SmtpConfig {
    #[serde(default = "default_smtp_host")]
    pub host: String,
    #[serde(default = "default_smtp_port")]
    pub port: u16,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub starttls: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebmentionConfig {
    #[serde(default = "default_webmention_queue_dir")]
    pub queue_dir: String,
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
    #[serde(default)]
    pub file: Option<String>,
    #[serde(default = "default_max_backups")]
    pub max_backups: u32,
    #[serde(default = "default_enable_rotation")]
    pub enable_rotation: bool,
}

// ============================================================
// Default value functions
// ============================================================

fn default_server_host() -> String {
    "127.0.0.1".to_string()
}

fn default_server_port() -> u16 {
    8080
}

fn default_cpu_count() -> usize {
    num_cpus::get()
}

fn default_site_url() -> String {
    "https://example.net".to_string()
}

fn default_site_name() -> String {
    "example.net".to_string()
}

fn default_site_domains() -> Vec<String> {
    vec!["example.net".to_string(), "www.example.net".to_string()]
}

fn default_docroot() -> String {
    "www".to_string()
}

fn default_micropub_route() -> String {
    "/micropub".to_string()
}

fn default_search_route() -> String {
    "/search".to_string()
}

fn default_webhook_route() -> String {
    "/webhook".to_string()
}

fn default_webmention_route() -> String {
    "/webmention".to_string()
}

fn default_health_route() -> String {
    "/health".to_string()
}

fn default_token_endpoint() -> String {
    "https://tokens.indieauth.com/token".to_string()
}

fn default_micropub_queue_dir() -> String {
    "queue".to_string()
}

fn default_http_timeout() -> u64 {
    10
}

fn default_search_database() -> String {
    "search.sqlite".to_string()
}

fn default_search_pool_size() -> u32 {
    4
}

fn default_smtp_host() -> String {
    "localhost".to_string()
}

fn default_smtp_port() -> u16 {
    25
}

fn default_webmention_queue_dir() -> String {
    "webmentions".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "text".to_string()
}

fn default_max_backups() -> u32 {
    5
}

fn default_enable_rotation() -> bool {
    true
}

// ============================================================
// Default implementations
// ============================================================

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_server_host(),
            port: default_server_port(),
            unix_socket: None,
            cpu_count: default_cpu_count(),
        }
    }
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            url: default_site_url(),
            name: default_site_name(),
            domains: default_site_domains(),
            docroot: default_docroot(),
        }
    }
}

impl Default for RouteConfig {
    fn default() -> Self {
        Self {
            micropub: default_micropub_route(),
            search: default_search_route(),
            webhook: default_webhook_route(),
            webmention: default_webmention_route(),
            health: default_health_route(),
        }
    }
}

impl Default for MicropubConfig {
    fn default() -> Self {
        Self {
            token_endpoint: default_token_endpoint(),
            queue_dir: default_micropub_queue_dir(),
            categories: Vec::new(),
            timeout_secs: default_http_timeout(),
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            database: default_search_database(),
            pool_size: default_search_pool_size(),
        }
    }
}

impl Default for SmtpConfig {
    fn default() -> Self {
        Self {
            host: default_smtp_host(),
            port: default_smtp_port(),
            username: String::new(),
            password: String::new(),
            starttls: false,
        }
    }
}

impl Default for WebmentionConfig {
    fn default() -> Self {
        Self {
            queue_dir: default_webmention_queue_dir(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            file: None,
            max_backups: default_max_backups(),
            enable_rotation: default_enable_rotation(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_config_round_trips_through_toml() {
        let sample = StaticConfig::generate_sample_config();
        let parsed: StaticConfig = toml::from_str(&sample).expect("sample config should parse");

        assert_eq!(parsed.server.port, 8080);
        assert_eq!(parsed.routes.micropub, "/micropub");
        assert_eq!(parsed.rules.redirects.len(), 1);
        assert_eq!(parsed.rules.rewrites[0].target, "$1");
        assert!(parsed.wallabag.is_some());
    }

    #[test]
    fn missing_sections_fall_back_to_defaults() {
        let parsed: StaticConfig = toml::from_str("[site]\nname = \"blog.example\"\n").unwrap();

        assert_eq!(parsed.site.name, "blog.example");
        assert_eq!(parsed.site.url, "https://example.net");
        assert_eq!(
            parsed.micropub.token_endpoint,
            "https://tokens.indieauth.com/token"
        );
        assert!(parsed.wallabag.is_none());
        assert!(parsed.rules.gone.is_empty());
    }
}
