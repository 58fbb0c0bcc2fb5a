use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::{debug, info, warn};

use crate::config::StaticConfig;
use crate::render::Pages;
use crate::rules::RuleTable;
use crate::services::{
    Bookmarker, IndieAuthVerifier, MicropubService, PostQueue, Resolver, SearchService,
    SmtpMailer, WallabagClient, WebhookService, WebmentionService,
};

/// Everything the HTTP workers share
#[derive(Clone)]
pub struct StartupContext {
    pub resolver: Arc<Resolver>,
    pub pages: Arc<Pages>,
    pub micropub: Arc<MicropubService>,
    pub search: Arc<SearchService>,
    pub webhook: Arc<WebhookService>,
    pub webmention: Arc<WebmentionService>,
}

/// 安装 rustls crypto provider（重复安装视为已完成）
pub fn install_crypto_provider() {
    if rustls::crypto::ring::default_provider()
        .install_default()
        .is_err()
    {
        debug!("rustls crypto provider already installed");
    }
}

pub fn build_resolver(config: &StaticConfig) -> Result<Resolver> {
    let rules = RuleTable::from_config(&config.rules).context("Failed to load rule tables")?;
    Ok(Resolver::new(rules, &config.site))
}

pub fn build_micropub(config: &StaticConfig) -> MicropubService {
    let timeout = Duration::from_secs(config.micropub.timeout_secs);
    let verifier = Arc::new(IndieAuthVerifier::new(
        &config.micropub.token_endpoint,
        timeout,
    ));

    let bookmarker: Option<Arc<dyn Bookmarker>> = match config.wallabag {
        Some(ref wallabag) if !wallabag.url.is_empty() => {
            info!("Micropub likes go to wallabag at {}", wallabag.url);
            Some(Arc::new(WallabagClient::new(wallabag.clone(), timeout)))
        }
        _ => {
            info!("Wallabag not configured, likes are queued");
            None
        }
    };

    MicropubService::new(
        verifier,
        bookmarker,
        PostQueue::new(&config.micropub.queue_dir),
        &config.site.name,
        config.micropub.categories.clone(),
    )
}

pub fn build_webhook(config: &StaticConfig) -> Result<WebhookService> {
    let from = if config.webhook.from_email.is_empty() {
        config.webhook.author_email.as_str()
    } else {
        config.webhook.from_email.as_str()
    };
    if config.webhook.author_email.is_empty() {
        warn!("webhook.author_email is empty, notifications cannot be delivered");
    }

    let mailer = SmtpMailer::new(&config.smtp, from).context("Failed to set up SMTP transport")?;
    Ok(WebhookService::new(
        &config.webhook.secret,
        &config.webhook.author_email,
        Arc::new(mailer),
    ))
}

/// 准备服务器启动的上下文
pub fn prepare_server_startup(config: &StaticConfig) -> Result<StartupContext> {
    let start_time = std::time::Instant::now();
    debug!("Starting pre-startup processing...");

    install_crypto_provider();

    let resolver = build_resolver(config)?;
    let pages = Pages::new(&config.site, &config.routes.search)
        .context("Failed to load page templates")?;
    let micropub = build_micropub(config);
    let search =
        SearchService::new(&config.search.database).with_pool_size(config.search.pool_size);
    let webhook = build_webhook(config)?;
    let webmention = WebmentionService::new(
        config.site.domains.clone(),
        PostQueue::new(&config.webmention.queue_dir),
    );

    info!(
        "Startup prepared in {:?} (search database: {})",
        start_time.elapsed(),
        config.search.database
    );

    Ok(StartupContext {
        resolver: Arc::new(resolver),
        pages: Arc::new(pages),
        micropub: Arc::new(micropub),
        search: Arc::new(search),
        webhook: Arc::new(webhook),
        webmention: Arc::new(webmention),
    })
}
