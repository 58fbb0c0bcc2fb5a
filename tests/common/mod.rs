//! Shared fixtures for the HTTP level tests

#![allow(dead_code)]

use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use siteglue::config::{RouteConfig, SiteConfig};
use siteglue::errors::{Result, SiteGlueError};
use siteglue::render::Pages;
use siteglue::rules::RuleTable;
use siteglue::runtime::lifetime::startup::StartupContext;
use siteglue::services::{
    Bookmarker, Mailer, MicropubService, PostQueue, Resolver, SearchService, TokenInfo,
    TokenVerifier, WebhookService, WebmentionService,
};

pub const WEBHOOK_SECRET: &str = "s3cret";
pub const AUTHOR: &str = "author@example.net";

/// Accepts `good-token` for https://example.net/ and `foreign-token` for
/// another site; everything else is unauthorized
pub struct MockVerifier;

#[async_trait]
impl TokenVerifier for MockVerifier {
    async fn verify(&self, token: &str) -> Result<TokenInfo> {
        match token {
            "good-token" => Ok(TokenInfo {
                me: "https://Example.net/".to_string(),
                scope: "create".to_string(),
            }),
            "foreign-token" => Ok(TokenInfo {
                me: "https://elsewhere.org/".to_string(),
                scope: "create".to_string(),
            }),
            _ => Err(SiteGlueError::unauthorized("invalid_token")),
        }
    }
}

#[derive(Default)]
pub struct MockBookmarker {
    pub saved: Mutex<Vec<String>>,
    pub fail: bool,
}

#[async_trait]
impl Bookmarker for MockBookmarker {
    async fn bookmark(&self, url: &str) -> Result<()> {
        if self.fail {
            return Err(SiteGlueError::remote("failed to obtain access token from wallabag: nope"));
        }
        self.saved.lock().unwrap().push(url.to_string());
        Ok(())
    }
}

#[derive(Default)]
pub struct MockMailer {
    pub sent: Mutex<Vec<(String, String, String)>>,
    pub fail: bool,
}

#[async_trait]
impl Mailer for MockMailer {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<()> {
        if self.fail {
            return Err(SiteGlueError::mail("connection refused"));
        }
        self.sent
            .lock()
            .unwrap()
            .push((to.to_string(), subject.to_string(), body.to_string()));
        Ok(())
    }
}

pub fn site(docroot: &Path) -> SiteConfig {
    SiteConfig {
        docroot: docroot.display().to_string(),
        ..SiteConfig::default()
    }
}

pub fn rules() -> RuleTable {
    let mut table = RuleTable::new();
    table.add_redirect("old-post", "new-post");
    table.add_redirect("elsewhere", "https://other.example.org/page");
    table
        .add_rewrite("^(?:[0-9]{4})/[0-9]{2}/(.*)$", "$1")
        .unwrap();
    table.add_rewrite(r"^\?p=([0-9]+)$", "post-$1").unwrap();
    table.add_gone("deleted-post");
    table.add_gone_pattern("^wp-(?:content|admin)").unwrap();
    table
}

/// Everything a test app needs, rooted in `dir`
pub struct Fixture {
    pub ctx: StartupContext,
    pub routes: RouteConfig,
    pub mailer: Arc<MockMailer>,
    pub bookmarker: Option<Arc<MockBookmarker>>,
}

pub fn fixture(dir: &Path, bookmarker: Option<Arc<MockBookmarker>>) -> Fixture {
    let site = site(&dir.join("www"));
    let mailer = Arc::new(MockMailer::default());

    let micropub = MicropubService::new(
        Arc::new(MockVerifier),
        bookmarker.clone().map(|b| b as Arc<dyn Bookmarker>),
        PostQueue::new(dir.join("queue")),
        &site.name,
        vec!["rust".to_string(), "indieweb".to_string()],
    );

    let ctx = StartupContext {
        resolver: Arc::new(Resolver::new(rules(), &site)),
        pages: Arc::new(Pages::new(&site, "/search").unwrap()),
        micropub: Arc::new(micropub),
        search: Arc::new(SearchService::new(dir.join("missing.sqlite"))),
        webhook: Arc::new(WebhookService::new(WEBHOOK_SECRET, AUTHOR, mailer.clone())),
        webmention: Arc::new(WebmentionService::new(
            site.domains.clone(),
            PostQueue::new(dir.join("webmentions")),
        )),
    };

    Fixture {
        ctx,
        routes: RouteConfig::default(),
        mailer,
        bookmarker,
    }
}

/// Files written to a queue directory, sorted by name
pub fn queued_files(dir: &Path) -> Vec<std::path::PathBuf> {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return Vec::new();
    };
    let mut files: Vec<_> = entries.filter_map(|e| e.ok()).map(|e| e.path()).collect();
    files.sort();
    files
}
