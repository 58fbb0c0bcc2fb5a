//! Webhook and webmention endpoint tests

mod common;

use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::test::{self, TestRequest};
use actix_web::App;
use serde_json::Value;
use tempfile::TempDir;

use siteglue::api::services::AppStartTime;
use siteglue::runtime::modes::configure_app;
use siteglue::services::WebhookService;

use common::{AUTHOR, MockMailer, WEBHOOK_SECRET, fixture, queued_files};

macro_rules! app {
    ($fx:expr) => {{
        let fx = &$fx;
        let start = AppStartTime {
            start_datetime: chrono::Utc::now(),
        };
        test::init_service(App::new().configure(|cfg| configure_app(&fx.ctx, &fx.routes, &start, cfg)))
            .await
    }};
}

async fn body_text(resp: actix_web::dev::ServiceResponse) -> String {
    String::from_utf8_lossy(&test::read_body(resp).await).to_string()
}

// =============================================================================
// Webhook
// =============================================================================

#[actix_rt::test]
async fn test_webhook_mails_author() {
    let dir = TempDir::new().unwrap();
    let fx = fixture(dir.path(), None);
    let app = app!(fx);

    let payload = r#"{"secret":"s3cret","source":"https://a.example/reply","target":"https://example.net/post/"}"#;
    let req = TestRequest::post().uri("/webhook").set_payload(payload).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::ACCEPTED);

    let sent = fx.mailer.sent.lock().unwrap();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].0, AUTHOR);
    assert_eq!(sent[0].1, "[webmention] https://a.example/reply");
    assert_eq!(sent[0].2, payload);
}

#[actix_rt::test]
async fn test_webhook_wrong_secret() {
    let dir = TempDir::new().unwrap();
    let fx = fixture(dir.path(), None);
    let app = app!(fx);

    for payload in [r#"{"secret":"nope","source":"x"}"#, r#"{"source":"x"}"#] {
        let req = TestRequest::post().uri("/webhook").set_payload(payload).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_text(resp).await, "Bad Request");
    }
    assert!(fx.mailer.sent.lock().unwrap().is_empty());
}

#[actix_rt::test]
async fn test_webhook_invalid_json() {
    let dir = TempDir::new().unwrap();
    let fx = fixture(dir.path(), None);
    let app = app!(fx);

    let req = TestRequest::post().uri("/webhook").set_payload("secret=s3cret").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(fx.mailer.sent.lock().unwrap().is_empty());
}

#[actix_rt::test]
async fn test_webhook_empty_secret_rejects_all() {
    let dir = TempDir::new().unwrap();
    let mut fx = fixture(dir.path(), None);
    fx.ctx.webhook = Arc::new(WebhookService::new("", AUTHOR, fx.mailer.clone()));
    let app = app!(fx);

    for payload in [r#"{"secret":"","source":"x"}"#, r#"{"source":"x"}"#] {
        let req = TestRequest::post().uri("/webhook").set_payload(payload).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_text(resp).await, "Bad Request");
    }
    assert!(fx.mailer.sent.lock().unwrap().is_empty());
}

#[actix_rt::test]
async fn test_webhook_mail_failure_is_server_error() {
    let dir = TempDir::new().unwrap();
    let mut fx = fixture(dir.path(), None);
    let failing = Arc::new(MockMailer {
        fail: true,
        ..MockMailer::default()
    });
    fx.ctx.webhook = Arc::new(WebhookService::new(WEBHOOK_SECRET, AUTHOR, failing));
    let app = app!(fx);

    let req = TestRequest::post()
        .uri("/webhook")
        .set_payload(r#"{"secret":"s3cret","source":"https://a.example/"}"#)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_text(resp).await, "Internal Server Error");
}

#[actix_rt::test]
async fn test_webhook_get_not_routed() {
    let dir = TempDir::new().unwrap();
    let fx = fixture(dir.path(), None);
    let app = app!(fx);

    let resp = test::call_service(&app, TestRequest::get().uri("/webhook").to_request()).await;
    assert_ne!(resp.status(), StatusCode::ACCEPTED);
}

// =============================================================================
// Webmention
// =============================================================================

#[actix_rt::test]
async fn test_webmention_is_queued() {
    let dir = TempDir::new().unwrap();
    let fx = fixture(dir.path(), None);
    let app = app!(fx);

    let req = TestRequest::post()
        .uri("/webmention")
        .insert_header(("Content-Type", "application/x-www-form-urlencoded"))
        .set_payload("source=https%3A%2F%2Fa.example%2Freply&target=https%3A%2F%2Fexample.net%2Fpost%2F")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::ACCEPTED);
    assert_eq!(body_text(resp).await, "Accepted");

    let files = queued_files(&dir.path().join("webmentions"));
    assert_eq!(files.len(), 1);
    let stored: Value = serde_json::from_str(&std::fs::read_to_string(&files[0]).unwrap()).unwrap();
    assert_eq!(stored["source"], "https://a.example/reply");
    assert_eq!(stored["target"], "https://example.net/post/");
    assert!(stored["received"].is_string());
}

#[actix_rt::test]
async fn test_webmention_rejections() {
    let dir = TempDir::new().unwrap();
    let fx = fixture(dir.path(), None);
    let app = app!(fx);

    let cases = [
        ("source=notaurl&target=https%3A%2F%2Fexample.net%2F", "invalid source url"),
        ("source=https%3A%2F%2Fa.example%2F&target=ftp%3A%2F%2Fexample.net%2F", "invalid target url"),
        ("source=https%3A%2F%2Fa.example%2F&target=https%3A%2F%2Fother.org%2F", "target domain is not me"),
        ("source=https%3A%2F%2Fwww.example.net%2Fa&target=https%3A%2F%2Fexample.net%2Fb", "selfpings are not allowed"),
    ];

    for (payload, message) in cases {
        let req = TestRequest::post()
            .uri("/webmention")
            .insert_header(("Content-Type", "application/x-www-form-urlencoded"))
            .set_payload(payload)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "payload {}", payload);
        assert_eq!(body_text(resp).await, message);
    }
    assert!(queued_files(&dir.path().join("webmentions")).is_empty());
}

#[actix_rt::test]
async fn test_webmention_missing_fields() {
    let dir = TempDir::new().unwrap();
    let fx = fixture(dir.path(), None);
    let app = app!(fx);

    let req = TestRequest::post()
        .uri("/webmention")
        .set_form([("target", "https://example.net/post/")])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_text(resp).await, "invalid source url");
}
