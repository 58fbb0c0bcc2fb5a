//! Health endpoint tests

mod common;

use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::test::{self, TestRequest};
use actix_web::App;
use sea_orm::ConnectionTrait;
use serde_json::Value;
use tempfile::TempDir;

use siteglue::api::services::AppStartTime;
use siteglue::runtime::modes::configure_app;
use siteglue::services::SearchService;
use siteglue::services::search::connect_sqlite;

use common::fixture;

macro_rules! app {
    ($fx:expr) => {{
        let fx = &$fx;
        let start = AppStartTime {
            start_datetime: chrono::Utc::now() - chrono::Duration::seconds(90),
        };
        test::init_service(App::new().configure(|cfg| configure_app(&fx.ctx, &fx.routes, &start, cfg)))
            .await
    }};
}

#[actix_rt::test]
async fn test_health_unhealthy_without_search_db() {
    let dir = TempDir::new().unwrap();
    let fx = fixture(dir.path(), None);
    let app = app!(fx);

    let resp = test::call_service(&app, TestRequest::get().uri("/health").to_request()).await;
    assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "unhealthy");
    assert_eq!(body["checks"]["search"]["status"], "unhealthy");
    assert!(body["checks"]["search"]["error"].is_string());
    assert_eq!(body["checks"]["rules"]["redirects"], 2);
    assert_eq!(body["checks"]["rules"]["gone_patterns"], 1);
    assert!(body["uptime"].as_u64().unwrap() >= 90);
}

#[actix_rt::test]
async fn test_health_healthy_with_search_db() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("search.sqlite");
    let db = connect_sqlite(&path, false).await.unwrap();
    db.execute_unprepared("CREATE TABLE t (x INTEGER)").await.unwrap();

    let mut fx = fixture(dir.path(), None);
    fx.ctx.search = Arc::new(SearchService::with_connection(&path, db));
    let app = app!(fx);

    let resp = test::call_service(&app, TestRequest::get().uri("/health").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "healthy");
    assert!(body["checks"]["search"].get("error").is_none());
}

#[actix_rt::test]
async fn test_ready_and_live() {
    let dir = TempDir::new().unwrap();
    let fx = fixture(dir.path(), None);
    let app = app!(fx);

    let resp = test::call_service(&app, TestRequest::get().uri("/health/ready").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(test::read_body(resp).await, "OK");

    let resp = test::call_service(&app, TestRequest::get().uri("/health/live").to_request()).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
}
