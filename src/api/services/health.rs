use actix_web::http::StatusCode;
use actix_web::{HttpResponse, Responder, web};
use serde::Serialize;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{error, info, trace};

use crate::api::constants::{CONTENT_TYPE_JSON, CONTENT_TYPE_TEXT};
use crate::services::{Resolver, SearchService};
use crate::utils::format_duration_human;

// 应用启动时间结构体
#[derive(Clone, Debug)]
pub struct AppStartTime {
    pub start_datetime: chrono::DateTime<chrono::Utc>,
}

#[derive(Serialize, Debug)]
pub struct HealthRulesCheck {
    pub redirects: usize,
    pub rewrites: usize,
    pub gone: usize,
    pub gone_patterns: usize,
}

#[derive(Serialize, Debug)]
pub struct HealthSearchCheck {
    pub status: String,
    pub database: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Serialize, Debug)]
pub struct HealthChecks {
    pub rules: HealthRulesCheck,
    pub search: HealthSearchCheck,
}

#[derive(Serialize, Debug)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
    pub uptime: u32,
    pub uptime_human: String,
    pub checks: HealthChecks,
    pub response_time_ms: u32,
}

pub struct HealthService;

impl HealthService {
    pub async fn health_check(
        resolver: web::Data<Arc<Resolver>>,
        search: web::Data<Arc<SearchService>>,
        app_start_time: web::Data<AppStartTime>,
    ) -> impl Responder {
        let start_time = Instant::now();
        trace!("Received health check request");

        let rules = resolver.rules();
        let rules_check = HealthRulesCheck {
            redirects: rules.redirect_count(),
            rewrites: rules.rewrite_count(),
            gone: rules.gone_count(),
            gone_patterns: rules.gone_pattern_count(),
        };

        let database = search.path().display().to_string();
        let search_check = match tokio::time::timeout(Duration::from_secs(5), search.ping()).await
        {
            Ok(Ok(())) => HealthSearchCheck {
                status: "healthy".to_string(),
                database,
                error: None,
            },
            Ok(Err(e)) => {
                error!("Search database health check failed: {}", e);
                HealthSearchCheck {
                    status: "unhealthy".to_string(),
                    database,
                    error: Some(e.message().to_string()),
                }
            }
            Err(_) => {
                error!("Search database health check timeout");
                HealthSearchCheck {
                    status: "unhealthy".to_string(),
                    database,
                    error: Some("timeout".to_string()),
                }
            }
        };

        let now = chrono::Utc::now();
        let uptime_human = format_duration_human(app_start_time.start_datetime, now);
        let uptime_seconds = (now - app_start_time.start_datetime).num_seconds().max(0) as u32;
        let is_healthy = search_check.status == "healthy";

        let health = HealthResponse {
            status: if is_healthy { "healthy" } else { "unhealthy" }.to_string(),
            timestamp: now.to_rfc3339(),
            uptime: uptime_seconds,
            uptime_human: uptime_human.clone(),
            checks: HealthChecks {
                rules: rules_check,
                search: search_check,
            },
            response_time_ms: start_time.elapsed().as_millis() as u32,
        };

        let status = if is_healthy {
            StatusCode::OK
        } else {
            StatusCode::SERVICE_UNAVAILABLE
        };

        info!(
            "Health check completed in {:?}, status: {}, uptime: {}",
            start_time.elapsed(),
            health.status,
            uptime_human
        );

        HttpResponse::build(status)
            .insert_header(("Content-Type", CONTENT_TYPE_JSON))
            .json(health)
    }

    // 简单的就绪检查，只返回 200 状态码
    pub async fn readiness_check() -> impl Responder {
        trace!("Received readiness check request");

        HttpResponse::Ok()
            .insert_header(("Content-Type", CONTENT_TYPE_TEXT))
            .body("OK")
    }

    // 活跃性检查
    pub async fn liveness_check() -> impl Responder {
        trace!("Received liveness check request");

        HttpResponse::NoContent().finish()
    }
}

/// Health 路由配置
pub fn health_routes(prefix: &str) -> actix_web::Scope {
    web::scope(prefix)
        .route("", web::get().to(HealthService::health_check))
        .route("", web::head().to(HealthService::health_check))
        .route("/ready", web::get().to(HealthService::readiness_check))
        .route("/ready", web::head().to(HealthService::readiness_check))
        .route("/live", web::get().to(HealthService::liveness_check))
        .route("/live", web::head().to(HealthService::liveness_check))
}
