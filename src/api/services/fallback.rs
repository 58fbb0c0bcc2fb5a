use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse, web};
use tracing::error;

use super::text_response;
use crate::api::constants::CONTENT_TYPE_HTML;
use crate::render::Pages;
use crate::services::{Resolution, Resolver};

/// Every request no other route claims: redirect, 410 or 404
pub struct FallbackService;

impl FallbackService {
    pub async fn handle(
        req: HttpRequest,
        resolver: web::Data<Arc<Resolver>>,
        pages: web::Data<Arc<Pages>>,
    ) -> HttpResponse {
        // 规则可以匹配查询串（旧博客的 `?p=123` 链接）
        let request_uri = req
            .uri()
            .path_and_query()
            .map(|pq| pq.as_str())
            .unwrap_or_else(|| req.path());

        match resolver.resolve(request_uri).await {
            Resolution::Redirect { location } => HttpResponse::MovedPermanently()
                .insert_header(("Location", location))
                .finish(),
            Resolution::Gone { uri } => Self::page(StatusCode::GONE, pages.gone(&uri)),
            Resolution::NotFound { uri } => {
                Self::page(StatusCode::NOT_FOUND, pages.not_found(&uri))
            }
        }
    }

    fn page(status: StatusCode, rendered: crate::errors::Result<String>) -> HttpResponse {
        match rendered {
            Ok(html) => HttpResponse::build(status)
                .insert_header(("Content-Type", CONTENT_TYPE_HTML))
                .body(html),
            Err(e) => {
                error!("Failed to render {} page: {}", status.as_u16(), e);
                text_response(status, status.canonical_reason().unwrap_or_default())
            }
        }
    }
}

/// Default service for the app
pub fn fallback_service() -> actix_web::Route {
    web::to(FallbackService::handle)
}
