use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse, web};
use chrono::Utc;
use tracing::{debug, error};

use super::{error_response, query_pairs, text_response};
use crate::api::constants::{CONTENT_TYPE_HTML, CONTENT_TYPE_JSON, CONTENT_TYPE_XML};
use crate::render::Pages;
use crate::services::SearchService;
use crate::services::search::clean_term;
use crate::utils::rfc2822_from_unix;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputFormat {
    Rss,
    Json,
    Html,
}

#[derive(Debug)]
struct SearchParams {
    term: String,
    format: OutputFormat,
}

impl SearchParams {
    fn from_query(raw: &str) -> Self {
        let pairs = query_pairs(raw);
        let get = |key: &str| {
            pairs
                .iter()
                .rev()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.as_str())
        };

        let term = get("q").or_else(|| get("search")).unwrap_or_default();
        let format = if get("xml").is_some() {
            OutputFormat::Rss
        } else if get("json").is_some() {
            OutputFormat::Json
        } else {
            OutputFormat::Html
        };

        Self {
            term: clean_term(term),
            format,
        }
    }
}

pub struct SearchEndpoint;

impl SearchEndpoint {
    pub async fn search(
        req: HttpRequest,
        search: web::Data<Arc<SearchService>>,
        pages: web::Data<Arc<Pages>>,
    ) -> HttpResponse {
        let params = SearchParams::from_query(req.query_string());
        debug!("Search '{}' as {:?}", params.term, params.format);

        let results = match search.search(&params.term).await {
            Ok(results) => results,
            Err(e) => return error_response(&e),
        };

        let (content_type, rendered) = match params.format {
            OutputFormat::Json => {
                return HttpResponse::Ok()
                    .insert_header(("Content-Type", CONTENT_TYPE_JSON))
                    .json(&results);
            }
            OutputFormat::Rss => {
                let build_date = rfc2822_from_unix(Utc::now().timestamp());
                (
                    CONTENT_TYPE_XML,
                    pages.search_rss(&params.term, &results, &build_date),
                )
            }
            OutputFormat::Html => (CONTENT_TYPE_HTML, pages.search_html(&params.term, &results)),
        };

        match rendered {
            Ok(body) => HttpResponse::Ok()
                .insert_header(("Content-Type", content_type))
                .body(body),
            Err(e) => {
                error!("Failed to render search results: {}", e);
                text_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error")
            }
        }
    }
}

pub fn search_routes(path: &str) -> actix_web::Resource {
    web::resource(path)
        .route(web::get().to(SearchEndpoint::search))
        .route(web::head().to(SearchEndpoint::search))
}
