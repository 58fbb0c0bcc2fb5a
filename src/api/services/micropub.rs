use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse, web};
use serde_json::json;
use tracing::trace;

use super::{error_response, query_pairs, text_response};
use crate::api::constants::CONTENT_TYPE_JSON;
use crate::services::MicropubService;

const POST_PLEASE: &str = "please POST a micropub request";

pub struct MicropubEndpoint;

impl MicropubEndpoint {
    /// `q=config` / `q=syndicate-to`; everything else asks for a POST
    pub async fn query(req: HttpRequest, micropub: web::Data<Arc<MicropubService>>) -> HttpResponse {
        let q = query_pairs(req.query_string())
            .into_iter()
            .rev()
            .find(|(k, _)| k == "q")
            .map(|(_, v)| v);
        trace!("Micropub query: {:?}", q);

        match q.as_deref() {
            Some("config") => HttpResponse::Ok()
                .insert_header(("Content-Type", CONTENT_TYPE_JSON))
                .json(micropub.categories()),
            Some("syndicate-to") => HttpResponse::Ok()
                .insert_header(("Content-Type", CONTENT_TYPE_JSON))
                .json(json!({ "syndicate-to": [] })),
            _ => text_response(StatusCode::BAD_REQUEST, POST_PLEASE),
        }
    }

    pub async fn publish(
        req: HttpRequest,
        body: web::Bytes,
        micropub: web::Data<Arc<MicropubService>>,
    ) -> HttpResponse {
        let raw = String::from_utf8_lossy(&body);
        let authorization = req
            .headers()
            .get("Authorization")
            .and_then(|v| v.to_str().ok());

        match micropub.publish(&raw, authorization).await {
            Ok(_) => HttpResponse::Accepted().finish(),
            Err(e) => error_response(&e),
        }
    }
}

pub fn micropub_routes(path: &str) -> actix_web::Resource {
    web::resource(path)
        .route(web::get().to(MicropubEndpoint::query))
        .route(web::post().to(MicropubEndpoint::publish))
}
