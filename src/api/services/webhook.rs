use std::sync::Arc;

use actix_web::{HttpResponse, web};

use super::error_response;
use crate::services::WebhookService;

pub struct WebhookEndpoint;

impl WebhookEndpoint {
    pub async fn receive(body: web::Bytes, webhook: web::Data<Arc<WebhookService>>) -> HttpResponse {
        let raw = String::from_utf8_lossy(&body);
        match webhook.notify(&raw).await {
            Ok(()) => HttpResponse::Accepted().finish(),
            Err(e) => error_response(&e),
        }
    }
}

pub fn webhook_routes(path: &str) -> actix_web::Resource {
    web::resource(path).route(web::post().to(WebhookEndpoint::receive))
}
