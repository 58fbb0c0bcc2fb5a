use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, web};

use super::{error_response, text_response};
use crate::services::{MentionForm, WebmentionService};

pub struct WebmentionEndpoint;

impl WebmentionEndpoint {
    pub async fn receive(
        form: web::Form<MentionForm>,
        webmention: web::Data<Arc<WebmentionService>>,
    ) -> HttpResponse {
        match webmention.receive(&form).await {
            Ok(_) => text_response(StatusCode::ACCEPTED, "Accepted"),
            Err(e) => error_response(&e),
        }
    }
}

pub fn webmention_routes(path: &str) -> actix_web::Resource {
    web::resource(path).route(web::post().to(WebmentionEndpoint::receive))
}
