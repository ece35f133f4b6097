use actix_web::{
    HttpResponse,
    http::{StatusCode, header::LOCATION},
};

use super::error::Res;

/// Rendered HTML responses.
pub struct Page;
impl Page {
    pub fn ok(body: String) -> Res<HttpResponse> {
        Ok(Self::with_status(StatusCode::OK, body))
    }
    pub fn with_status(status: StatusCode, body: String) -> HttpResponse {
        HttpResponse::build(status)
            .content_type("text/html; charset=utf-8")
            .body(body)
    }
}

/// Post/redirect/get responses sent after a form action.
pub struct Redirect;
impl Redirect {
    pub fn see_other(location: &str) -> HttpResponse {
        HttpResponse::SeeOther()
            .insert_header((LOCATION, location))
            .finish()
    }
}
