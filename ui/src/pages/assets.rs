use actix_web::{HttpResponse, Responder, get, http::header::CACHE_CONTROL};

#[get("/static/dashboard.css")]
pub async fn get_stylesheet() -> impl Responder {
    HttpResponse::Ok()
        .content_type("text/css; charset=utf-8")
        .insert_header((CACHE_CONTROL, "public, max-age=3600"))
        .body(include_str!("../../assets/dashboard.css"))
}

#[get("/customers/placeholder.svg")]
pub async fn get_placeholder_image() -> impl Responder {
    HttpResponse::Ok()
        .content_type("image/svg+xml")
        .insert_header((CACHE_CONTROL, "public, max-age=86400"))
        .body(include_str!("../../assets/placeholder.svg"))
}
