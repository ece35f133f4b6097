use actix_web::web;

pub mod pages {
    pub mod assets;
    pub mod overview;
}
mod cached;
mod renderer;

pub use cached::cached_page;
pub use renderer::Renderer;

/// Path of the avatar every customer gets.
pub const PLACEHOLDER_IMAGE_URL: &str = "/customers/placeholder.svg";

pub fn mount_dashboard() -> actix_web::Resource {
    web::resource("").route(web::get().to(pages::overview::get_overview))
}

pub fn configure_assets(cfg: &mut web::ServiceConfig) {
    cfg.service(pages::assets::get_stylesheet)
        .service(pages::assets::get_placeholder_image);
}
