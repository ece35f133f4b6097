mod cors;

use std::sync::Arc;

use actix_web::{
    App, HttpServer,
    web::{self},
};
use common::{cache::PageCache, env_config::Config};
use ui::Renderer;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // get env vars
    let config = Config::from_env();
    let config_data = config.clone();

    // get info
    let is_production = config.is_production();
    let origin = config.cors_allowed_origin.clone();
    let cookie_secure = !origin.contains("localhost");
    let console_logging_enabled = config.console_logging_enabled;

    // init logger
    if console_logging_enabled {
        logger::setup().expect("Failed to set up logger");
    }

    // init db connection
    let pool = db::setup(&config.database_url, is_production)
        .await
        .expect("Failed to set up database");

    // demo data
    if config.seed_database {
        let password_hash = api_auth::hash_password(db::seed::DEMO_PASSWORD)
            .expect("Failed to hash demo password");
        db::seed::run(&pool, password_hash, ui::PLACEHOLDER_IMAGE_URL)
            .await
            .expect("Failed to seed database");
    }

    // templates are compiled once and shared by every worker
    let renderer = Arc::new(Renderer::new().expect("Failed to compile templates"));
    let cache = Arc::new(PageCache::new());

    log::info!(
        "Listening on http://{}:{}",
        config.server_host,
        config.server_port
    );

    HttpServer::new(move || {
        let secret = config_data.jwt_config.secret.as_str();
        App::new()
            .app_data(web::Data::new(pool.clone()))
            .app_data(web::Data::new(config_data.clone()))
            .app_data(web::Data::new(renderer.clone()))
            .app_data(web::Data::new(cache.clone()))
            .wrap(logger::middleware(console_logging_enabled)) // 4th
            .wrap(extractor::middleware(secret)) // 3rd
            .wrap(cors::middleware(&origin)) // 2nd
            .wrap(api_auth::session_middleware(
                cookie_secure,
                secret.as_bytes(),
                config_data.jwt_config.expiration_hours,
            )) // 1st
            .configure(ui::configure_assets)
            .configure(api_auth::mount_auth)
            .service(
                web::scope("/dashboard")
                    .wrap(api_auth::auth_middleware())
                    .service(ui::mount_dashboard())
                    .service(api_invoices::mount_invoices())
                    .service(api_customers::mount_customers()),
            )
    })
    .bind((config.server_host.as_str(), config.server_port))?
    .workers(config.num_workers)
    .run()
    .await
}
