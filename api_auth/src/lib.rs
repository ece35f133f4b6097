use actix_session::{SessionMiddleware, config::PersistentSession, storage::CookieSessionStore};
use actix_web::{
    cookie::{Key, SameSite, time::Duration},
    web,
};
use middleware::auth::AuthMiddleware;

pub mod middleware {
    pub mod auth;
}
pub mod routes {
    pub mod auth;
}
pub mod services {
    pub mod auth;
}
pub mod dtos {
    pub mod auth;
}

pub use services::auth::hash_password;

pub const LOGIN_PATH: &str = "/login";

/// Encrypted cookie session holding the signed-in user's token.
/// `secret` must be at least 32 bytes.
pub fn session_middleware(
    cookie_secure: bool,
    secret: &[u8],
    ttl_hours: i64,
) -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::derive_from(secret))
        .cookie_name("dashboard_session".to_string())
        .cookie_secure(cookie_secure)
        .cookie_http_only(true)
        .cookie_same_site(SameSite::Lax)
        .session_lifecycle(PersistentSession::default().session_ttl(Duration::hours(ttl_hours)))
        .build()
}

/// Redirects requests without a valid session to the login page.
pub fn auth_middleware() -> AuthMiddleware {
    AuthMiddleware::new(LOGIN_PATH)
}

pub fn mount_auth(cfg: &mut web::ServiceConfig) {
    cfg.service(routes::auth::get_index)
        .service(routes::auth::get_login)
        .service(routes::auth::post_login)
        .service(routes::auth::post_logout);
}
