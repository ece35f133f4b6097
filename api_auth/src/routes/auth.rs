use std::sync::Arc;

use actix_session::Session;
use actix_web::{HttpMessage, HttpRequest, HttpResponse, get, http::StatusCode, post, web};
use common::{
    env_config::Config,
    error::{AppError, Res},
    http::{Page, Redirect},
    jwt::{self, ClaimsSpec, JwtClaims, SESSION_TOKEN_KEY},
};
use sqlx::PgPool;
use tera::Context;
use ui::Renderer;

use crate::{
    LOGIN_PATH,
    dtos::auth::LoginForm,
    services::auth::{self, SignInError},
};

const DASHBOARD_PATH: &str = "/dashboard";

#[get("/")]
pub async fn get_index() -> HttpResponse {
    Redirect::see_other(DASHBOARD_PATH)
}

/// Login page. Already signed-in users go straight to the dashboard.
#[get("/login")]
pub async fn get_login(req: HttpRequest, renderer: web::Data<Arc<Renderer>>) -> Res<HttpResponse> {
    if is_signed_in(&req) {
        return Ok(Redirect::see_other(DASHBOARD_PATH));
    }
    Page::ok(render_login(&renderer, "", None)?)
}

/// Signs the user in with email and password.
///
/// # Output
/// - Success: stores a JWT in the session cookie and redirects to `/dashboard`
/// - Wrong credentials: the login page again with "Invalid credentials." (401)
/// - Anything else: the error propagates (500)
#[post("/login")]
pub async fn post_login(
    form: web::Form<LoginForm>,
    session: Session,
    pool: web::Data<Arc<PgPool>>,
    config: web::Data<Arc<Config>>,
    renderer: web::Data<Arc<Renderer>>,
) -> Res<HttpResponse> {
    let pg_pool: &PgPool = &pool;
    let user = match auth::authorize(pg_pool, &form).await {
        Ok(user) => user,
        Err(err @ SignInError::CredentialsSignin) => {
            let html = render_login(&renderer, &form.email, Some(&err.to_string()))?;
            return Ok(Page::with_status(StatusCode::UNAUTHORIZED, html));
        }
        Err(SignInError::Other(err)) => return Err(err),
    };

    let token = jwt::generate_jwt(
        ClaimsSpec {
            user_id: user.id,
            email: user.email.clone(),
        },
        &config.jwt_config,
    )?;

    session.renew();
    session
        .insert(SESSION_TOKEN_KEY, &token)
        .map_err(|_| AppError::Internal("Failed to insert token cookie".to_string()))?;

    log::info!("User {} signed in", user.id);
    Ok(Redirect::see_other(DASHBOARD_PATH))
}

#[post("/logout")]
pub async fn post_logout(session: Session) -> HttpResponse {
    session.purge();
    Redirect::see_other(LOGIN_PATH)
}

fn is_signed_in(req: &HttpRequest) -> bool {
    matches!(req.extensions().get::<Res<JwtClaims>>(), Some(Ok(_)))
}

fn render_login(renderer: &Renderer, email: &str, message: Option<&str>) -> Res<String> {
    let mut context = Context::new();
    context.insert("email", email);
    context.insert("message", &message);
    renderer.render("login.html", &context)
}
