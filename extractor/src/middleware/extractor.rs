use std::{future::Future, pin::Pin, rc::Rc, sync::Arc};

use actix_session::SessionExt;
use actix_web::{
    Error, HttpMessage,
    dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready},
};
use futures::future::{Ready, ok};

use common::{
    error::Res,
    jwt::{self, JwtClaims, SESSION_TOKEN_KEY},
};

pub struct ExtractionMiddleware {
    secret: Rc<String>,
}

impl ExtractionMiddleware {
    pub fn new(secret: &str) -> Self {
        Self {
            secret: Rc::new(secret.to_string()),
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for ExtractionMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: actix_web::body::MessageBody + 'static,
{
    type Response = ServiceResponse<actix_web::body::BoxBody>;
    type Error = Error;
    type Transform = ExtractionMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ok(ExtractionMiddlewareService {
            service: Arc::new(service),
            secret: self.secret.clone(),
        })
    }
}

pub struct ExtractionMiddlewareService<S> {
    service: Arc<S>,
    secret: Rc<String>,
}

impl<S, B> Service<ServiceRequest> for ExtractionMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: actix_web::body::MessageBody + 'static,
{
    type Response = ServiceResponse<actix_web::body::BoxBody>;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        // retrieve token from the session cookie
        let token = match req.get_session().get::<String>(SESSION_TOKEN_KEY) {
            Ok(token) => token,
            Err(e) => {
                log::warn!("Unreadable session: {}", e);
                None
            }
        };

        if let Some(token) = token {
            // validate token and insert claims to request object for future use
            let claims_res = jwt::validate_jwt(&token, &self.secret);
            if let Err(e) = &claims_res {
                log::debug!("Rejected session token: {}", e);
            }
            req.extensions_mut().insert::<Res<JwtClaims>>(claims_res);
        }

        let srv = Arc::clone(&self.service);
        Box::pin(async move { srv.call(req).await.map(|res| res.map_into_boxed_body()) })
    }
}

#[cfg(test)]
mod tests {
    use actix_session::{SessionMiddleware, storage::CookieSessionStore};
    use actix_web::{App, HttpRequest, HttpResponse, cookie::Key, test, web};

    use super::*;

    const SECRET: &str = "0123456789abcdef0123456789abcdef0123456789abcdef";

    async fn claims_state(req: HttpRequest) -> HttpResponse {
        let body = match req.extensions().get::<Res<JwtClaims>>() {
            None => "none",
            Some(Ok(_)) => "ok",
            Some(Err(_)) => "invalid",
        };
        HttpResponse::Ok().body(body)
    }

    async fn store_garbage(session: actix_session::Session) -> HttpResponse {
        session.insert(SESSION_TOKEN_KEY, "not-a-jwt").unwrap();
        HttpResponse::Ok().finish()
    }

    #[actix_web::test]
    async fn request_without_token_has_no_claims() {
        let app = test::init_service(
            App::new()
                .wrap(ExtractionMiddleware::new(SECRET))
                .wrap(SessionMiddleware::new(
                    CookieSessionStore::default(),
                    Key::derive_from(SECRET.as_bytes()),
                ))
                .route("/", web::get().to(claims_state)),
        )
        .await;

        let body = test::call_and_read_body(&app, test::TestRequest::get().uri("/").to_request())
            .await;
        assert_eq!(&body[..], b"none");
    }

    #[actix_web::test]
    async fn garbage_token_is_recorded_as_invalid() {
        let app = test::init_service(
            App::new()
                .wrap(ExtractionMiddleware::new(SECRET))
                .wrap(
                    SessionMiddleware::builder(
                        CookieSessionStore::default(),
                        Key::derive_from(SECRET.as_bytes()),
                    )
                    .cookie_secure(false)
                    .build(),
                )
                .route("/store", web::post().to(store_garbage))
                .route("/", web::get().to(claims_state)),
        )
        .await;

        let resp =
            test::call_service(&app, test::TestRequest::post().uri("/store").to_request()).await;
        let cookie = resp.response().cookies().next().unwrap().into_owned();

        let req = test::TestRequest::get().uri("/").cookie(cookie).to_request();
        let body = test::call_and_read_body(&app, req).await;
        assert_eq!(&body[..], b"invalid");
    }
}
