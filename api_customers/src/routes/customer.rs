use std::sync::Arc;

use actix_web::{HttpRequest, HttpResponse, get, http::StatusCode, post, web};
use common::{
    cache::PageCache,
    error::Res,
    form::{ActionOutcome, ActionState},
    http::{Page, Redirect},
};
use sqlx::PgPool;
use tera::Context;
use ui::{Renderer, cached_page};
use uuid::Uuid;

use crate::{
    dtos::customer::{CustomerForm, SearchParams},
    services::{self, customer::CUSTOMERS_PATH},
};

/// Customers matching `query` by name or email, with invoice totals.
#[get("")]
pub async fn get_customers(
    req: HttpRequest,
    params: web::Query<SearchParams>,
    pool: web::Data<Arc<PgPool>>,
    renderer: web::Data<Arc<Renderer>>,
    cache: web::Data<Arc<PageCache>>,
) -> Res<HttpResponse> {
    let pg_pool: &PgPool = &pool;
    let query = params.query().to_string();
    let variant = format!("query={:?}", query);

    cached_page(&cache, &req, &variant, || async move {
        let customers = db::customer::get_filtered_customers(pg_pool, &query).await?;

        let mut context = Context::new();
        context.insert("section", "customers");
        context.insert("query", &query);
        context.insert("customers", &customers);
        renderer.render("customers/list.html", &context)
    })
    .await
}

#[get("/create")]
pub async fn get_create_form(renderer: web::Data<Arc<Renderer>>) -> Res<HttpResponse> {
    let html = render_form(
        &renderer,
        FormKind::Create,
        &CustomerForm::default(),
        &ActionState::default(),
    )?;
    Page::ok(html)
}

#[post("/create")]
pub async fn post_create(
    form: web::Form<CustomerForm>,
    pool: web::Data<Arc<PgPool>>,
    renderer: web::Data<Arc<Renderer>>,
    cache: web::Data<Arc<PageCache>>,
) -> Res<HttpResponse> {
    let outcome = services::customer::create_customer(&***pool, &cache, &form).await;
    respond(outcome, &renderer, FormKind::Create, &form)
}

#[get("/{id}/edit")]
pub async fn get_edit_form(
    path: web::Path<String>,
    pool: web::Data<Arc<PgPool>>,
    renderer: web::Data<Arc<Renderer>>,
) -> Res<HttpResponse> {
    let Some(id) = parse_id(&path) else {
        return not_found(&renderer);
    };
    let Some(customer) = db::customer::get_customer_by_id(&***pool, id).await? else {
        return not_found(&renderer);
    };

    let values = CustomerForm {
        name: customer.name,
        email: customer.email,
    };
    let html = render_form(&renderer, FormKind::Edit(id), &values, &ActionState::default())?;
    Page::ok(html)
}

#[post("/{id}/edit")]
pub async fn post_edit(
    path: web::Path<String>,
    form: web::Form<CustomerForm>,
    pool: web::Data<Arc<PgPool>>,
    renderer: web::Data<Arc<Renderer>>,
    cache: web::Data<Arc<PageCache>>,
) -> Res<HttpResponse> {
    let Some(id) = parse_id(&path) else {
        return not_found(&renderer);
    };
    let outcome = services::customer::update_customer(&***pool, &cache, id, &form).await;
    respond(outcome, &renderer, FormKind::Edit(id), &form)
}

#[post("/{id}/delete")]
pub async fn post_delete(
    path: web::Path<String>,
    pool: web::Data<Arc<PgPool>>,
    renderer: web::Data<Arc<Renderer>>,
    cache: web::Data<Arc<PageCache>>,
) -> Res<HttpResponse> {
    let Some(id) = parse_id(&path) else {
        return not_found(&renderer);
    };
    match services::customer::delete_customer(&***pool, &cache, id).await {
        ActionOutcome::Redirect(location) => Ok(Redirect::see_other(location)),
        ActionOutcome::Rejected(state) => {
            let message = state.message.unwrap_or_default();
            let html = renderer.notice("Something went wrong!", &message, CUSTOMERS_PATH)?;
            Ok(Page::with_status(StatusCode::INTERNAL_SERVER_ERROR, html))
        }
    }
}

#[derive(Clone, Copy)]
enum FormKind {
    Create,
    Edit(Uuid),
}

fn respond(
    outcome: ActionOutcome,
    renderer: &Renderer,
    kind: FormKind,
    form: &CustomerForm,
) -> Res<HttpResponse> {
    match outcome {
        ActionOutcome::Redirect(location) => Ok(Redirect::see_other(location)),
        ActionOutcome::Rejected(state) => {
            let html = render_form(renderer, kind, form, &state)?;
            Ok(Page::with_status(state.rejection_status(), html))
        }
    }
}

fn render_form(
    renderer: &Renderer,
    kind: FormKind,
    values: &CustomerForm,
    state: &ActionState,
) -> Res<String> {
    let (heading, action) = match kind {
        FormKind::Create => ("Create Customer", format!("{}/create", CUSTOMERS_PATH)),
        FormKind::Edit(id) => ("Edit Customer", format!("{}/{}/edit", CUSTOMERS_PATH, id)),
    };

    let mut context = Context::new();
    context.insert("section", "customers");
    context.insert("heading", heading);
    context.insert("action", &action);
    context.insert("submit", heading);
    context.insert("values", values);
    context.insert("state", state);
    renderer.render("customers/form.html", &context)
}

fn parse_id(raw: &str) -> Option<Uuid> {
    Uuid::parse_str(raw).ok()
}

fn not_found(renderer: &Renderer) -> Res<HttpResponse> {
    let html = renderer.not_found("customer", CUSTOMERS_PATH)?;
    Ok(Page::with_status(StatusCode::NOT_FOUND, html))
}

#[cfg(test)]
mod tests {
    use actix_web::{App, body, test};

    use super::*;

    #[actix_web::test]
    async fn create_form_renders_without_database() {
        let renderer = Arc::new(Renderer::new().unwrap());
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(renderer))
                .service(web::scope("/dashboard/customers").service(get_create_form)),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/dashboard/customers/create")
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::OK);
        let html = body::to_bytes(resp.into_body()).await.unwrap();
        let html = String::from_utf8_lossy(&html);
        assert!(html.contains("action=\"/dashboard/customers/create\""));
        assert!(!html.contains("class=\"error\""));
    }

    #[::std::prelude::v1::test]
    fn rejected_form_keeps_values_and_errors() {
        let renderer = Renderer::new().unwrap();
        let form = CustomerForm {
            name: "A".into(),
            email: "amy@burns.com".into(),
        };
        let mut state = ActionState::message("Missing Fields. Failed to Create Customer.");
        state
            .errors
            .insert("name".into(), vec!["Name must be at least 2 characters.".into()]);

        let html = render_form(&renderer, FormKind::Create, &form, &state).unwrap();

        assert!(html.contains("value=\"amy@burns.com\""));
        assert!(html.contains("Name must be at least 2 characters."));
        assert!(html.contains("Missing Fields. Failed to Create Customer."));
    }
}
