use std::sync::Arc;

use actix_web::{HttpRequest, HttpResponse, get, http::StatusCode, post, web};
use common::{
    cache::PageCache,
    error::Res,
    form::{ActionOutcome, ActionState},
    http::{Page, Redirect},
    misc::{generate_pagination, total_pages},
};
use db::{invoice::ITEMS_PER_PAGE, models::customer::CustomerField};
use sqlx::PgPool;
use tera::Context;
use ui::{Renderer, cached_page};
use uuid::Uuid;

use crate::{
    dtos::invoice::{InvoiceForm, SearchParams},
    services::{self, invoice::INVOICES_PATH},
};

/// Paginated, searchable invoice table.
///
/// # Input
/// - `query`: free text matched against customer name, email, amount, date and status
/// - `page`: 1-based page number, six invoices per page
#[get("")]
pub async fn get_invoices(
    req: HttpRequest,
    params: web::Query<SearchParams>,
    pool: web::Data<Arc<PgPool>>,
    renderer: web::Data<Arc<Renderer>>,
    cache: web::Data<Arc<PageCache>>,
) -> Res<HttpResponse> {
    let pg_pool: &PgPool = &pool;
    let query = params.query().to_string();
    let current_page = params.page();
    let variant = format!("query={:?}&page={}", query, current_page);

    cached_page(&cache, &req, &variant, || async move {
        let (invoices, count) = futures::try_join!(
            db::invoice::get_filtered_invoices(pg_pool, &query, current_page),
            db::invoice::count_filtered_invoices(pg_pool, &query)
        )?;
        let total_pages = total_pages(count, ITEMS_PER_PAGE);

        let mut context = Context::new();
        context.insert("section", "invoices");
        context.insert("query", &query);
        context.insert("invoices", &invoices);
        context.insert("current_page", &current_page);
        context.insert("total_pages", &total_pages);
        context.insert("pages", &generate_pagination(current_page, total_pages));
        renderer.render("invoices/list.html", &context)
    })
    .await
}

#[get("/create")]
pub async fn get_create_form(
    pool: web::Data<Arc<PgPool>>,
    renderer: web::Data<Arc<Renderer>>,
) -> Res<HttpResponse> {
    let customers = db::customer::get_customers(&***pool).await?;
    let html = render_form(
        &renderer,
        FormKind::Create,
        &customers,
        &InvoiceForm::default(),
        &ActionState::default(),
    )?;
    Page::ok(html)
}

/// Creates an invoice from the posted form, then redirects to the invoice list.
/// A rejected form is shown again with its field errors.
#[post("/create")]
pub async fn post_create(
    form: web::Form<InvoiceForm>,
    pool: web::Data<Arc<PgPool>>,
    renderer: web::Data<Arc<Renderer>>,
    cache: web::Data<Arc<PageCache>>,
) -> Res<HttpResponse> {
    let pg_pool: &PgPool = &pool;
    let outcome = services::invoice::create_invoice(pg_pool, &cache, &form).await;
    respond(outcome, pg_pool, &renderer, FormKind::Create, &form).await
}

#[get("/{id}/edit")]
pub async fn get_edit_form(
    path: web::Path<String>,
    pool: web::Data<Arc<PgPool>>,
    renderer: web::Data<Arc<Renderer>>,
) -> Res<HttpResponse> {
    let pg_pool: &PgPool = &pool;
    let Some(id) = parse_id(&path) else {
        return not_found(&renderer);
    };
    let Some(invoice) = db::invoice::get_invoice_by_id(pg_pool, id).await? else {
        return not_found(&renderer);
    };
    let customers = db::customer::get_customers(pg_pool).await?;

    let values = InvoiceForm {
        customer_id: invoice.customer_id.to_string(),
        amount: format!("{:.2}", f64::from(invoice.amount) / 100.0),
        status: invoice.status,
    };
    let html = render_form(
        &renderer,
        FormKind::Edit(id),
        &customers,
        &values,
        &ActionState::default(),
    )?;
    Page::ok(html)
}

#[post("/{id}/edit")]
pub async fn post_edit(
    path: web::Path<String>,
    form: web::Form<InvoiceForm>,
    pool: web::Data<Arc<PgPool>>,
    renderer: web::Data<Arc<Renderer>>,
    cache: web::Data<Arc<PageCache>>,
) -> Res<HttpResponse> {
    let pg_pool: &PgPool = &pool;
    let Some(id) = parse_id(&path) else {
        return not_found(&renderer);
    };
    let outcome = services::invoice::update_invoice(pg_pool, &cache, id, &form).await;
    respond(outcome, pg_pool, &renderer, FormKind::Edit(id), &form).await
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
    match services::invoice::delete_invoice(&***pool, &cache, id).await {
        ActionOutcome::Redirect(location) => Ok(Redirect::see_other(location)),
        ActionOutcome::Rejected(state) => {
            let message = state.message.unwrap_or_default();
            let html = renderer.notice("Something went wrong!", &message, INVOICES_PATH)?;
            Ok(Page::with_status(StatusCode::INTERNAL_SERVER_ERROR, html))
        }
    }
}

#[derive(Clone, Copy)]
enum FormKind {
    Create,
    Edit(Uuid),
}

async fn respond(
    outcome: ActionOutcome,
    pool: &PgPool,
    renderer: &Renderer,
    kind: FormKind,
    form: &InvoiceForm,
) -> Res<HttpResponse> {
    match outcome {
        ActionOutcome::Redirect(location) => Ok(Redirect::see_other(location)),
        ActionOutcome::Rejected(state) => {
            let customers = db::customer::get_customers(pool).await?;
            let html = render_form(renderer, kind, &customers, form, &state)?;
            Ok(Page::with_status(state.rejection_status(), html))
        }
    }
}

fn render_form(
    renderer: &Renderer,
    kind: FormKind,
    customers: &[CustomerField],
    values: &InvoiceForm,
    state: &ActionState,
) -> Res<String> {
    let (heading, action, submit) = match kind {
        FormKind::Create => (
            "Create Invoice".to_string(),
            format!("{}/create", INVOICES_PATH),
            "Create Invoice",
        ),
        FormKind::Edit(id) => (
            "Edit Invoice".to_string(),
            format!("{}/{}/edit", INVOICES_PATH, id),
            "Edit Invoice",
        ),
    };

    let mut context = Context::new();
    context.insert("section", "invoices");
    context.insert("heading", &heading);
    context.insert("action", &action);
    context.insert("submit", submit);
    context.insert("customers", customers);
    context.insert("values", values);
    context.insert("state", state);
    renderer.render("invoices/form.html", &context)
}

fn parse_id(raw: &str) -> Option<Uuid> {
    Uuid::parse_str(raw).ok()
}

fn not_found(renderer: &Renderer) -> Res<HttpResponse> {
    let html = renderer.not_found("invoice", INVOICES_PATH)?;
    Ok(Page::with_status(StatusCode::NOT_FOUND, html))
}
