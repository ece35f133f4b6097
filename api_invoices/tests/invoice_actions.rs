//! Runs against a throwaway database named by `TEST_DATABASE_URL`, whose
//! tables are truncated. Skipped when it is unset or equals `DATABASE_URL`.

use api_invoices::{
    dtos::invoice::InvoiceForm,
    services::invoice::{self, INVOICES_PATH},
};
use common::{cache::PageCache, form::ActionOutcome};
use db::dtos::customer::CustomerWrite;
use sqlx::PgPool;
use uuid::Uuid;

const TEST_DATABASE_URL: &str = "TEST_DATABASE_URL";

fn test_database_url() -> Option<String> {
    isolated_url(
        std::env::var(TEST_DATABASE_URL).ok(),
        std::env::var("DATABASE_URL").ok(),
    )
}

/// The test database, unless it is the one the application runs on.
fn isolated_url(test_url: Option<String>, app_url: Option<String>) -> Option<String> {
    let test_url = test_url?;
    if app_url.as_deref() == Some(test_url.as_str()) {
        eprintln!("{} points at the application database, refusing to truncate it", TEST_DATABASE_URL);
        return None;
    }
    Some(test_url)
}

#[test]
fn application_database_is_never_used_for_tests() {
    let app = "postgres://localhost/dashboard".to_string();
    let scratch = "postgres://localhost/dashboard_test".to_string();

    assert_eq!(isolated_url(None, Some(app.clone())), None);
    assert_eq!(isolated_url(Some(app.clone()), Some(app.clone())), None);
    assert_eq!(isolated_url(Some(scratch.clone()), Some(app)), Some(scratch.clone()));
    assert_eq!(isolated_url(Some(scratch.clone()), None), Some(scratch));
}

async fn connect() -> Option<PgPool> {
    let url = test_database_url()?;
    let pool = PgPool::connect(&url).await.expect("connect to TEST_DATABASE_URL");
    db::migrate(&pool).await.expect("run migrations");
    Some(pool)
}

async fn test_pool() -> Option<PgPool> {
    let pool = connect().await?;
    sqlx::query("TRUNCATE invoices, customers")
        .execute(&pool)
        .await
        .expect("truncate tables");
    Some(pool)
}

#[tokio::test]
async fn invoice_actions_write_through_to_postgres() {
    let Some(pool) = test_pool().await else {
        eprintln!("{} not set, skipping", TEST_DATABASE_URL);
        return;
    };
    let cache = PageCache::new();

    let customer_id = Uuid::new_v4();
    db::customer::insert_customer(
        &pool,
        customer_id,
        &CustomerWrite {
            name: "Amy Burns".into(),
            email: "amy@burns.com".into(),
            image_url: ui::PLACEHOLDER_IMAGE_URL.into(),
        },
    )
    .await
    .unwrap();

    // create stores the amount in cents
    let form = InvoiceForm {
        customer_id: customer_id.to_string(),
        amount: "157.95".into(),
        status: "pending".into(),
    };
    let outcome = invoice::create_invoice(&pool, &cache, &form).await;
    assert_eq!(outcome, ActionOutcome::Redirect(INVOICES_PATH));

    let rows: Vec<(Uuid, i32, String)> =
        sqlx::query_as("SELECT id, amount, status FROM invoices WHERE customer_id = $1")
            .bind(customer_id)
            .fetch_all(&pool)
            .await
            .unwrap();
    assert_eq!(rows.len(), 1);
    let (invoice_id, amount, status) = rows[0].clone();
    assert_eq!(amount, 15795);
    assert_eq!(status, "pending");

    // update replaces amount and status, keeps the date
    let form = InvoiceForm {
        customer_id: customer_id.to_string(),
        amount: "20".into(),
        status: "paid".into(),
    };
    let outcome = invoice::update_invoice(&pool, &cache, invoice_id, &form).await;
    assert_eq!(outcome, ActionOutcome::Redirect(INVOICES_PATH));
    let stored = db::invoice::get_invoice_by_id(&pool, invoice_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.amount, 2000);
    assert_eq!(stored.status, "paid");

    // a missing id is not an error
    let outcome = invoice::delete_invoice(&pool, &cache, Uuid::new_v4()).await;
    assert_eq!(outcome, ActionOutcome::Redirect(INVOICES_PATH));

    let outcome = invoice::delete_invoice(&pool, &cache, invoice_id).await;
    assert_eq!(outcome, ActionOutcome::Redirect(INVOICES_PATH));
    assert!(
        db::invoice::get_invoice_by_id(&pool, invoice_id)
            .await
            .unwrap()
            .is_none()
    );
}

#[tokio::test]
async fn revenue_comes_back_in_calendar_order() {
    let Some(pool) = connect().await else {
        eprintln!("{} not set, skipping", TEST_DATABASE_URL);
        return;
    };
    sqlx::query("TRUNCATE revenue").execute(&pool).await.unwrap();

    for (month, revenue) in [("Dec", 4800), ("Jan", 2000), ("Jul", 3500), ("Feb", 1800)] {
        sqlx::query("INSERT INTO revenue (month, revenue) VALUES ($1, $2)")
            .bind(month)
            .bind(revenue)
            .execute(&pool)
            .await
            .unwrap();
    }

    let months: Vec<String> = db::dashboard::get_revenue(&pool)
        .await
        .unwrap()
        .into_iter()
        .map(|r| r.month)
        .collect();
    assert_eq!(months, ["Jan", "Feb", "Jul", "Dec"]);
}
