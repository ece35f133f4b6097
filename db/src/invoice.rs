use chrono::NaiveDate;
use common::error::{AppError, Res};
use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::{
    dtos::invoice::InvoiceWrite,
    models::invoice::{Invoice, InvoiceRow, LatestInvoice},
};

pub const ITEMS_PER_PAGE: i64 = 6;

pub async fn insert_invoice<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    data: &InvoiceWrite,
    date: NaiveDate,
) -> Res<()> {
    sqlx::query(
        r#"
        INSERT INTO invoices (customer_id, amount, status, date)
        VALUES ($1, $2, $3, $4)
        "#,
    )
    .bind(data.customer_id)
    .bind(data.amount_cents)
    .bind(data.status.as_str())
    .bind(date)
    .execute(executor)
    .await?;
    Ok(())
}

pub async fn update_invoice<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    id: Uuid,
    data: &InvoiceWrite,
) -> Res<()> {
    sqlx::query(
        r#"
        UPDATE invoices
        SET customer_id = $1, amount = $2, status = $3
        WHERE id = $4
        "#,
    )
    .bind(data.customer_id)
    .bind(data.amount_cents)
    .bind(data.status.as_str())
    .bind(id)
    .execute(executor)
    .await?;
    Ok(())
}

/// Returns the number of deleted rows; a missing id deletes nothing.
pub async fn delete_invoice<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    id: Uuid,
) -> Res<u64> {
    sqlx::query("DELETE FROM invoices WHERE id = $1")
        .bind(id)
        .execute(executor)
        .await
        .map(|result| result.rows_affected())
        .map_err(AppError::from)
}

pub async fn get_invoice_by_id<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    id: Uuid,
) -> Res<Option<Invoice>> {
    sqlx::query_as::<_, Invoice>(
        "SELECT id, customer_id, amount, status, date FROM invoices WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(executor)
    .await
    .map_err(AppError::from)
}

pub async fn get_latest_invoices<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
) -> Res<Vec<LatestInvoice>> {
    sqlx::query_as::<_, LatestInvoice>(
        r#"
        SELECT invoices.id, invoices.amount, customers.name, customers.email, customers.image_url
        FROM invoices
        JOIN customers ON invoices.customer_id = customers.id
        ORDER BY invoices.date DESC
        LIMIT 5
        "#,
    )
    .fetch_all(executor)
    .await
    .map_err(AppError::from)
}

const FILTER: &str = r#"
    FROM invoices
    JOIN customers ON invoices.customer_id = customers.id
    WHERE
        customers.name ILIKE $1 OR
        customers.email ILIKE $1 OR
        invoices.amount::text ILIKE $1 OR
        invoices.date::text ILIKE $1 OR
        invoices.status ILIKE $1
"#;

/// One page of invoices whose customer, amount, date or status matches `query`.
/// Pages start at 1.
pub async fn get_filtered_invoices<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    query: &str,
    page: u32,
) -> Res<Vec<InvoiceRow>> {
    let offset = (i64::from(page.max(1)) - 1) * ITEMS_PER_PAGE;
    let sql = format!(
        r#"
        SELECT invoices.id, invoices.amount, invoices.date, invoices.status,
               customers.name, customers.email, customers.image_url
        {FILTER}
        ORDER BY invoices.date DESC
        LIMIT $2 OFFSET $3
        "#
    );
    sqlx::query_as::<_, InvoiceRow>(&sql)
        .bind(format!("%{}%", query))
        .bind(ITEMS_PER_PAGE)
        .bind(offset)
        .fetch_all(executor)
        .await
        .map_err(AppError::from)
}

pub async fn count_filtered_invoices<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    query: &str,
) -> Res<i64> {
    let sql = format!("SELECT COUNT(*) {FILTER}");
    sqlx::query_scalar::<_, i64>(&sql)
        .bind(format!("%{}%", query))
        .fetch_one(executor)
        .await
        .map_err(AppError::from)
}
