use common::error::{AppError, Res};
use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::{
    dtos::customer::CustomerWrite,
    models::customer::{Customer, CustomerField, CustomerSummary},
};

pub async fn insert_customer<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    id: Uuid,
    data: &CustomerWrite,
) -> Res<()> {
    sqlx::query(
        r#"
        INSERT INTO customers (id, name, email, image_url)
        VALUES ($1, $2, $3, $4)
        "#,
    )
    .bind(id)
    .bind(&data.name)
    .bind(&data.email)
    .bind(&data.image_url)
    .execute(executor)
    .await?;
    Ok(())
}

pub async fn update_customer<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    id: Uuid,
    data: &CustomerWrite,
) -> Res<()> {
    sqlx::query(
        r#"
        UPDATE customers
        SET name = $1, email = $2, image_url = $3
        WHERE id = $4
        "#,
    )
    .bind(&data.name)
    .bind(&data.email)
    .bind(&data.image_url)
    .bind(id)
    .execute(executor)
    .await?;
    Ok(())
}

pub async fn delete_customer<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    id: Uuid,
) -> Res<u64> {
    sqlx::query("DELETE FROM customers WHERE id = $1")
        .bind(id)
        .execute(executor)
        .await
        .map(|result| result.rows_affected())
        .map_err(AppError::from)
}

pub async fn get_customer_by_id<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    id: Uuid,
) -> Res<Option<Customer>> {
    sqlx::query_as::<_, Customer>("SELECT id, name, email, image_url FROM customers WHERE id = $1")
        .bind(id)
        .fetch_optional(executor)
        .await
        .map_err(AppError::from)
}

pub async fn get_customers<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
) -> Res<Vec<CustomerField>> {
    sqlx::query_as::<_, CustomerField>("SELECT id, name FROM customers ORDER BY name ASC")
        .fetch_all(executor)
        .await
        .map_err(AppError::from)
}

/// Customers matching `query` by name or email, with their invoice totals in cents.
pub async fn get_filtered_customers<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    query: &str,
) -> Res<Vec<CustomerSummary>> {
    sqlx::query_as::<_, CustomerSummary>(
        r#"
        SELECT
            customers.id,
            customers.name,
            customers.email,
            customers.image_url,
            COUNT(invoices.id) AS total_invoices,
            COALESCE(SUM(CASE WHEN invoices.status = 'pending' THEN invoices.amount ELSE 0 END), 0)::BIGINT AS total_pending,
            COALESCE(SUM(CASE WHEN invoices.status = 'paid' THEN invoices.amount ELSE 0 END), 0)::BIGINT AS total_paid
        FROM customers
        LEFT JOIN invoices ON customers.id = invoices.customer_id
        WHERE
            customers.name ILIKE $1 OR
            customers.email ILIKE $1
        GROUP BY customers.id, customers.name, customers.email, customers.image_url
        ORDER BY customers.name ASC
        "#,
    )
    .bind(format!("%{}%", query))
    .fetch_all(executor)
    .await
    .map_err(AppError::from)
}
