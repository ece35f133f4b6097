use common::error::{AppError, Res};
use sqlx::PgPool;

use crate::models::revenue::{CardData, Revenue};

/// Month abbreviations in calendar order, as stored in `revenue.month`.
pub const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Revenue per month in calendar order.
pub async fn get_revenue(pool: &PgPool) -> Res<Vec<Revenue>> {
    sqlx::query_as::<_, Revenue>(
        r#"
        SELECT month, revenue
        FROM revenue
        ORDER BY array_position($1::TEXT[], month::TEXT) NULLS LAST, month
        "#,
    )
    .bind(&MONTHS[..])
    .fetch_all(pool)
    .await
    .map_err(AppError::from)
}

/// Totals shown on the overview cards; the three queries run concurrently.
pub async fn get_card_data(pool: &PgPool) -> Res<CardData> {
    let invoice_count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM invoices").fetch_one(pool);
    let customer_count =
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM customers").fetch_one(pool);
    let status_totals = sqlx::query_as::<_, (i64, i64)>(
        r#"
        SELECT
            COALESCE(SUM(CASE WHEN status = 'paid' THEN amount ELSE 0 END), 0)::BIGINT AS paid,
            COALESCE(SUM(CASE WHEN status = 'pending' THEN amount ELSE 0 END), 0)::BIGINT AS pending
        FROM invoices
        "#,
    )
    .fetch_one(pool);

    let (number_of_invoices, number_of_customers, (total_paid, total_pending)) =
        tokio::try_join!(invoice_count, customer_count, status_totals)
            .map_err(AppError::from)?;

    Ok(CardData {
        number_of_invoices,
        number_of_customers,
        total_paid,
        total_pending,
    })
}
