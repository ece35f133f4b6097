use chrono::NaiveDate;
use common::error::{AppError, Res};
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    dtos::{customer::CustomerWrite, invoice::InvoiceWrite, user::UserCreateRequest},
    models::invoice::InvoiceStatus,
};

pub const DEMO_EMAIL: &str = "user@nextmail.com";
pub const DEMO_PASSWORD: &str = "123456";

const CUSTOMERS: [(&str, &str); 6] = [
    ("Evil Rabbit", "evil@rabbit.com"),
    ("Delba de Oliveira", "delba@oliveira.com"),
    ("Lee Robinson", "lee@robinson.com"),
    ("Michael Novotny", "michael@novotny.com"),
    ("Amy Burns", "amy@burns.com"),
    ("Balazs Orban", "balazs@orban.com"),
];

// (customer index, cents, status, date)
const INVOICES: [(usize, i32, InvoiceStatus, (i32, u32, u32)); 10] = [
    (0, 15795, InvoiceStatus::Pending, (2022, 12, 6)),
    (1, 20348, InvoiceStatus::Pending, (2022, 11, 14)),
    (4, 3040, InvoiceStatus::Paid, (2022, 10, 29)),
    (3, 44800, InvoiceStatus::Paid, (2023, 9, 10)),
    (5, 34577, InvoiceStatus::Pending, (2023, 8, 5)),
    (2, 54246, InvoiceStatus::Pending, (2023, 7, 16)),
    (0, 666, InvoiceStatus::Pending, (2023, 6, 27)),
    (3, 32545, InvoiceStatus::Paid, (2023, 6, 9)),
    (4, 1250, InvoiceStatus::Paid, (2023, 6, 17)),
    (5, 8546, InvoiceStatus::Paid, (2023, 6, 7)),
];

const REVENUE: [(&str, i32); 12] = [
    ("Jan", 2000),
    ("Feb", 1800),
    ("Mar", 2200),
    ("Apr", 2500),
    ("May", 2300),
    ("Jun", 3200),
    ("Jul", 3500),
    ("Aug", 3700),
    ("Sep", 2500),
    ("Oct", 2800),
    ("Nov", 3000),
    ("Dec", 4800),
];

/// Inserts the demo user, customers, invoices and revenue when no user exists yet.
/// Returns whether anything was written.
pub async fn run(pool: &PgPool, password_hash: String, image_url: &str) -> Res<bool> {
    if crate::user::exists_any_user(pool).await? {
        return Ok(false);
    }

    let mut tx = pool.begin().await?;

    crate::user::insert_user(
        &mut *tx,
        UserCreateRequest {
            name: "User".to_string(),
            email: DEMO_EMAIL.to_string(),
            password_hash,
        },
    )
    .await?;

    let mut customer_ids = Vec::with_capacity(CUSTOMERS.len());
    for (name, email) in CUSTOMERS {
        let id = Uuid::new_v4();
        crate::customer::insert_customer(
            &mut *tx,
            id,
            &CustomerWrite {
                name: name.to_string(),
                email: email.to_string(),
                image_url: image_url.to_string(),
            },
        )
        .await?;
        customer_ids.push(id);
    }

    for (customer, amount_cents, status, (y, m, d)) in INVOICES {
        let date = NaiveDate::from_ymd_opt(y, m, d)
            .ok_or_else(|| AppError::Internal(format!("Invalid seed date {}-{}-{}", y, m, d)))?;
        crate::invoice::insert_invoice(
            &mut *tx,
            &InvoiceWrite {
                customer_id: customer_ids[customer],
                amount_cents,
                status,
            },
            date,
        )
        .await?;
    }

    for (month, revenue) in REVENUE {
        sqlx::query(
            "INSERT INTO revenue (month, revenue) VALUES ($1, $2) ON CONFLICT (month) DO NOTHING",
        )
        .bind(month)
        .bind(revenue)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    log::info!("Seeded demo data, sign in as {}", DEMO_EMAIL);
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::MONTHS;

    #[test]
    fn demo_revenue_covers_every_month_once() {
        let months: Vec<&str> = REVENUE.iter().map(|(month, _)| *month).collect();
        assert_eq!(months, MONTHS);
    }
}
