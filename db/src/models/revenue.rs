use serde::Serialize;

#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct Revenue {
    pub month: String,
    pub revenue: i32,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct CardData {
    pub number_of_invoices: i64,
    pub number_of_customers: i64,
    pub total_paid: i64,
    pub total_pending: i64,
}
