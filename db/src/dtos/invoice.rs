use uuid::Uuid;

use crate::models::invoice::InvoiceStatus;

/// Full replacement of the writable invoice columns.
#[derive(Debug, Clone, PartialEq)]
pub struct InvoiceWrite {
    pub customer_id: Uuid,
    pub amount_cents: i32,
    pub status: InvoiceStatus,
}
