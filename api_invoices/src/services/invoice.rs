use chrono::{NaiveDate, Utc};
use common::{
    cache::PageCache,
    error::Res,
    form::{ActionOutcome, ActionState},
};
use db::dtos::invoice::InvoiceWrite;
use sqlx::PgPool;
use uuid::Uuid;

use crate::dtos::invoice::{InvoiceForm, validate_invoice};

pub const INVOICES_PATH: &str = "/dashboard/invoices";

/// Routes whose rendered output depends on invoice rows.
pub const REVALIDATED_PATHS: [&str; 2] = [INVOICES_PATH, "/dashboard"];

/// The statements the invoice actions issue. Each action issues at most one.
#[allow(async_fn_in_trait)]
pub trait InvoiceWriter {
    async fn insert(&self, data: &InvoiceWrite, date: NaiveDate) -> Res<()>;
    async fn update(&self, id: Uuid, data: &InvoiceWrite) -> Res<()>;
    async fn delete(&self, id: Uuid) -> Res<u64>;
}

impl InvoiceWriter for PgPool {
    async fn insert(&self, data: &InvoiceWrite, date: NaiveDate) -> Res<()> {
        db::invoice::insert_invoice(self, data, date).await
    }
    async fn update(&self, id: Uuid, data: &InvoiceWrite) -> Res<()> {
        db::invoice::update_invoice(self, id, data).await
    }
    async fn delete(&self, id: Uuid) -> Res<u64> {
        db::invoice::delete_invoice(self, id).await
    }
}

/// Validates the form and inserts a new invoice dated today.
pub async fn create_invoice<W: InvoiceWriter>(
    writer: &W,
    cache: &PageCache,
    form: &InvoiceForm,
) -> ActionOutcome {
    let data = match validate_invoice(form) {
        Ok(data) => data,
        Err(errors) => {
            return ActionOutcome::Rejected(ActionState::from_validation(
                &errors,
                "Missing Fields. Failed to Create Invoice.",
            ));
        }
    };

    let date = Utc::now().date_naive();
    if let Err(error) = writer.insert(&data, date).await {
        log::error!("Failed to create invoice: {}", error);
        return ActionOutcome::Rejected(ActionState::message(
            "Database Error: Failed to Create Invoice.",
        ));
    }

    revalidate(cache);
    ActionOutcome::Redirect(INVOICES_PATH)
}

/// Validates the form and replaces customer, amount and status of invoice `id`.
pub async fn update_invoice<W: InvoiceWriter>(
    writer: &W,
    cache: &PageCache,
    id: Uuid,
    form: &InvoiceForm,
) -> ActionOutcome {
    let data = match validate_invoice(form) {
        Ok(data) => data,
        Err(errors) => {
            return ActionOutcome::Rejected(ActionState::from_validation(
                &errors,
                "Missing Fields. Failed to Update Invoice.",
            ));
        }
    };

    if let Err(error) = writer.update(id, &data).await {
        log::error!("Failed to update invoice {}: {}", id, error);
        return ActionOutcome::Rejected(ActionState::message(
            "Database Error: Failed to Update Invoice.",
        ));
    }

    revalidate(cache);
    ActionOutcome::Redirect(INVOICES_PATH)
}

/// Deletes invoice `id`. Deleting an id that is already gone still redirects.
pub async fn delete_invoice<W: InvoiceWriter>(
    writer: &W,
    cache: &PageCache,
    id: Uuid,
) -> ActionOutcome {
    match writer.delete(id).await {
        Ok(0) => log::warn!("Invoice {} was already deleted", id),
        Ok(_) => {}
        Err(error) => {
            log::error!("Failed to delete invoice {}: {}", id, error);
            return ActionOutcome::Rejected(ActionState::message(
                "Database Error: Failed to Delete Invoice.",
            ));
        }
    }

    revalidate(cache);
    ActionOutcome::Redirect(INVOICES_PATH)
}

fn revalidate(cache: &PageCache) {
    for path in REVALIDATED_PATHS {
        cache.revalidate_path(path);
    }
}
