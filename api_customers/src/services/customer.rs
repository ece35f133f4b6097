use common::{
    cache::PageCache,
    error::Res,
    form::{ActionOutcome, ActionState},
};
use db::dtos::customer::CustomerWrite;
use sqlx::PgPool;
use uuid::Uuid;

use crate::dtos::customer::{CustomerForm, validate_customer};

pub const CUSTOMERS_PATH: &str = "/dashboard/customers";

/// Customer names and totals also appear on the invoice list and the overview.
pub const REVALIDATED_PATHS: [&str; 3] = [CUSTOMERS_PATH, "/dashboard/invoices", "/dashboard"];

#[allow(async_fn_in_trait)]
pub trait CustomerWriter {
    async fn insert(&self, id: Uuid, data: &CustomerWrite) -> Res<()>;
    async fn update(&self, id: Uuid, data: &CustomerWrite) -> Res<()>;
    async fn delete(&self, id: Uuid) -> Res<u64>;
}

impl CustomerWriter for PgPool {
    async fn insert(&self, id: Uuid, data: &CustomerWrite) -> Res<()> {
        db::customer::insert_customer(self, id, data).await
    }
    async fn update(&self, id: Uuid, data: &CustomerWrite) -> Res<()> {
        db::customer::update_customer(self, id, data).await
    }
    async fn delete(&self, id: Uuid) -> Res<u64> {
        db::customer::delete_customer(self, id).await
    }
}

/// Validates the form and inserts a customer under a freshly generated id.
pub async fn create_customer<W: CustomerWriter>(
    writer: &W,
    cache: &PageCache,
    form: &CustomerForm,
) -> ActionOutcome {
    let data = match validate_customer(form) {
        Ok(data) => data,
        Err(errors) => {
            return ActionOutcome::Rejected(ActionState::from_validation(
                &errors,
                "Missing Fields. Failed to Create Customer.",
            ));
        }
    };

    let id = Uuid::new_v4();
    if let Err(error) = writer.insert(id, &data).await {
        log::error!("Failed to create customer: {}", error);
        return ActionOutcome::Rejected(ActionState::message(
            "Database Error: Failed to Create Customer.",
        ));
    }

    revalidate(cache);
    ActionOutcome::Redirect(CUSTOMERS_PATH)
}

/// Validates the form and replaces the whole customer record `id`.
pub async fn update_customer<W: CustomerWriter>(
    writer: &W,
    cache: &PageCache,
    id: Uuid,
    form: &CustomerForm,
) -> ActionOutcome {
    let data = match validate_customer(form) {
        Ok(data) => data,
        Err(errors) => {
            return ActionOutcome::Rejected(ActionState::from_validation(
                &errors,
                "Missing Fields. Failed to Update Customer.",
            ));
        }
    };

    if let Err(error) = writer.update(id, &data).await {
        log::error!("Failed to update customer {}: {}", id, error);
        return ActionOutcome::Rejected(ActionState::message(
            "Database Error: Failed to Update Customer.",
        ));
    }

    revalidate(cache);
    ActionOutcome::Redirect(CUSTOMERS_PATH)
}

pub async fn delete_customer<W: CustomerWriter>(
    writer: &W,
    cache: &PageCache,
    id: Uuid,
) -> ActionOutcome {
    match writer.delete(id).await {
        Ok(0) => log::warn!("Customer {} was already deleted", id),
        Ok(_) => {}
        Err(error) => {
            log::error!("Failed to delete customer {}: {}", id, error);
            return ActionOutcome::Rejected(ActionState::message(
                "Database Error: Failed to Delete Customer.",
            ));
        }
    }

    revalidate(cache);
    ActionOutcome::Redirect(CUSTOMERS_PATH)
}

fn revalidate(cache: &PageCache) {
    for path in REVALIDATED_PATHS {
        cache.revalidate_path(path);
    }
}
