use db::{dtos::invoice::InvoiceWrite, models::invoice::InvoiceStatus};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError, ValidationErrors};

/// Invoice form exactly as the browser posts it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InvoiceForm {
    #[serde(default)]
    pub customer_id: String,
    /// Dollars, e.g. `157.95`.
    #[serde(default)]
    pub amount: String,
    #[serde(default)]
    pub status: String,
}

#[derive(Debug, Validate)]
pub struct InvoiceInput {
    #[validate(required(message = "Please select a customer."))]
    pub customer_id: Option<Uuid>,
    #[validate(range(exclusive_min = 0.0, message = "Please enter an amount greater than $0."))]
    pub amount: f64,
    #[validate(required(message = "Please select an invoice status."))]
    pub status: Option<InvoiceStatus>,
}

impl From<&InvoiceForm> for InvoiceInput {
    fn from(form: &InvoiceForm) -> Self {
        InvoiceInput {
            customer_id: Uuid::parse_str(form.customer_id.trim()).ok(),
            // blank or unparseable amounts count as 0 and fail the range check
            amount: form
                .amount
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|amount| amount.is_finite())
                .unwrap_or(0.0),
            status: InvoiceStatus::parse(form.status.trim()),
        }
    }
}

/// Converts dollars to integer cents, rounding to the nearest cent.
pub fn amount_in_cents(amount: f64) -> Option<i32> {
    let cents = (amount * 100.0).round();
    if cents >= f64::from(i32::MIN) && cents <= f64::from(i32::MAX) {
        Some(cents as i32)
    } else {
        None
    }
}

/// Validates the posted form and produces the row to write. Every failing
/// field is reported at once.
pub fn validate_invoice(form: &InvoiceForm) -> Result<InvoiceWrite, ValidationErrors> {
    let input = InvoiceInput::from(form);
    let mut errors = input.validate().err().unwrap_or_else(ValidationErrors::new);

    let amount_cents = match amount_in_cents(input.amount) {
        Some(cents) if cents > 0 => Some(cents),
        // fractions of a cent round to nothing
        Some(_) => {
            add_amount_error(&mut errors, "Please enter an amount greater than $0.");
            None
        }
        None => {
            add_amount_error(&mut errors, "Please enter a smaller amount.");
            None
        }
    };

    match (input.customer_id, amount_cents, input.status) {
        (Some(customer_id), Some(amount_cents), Some(status)) if errors.is_empty() => {
            Ok(InvoiceWrite {
                customer_id,
                amount_cents,
                status,
            })
        }
        _ => Err(errors),
    }
}

/// Adds `message` unless the range check already reported the amount.
fn add_amount_error(errors: &mut ValidationErrors, message: &'static str) {
    if errors.field_errors().contains_key("amount") {
        return;
    }
    let mut error = ValidationError::new("range");
    error.message = Some(message.into());
    errors.add("amount", error);
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    pub query: Option<String>,
    pub page: Option<String>,
}

impl SearchParams {
    pub fn query(&self) -> &str {
        self.query.as_deref().map(str::trim).unwrap_or("")
    }

    /// 1-based page number; anything unparseable is the first page.
    pub fn page(&self) -> u32 {
        self.page
            .as_deref()
            .and_then(|p| p.parse::<u32>().ok())
            .filter(|p| *p > 0)
            .unwrap_or(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::form::ActionState;

    fn form(customer_id: &str, amount: &str, status: &str) -> InvoiceForm {
        InvoiceForm {
            customer_id: customer_id.to_string(),
            amount: amount.to_string(),
            status: status.to_string(),
        }
    }

    const CUSTOMER: &str = "3958dc9e-712f-4377-85e9-fec4b6a6442a";

    #[test]
    fn valid_form_is_scaled_to_cents() {
        let write = validate_invoice(&form(CUSTOMER, "157.95", "pending")).unwrap();
        assert_eq!(write.amount_cents, 15795);
        assert_eq!(write.status, InvoiceStatus::Pending);
        assert_eq!(write.customer_id.to_string(), CUSTOMER);
    }

    #[test]
    fn float_noise_is_rounded_away() {
        assert_eq!(amount_in_cents(19.99), Some(1999));
        assert_eq!(amount_in_cents(0.29), Some(29));
        assert_eq!(amount_in_cents(1e12), None);
    }

    #[test]
    fn zero_and_negative_amounts_are_rejected() {
        for amount in ["0", "-5", "", "abc", "NaN", "0.001"] {
            let errors = validate_invoice(&form(CUSTOMER, amount, "paid")).unwrap_err();
            let state = ActionState::from_validation(&errors, "");
            assert_eq!(
                state.field("amount"),
                ["Please enter an amount greater than $0."],
                "amount {:?}",
                amount
            );
        }
    }

    #[test]
    fn huge_amount_is_rejected() {
        let errors = validate_invoice(&form(CUSTOMER, "99999999999", "paid")).unwrap_err();
        let state = ActionState::from_validation(&errors, "");
        assert_eq!(state.field("amount"), ["Please enter a smaller amount."]);
    }

    #[test]
    fn empty_form_reports_every_field() {
        let errors = validate_invoice(&InvoiceForm::default()).unwrap_err();
        let state = ActionState::from_validation(&errors, "Missing Fields. Failed to Create Invoice.");
        assert_eq!(state.field("customer_id"), ["Please select a customer."]);
        assert_eq!(state.field("amount"), ["Please enter an amount greater than $0."]);
        assert_eq!(state.field("status"), ["Please select an invoice status."]);
    }

    #[test]
    fn sub_cent_amount_is_reported_with_other_fields() {
        let errors = validate_invoice(&form("", "0.001", "paid")).unwrap_err();
        let state = ActionState::from_validation(&errors, "");
        assert_eq!(state.field("customer_id"), ["Please select a customer."]);
        assert_eq!(state.field("amount"), ["Please enter an amount greater than $0."]);
        assert!(state.field("status").is_empty());
    }

    #[test]
    fn status_outside_enum_is_rejected() {
        let errors = validate_invoice(&form(CUSTOMER, "10", "overdue")).unwrap_err();
        let state = ActionState::from_validation(&errors, "");
        assert_eq!(state.field("status"), ["Please select an invoice status."]);
        assert!(state.field("amount").is_empty());
    }

    #[test]
    fn search_params_default_to_first_page() {
        let params = SearchParams {
            query: Some("  lee ".into()),
            page: Some("zero".into()),
        };
        assert_eq!(params.query(), "lee");
        assert_eq!(params.page(), 1);
        assert_eq!(SearchParams { query: None, page: Some("3".into()) }.page(), 3);
    }
}
