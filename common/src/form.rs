use std::collections::BTreeMap;

use actix_web::http::StatusCode;
use serde::Serialize;
use validator::ValidationErrors;

/// State handed back to a form after a rejected action.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct ActionState {
    pub message: Option<String>,
    pub errors: BTreeMap<String, Vec<String>>,
}

impl ActionState {
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            errors: BTreeMap::new(),
        }
    }

    /// Flattens validator output into a field → messages map.
    pub fn from_validation(errors: &ValidationErrors, message: impl Into<String>) -> Self {
        let mut fields = BTreeMap::new();
        for (field, field_errors) in errors.field_errors() {
            let messages = field_errors
                .iter()
                .map(|e| {
                    e.message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("Invalid {}", field))
                })
                .collect::<Vec<_>>();
            fields.insert(field.to_string(), messages);
        }
        Self {
            message: Some(message.into()),
            errors: fields,
        }
    }

    pub fn field(&self, name: &str) -> &[String] {
        self.errors.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Field errors are the client's to fix; a bare message means the write failed.
    pub fn rejection_status(&self) -> StatusCode {
        if self.errors.is_empty() {
            StatusCode::INTERNAL_SERVER_ERROR
        } else {
            StatusCode::UNPROCESSABLE_ENTITY
        }
    }
}

/// Result of a server action.
#[derive(Debug, PartialEq)]
pub enum ActionOutcome {
    /// The write went through; send the browser to this path.
    Redirect(&'static str),
    /// Nothing was written; show the state on the originating form.
    Rejected(ActionState),
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::ValidationError;

    #[test]
    fn validation_errors_are_keyed_by_field() {
        let mut errors = ValidationErrors::new();
        let mut err = ValidationError::new("range");
        err.message = Some("Please enter an amount greater than $0.".into());
        errors.add("amount", err);
        errors.add("status", ValidationError::new("required"));

        let state = ActionState::from_validation(&errors, "Missing Fields.");
        assert_eq!(state.message.as_deref(), Some("Missing Fields."));
        assert_eq!(state.field("amount"), ["Please enter an amount greater than $0."]);
        assert_eq!(state.field("status"), ["Invalid status"]);
        assert!(state.field("customer_id").is_empty());
        assert_eq!(state.rejection_status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(
            ActionState::message("Database Error").rejection_status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
