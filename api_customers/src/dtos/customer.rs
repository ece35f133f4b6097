use std::sync::LazyLock;

use db::dtos::customer::CustomerWrite;
use regex::Regex;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationErrors};

/// Something before an `@`, a domain, a dot and a TLD; no whitespace anywhere.
static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap()
});

/// Customer form exactly as the browser posts it.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct CustomerForm {
    #[serde(default)]
    #[validate(length(min = 2, message = "Name must be at least 2 characters."))]
    pub name: String,
    #[serde(default)]
    #[validate(regex(path = *EMAIL_RE, message = "Please enter a valid email address."))]
    pub email: String,
}

/// Validates the posted form and produces the row to write. The image is
/// always the placeholder.
pub fn validate_customer(form: &CustomerForm) -> Result<CustomerWrite, ValidationErrors> {
    let trimmed = CustomerForm {
        name: form.name.trim().to_string(),
        email: form.email.trim().to_string(),
    };
    trimmed.validate()?;

    Ok(CustomerWrite {
        name: trimmed.name,
        email: trimmed.email,
        image_url: ui::PLACEHOLDER_IMAGE_URL.to_string(),
    })
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    pub query: Option<String>,
}

impl SearchParams {
    pub fn query(&self) -> &str {
        self.query.as_deref().map(str::trim).unwrap_or("")
    }
}
