use std::collections::HashMap;

use chrono::NaiveDate;
use common::{
    error::Res,
    misc::{format_currency, format_date},
};
use serde_json::Value;
use tera::{Context, Tera};

const TEMPLATES: [(&str, &str); 8] = [
    ("base.html", include_str!("../templates/base.html")),
    ("login.html", include_str!("../templates/login.html")),
    ("dashboard.html", include_str!("../templates/dashboard.html")),
    ("notice.html", include_str!("../templates/notice.html")),
    ("invoices/list.html", include_str!("../templates/invoices/list.html")),
    ("invoices/form.html", include_str!("../templates/invoices/form.html")),
    ("customers/list.html", include_str!("../templates/customers/list.html")),
    ("customers/form.html", include_str!("../templates/customers/form.html")),
];

/// Tera instance with every dashboard template compiled in.
pub struct Renderer {
    tera: Tera,
}

impl Renderer {
    pub fn new() -> Res<Self> {
        let mut tera = Tera::default();
        tera.add_raw_templates(TEMPLATES)?;
        tera.register_filter("currency", currency_filter);
        tera.register_filter("local_date", local_date_filter);
        Ok(Self { tera })
    }

    pub fn render(&self, template: &str, context: &Context) -> Res<String> {
        self.tera.render(template, context).map_err(Into::into)
    }

    /// Short page with a heading, one line of text and a link back.
    pub fn notice(&self, heading: &str, text: &str, back: &str) -> Res<String> {
        let mut context = Context::new();
        context.insert("section", "");
        context.insert("heading", heading);
        context.insert("text", text);
        context.insert("back", back);
        self.render("notice.html", &context)
    }

    /// Page shown when a record addressed by the URL does not exist.
    pub fn not_found(&self, what: &str, back: &str) -> Res<String> {
        self.notice(
            "404 Not Found",
            &format!("Could not find the requested {}.", what),
            back,
        )
    }
}

fn currency_filter(value: &Value, _: &HashMap<String, Value>) -> tera::Result<Value> {
    let cents = value
        .as_i64()
        .ok_or_else(|| tera::Error::msg(format!("currency expects cents, got {}", value)))?;
    Ok(Value::String(format_currency(cents)))
}

fn local_date_filter(value: &Value, _: &HashMap<String, Value>) -> tera::Result<Value> {
    let raw = value
        .as_str()
        .ok_or_else(|| tera::Error::msg(format!("local_date expects a date, got {}", value)))?;
    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|e| tera::Error::msg(format!("local_date: {}", e)))?;
    Ok(Value::String(format_date(date)))
}
