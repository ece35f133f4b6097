use chrono::NaiveDate;
use serde::Serialize;

/// Formats an amount of cents as US dollars, e.g. `$1,234.56`.
pub fn format_currency(cents: i64) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs = cents.unsigned_abs();
    let digits = (abs / 100).to_string();

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    format!("{}${}.{:02}", sign, grouped, abs % 100)
}

/// Formats a date the way the dashboard tables show it, e.g. `Dec 6, 2022`.
pub fn format_date(date: NaiveDate) -> String {
    date.format("%b %-d, %Y").to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "number", rename_all = "lowercase")]
pub enum PageItem {
    Page(u32),
    Ellipsis,
}

/// Pagination links around `current`, at most seven items wide.
pub fn generate_pagination(current: u32, total: u32) -> Vec<PageItem> {
    use PageItem::{Ellipsis, Page};

    if total <= 7 {
        return (1..=total).map(Page).collect();
    }
    if current <= 3 {
        return vec![Page(1), Page(2), Page(3), Ellipsis, Page(total - 1), Page(total)];
    }
    if current >= total - 2 {
        return vec![Page(1), Page(2), Ellipsis, Page(total - 2), Page(total - 1), Page(total)];
    }
    vec![
        Page(1),
        Ellipsis,
        Page(current - 1),
        Page(current),
        Page(current + 1),
        Ellipsis,
        Page(total),
    ]
}

/// Number of pages needed for `count` rows.
pub fn total_pages(count: i64, per_page: i64) -> u32 {
    if count <= 0 {
        return 0;
    }
    ((count + per_page - 1) / per_page) as u32
}

/// Y axis labels for the revenue chart, highest first, and the top value
/// every bar is scaled against.
pub fn generate_y_axis(revenue: &[i32]) -> (Vec<String>, i32) {
    let highest = revenue.iter().copied().max().unwrap_or(0).max(0);
    let top_label = ((highest + 999) / 1000) * 1000;

    let labels = (0..=top_label / 1000)
        .rev()
        .map(|k| format!("${}K", k))
        .collect();

    (labels, top_label)
}
