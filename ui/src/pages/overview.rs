use std::sync::Arc;

use actix_web::{HttpRequest, HttpResponse, web};
use common::{cache::PageCache, error::Res, misc::generate_y_axis};
use db::models::revenue::Revenue;
use serde::Serialize;
use sqlx::PgPool;
use tera::Context;

use crate::{Renderer, cached_page};

#[derive(Debug, Serialize, PartialEq)]
pub struct ChartBar {
    pub month: String,
    pub revenue: i32,
    /// Percentage of the chart height.
    pub height: f64,
}

/// Scales every month against the top label of the y axis.
pub fn chart_bars(revenue: &[Revenue]) -> (Vec<String>, Vec<ChartBar>) {
    let values: Vec<i32> = revenue.iter().map(|r| r.revenue).collect();
    let (labels, top_label) = generate_y_axis(&values);
    let bars = revenue
        .iter()
        .map(|r| ChartBar {
            month: r.month.clone(),
            revenue: r.revenue,
            height: if top_label > 0 {
                f64::from(r.revenue) / f64::from(top_label) * 100.0
            } else {
                0.0
            },
        })
        .collect();
    (labels, bars)
}

/// Overview page: cards, revenue chart and the latest invoices.
pub async fn get_overview(
    req: HttpRequest,
    pool: web::Data<Arc<PgPool>>,
    renderer: web::Data<Arc<Renderer>>,
    cache: web::Data<Arc<PageCache>>,
) -> Res<HttpResponse> {
    let pg_pool: &PgPool = &pool;
    cached_page(&cache, &req, "", || async move {
        let (revenue, latest, cards) = futures::try_join!(
            db::dashboard::get_revenue(pg_pool),
            db::invoice::get_latest_invoices(pg_pool),
            db::dashboard::get_card_data(pg_pool)
        )?;
        let (y_axis, chart) = chart_bars(&revenue);

        let mut context = Context::new();
        context.insert("section", "home");
        context.insert("cards", &cards);
        context.insert("latest", &latest);
        context.insert("y_axis", &y_axis);
        context.insert("chart", &chart);
        renderer.render("dashboard.html", &context)
    })
    .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bars_are_scaled_to_top_label() {
        let revenue = vec![
            Revenue { month: "Jan".into(), revenue: 2000 },
            Revenue { month: "Dec".into(), revenue: 4800 },
        ];
        let (labels, bars) = chart_bars(&revenue);
        assert_eq!(labels.first().map(String::as_str), Some("$5K"));
        assert_eq!(bars[0].height, 40.0);
        assert_eq!(bars[1].height, 96.0);
    }
}
