use std::future::Future;

use actix_web::{HttpRequest, HttpResponse};
use common::{cache::PageCache, error::Res, http::Page};

/// Serves the page for this request from `cache`, rendering and storing it on a miss.
///
/// `variant` identifies the parameters the page depends on. Built by the
/// handler from its parsed query, never from the raw query string, so unknown
/// parameters all share one entry.
pub async fn cached_page<F, Fut>(
    cache: &PageCache,
    req: &HttpRequest,
    variant: &str,
    render: F,
) -> Res<HttpResponse>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Res<String>>,
{
    let key = PageCache::key(req.path(), variant);
    if let Some(html) = cache.get(&key) {
        log::debug!("Cache hit {}", key);
        return Page::ok(html);
    }

    let generation = cache.generation(req.path());
    let html = render().await?;
    cache.insert_if_fresh(key, html.clone(), generation);
    Page::ok(html)
}
