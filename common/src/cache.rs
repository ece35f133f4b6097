use std::{
    sync::atomic::{AtomicU64, Ordering},
    time::{Duration, Instant},
};

use dashmap::DashMap;

/// Entries kept before the least recently stored one is evicted.
pub const DEFAULT_CAPACITY: usize = 512;
/// How long a rendered page may be served without a write touching its route.
pub const DEFAULT_TTL: Duration = Duration::from_secs(300);

struct CachedPage {
    html: String,
    expires_at: Instant,
    stored: u64,
}

impl CachedPage {
    fn is_expired(&self) -> bool {
        Instant::now() > self.expires_at
    }
}

/// Rendered pages keyed by `path` or `path?variant`.
///
/// Every route has a generation counter bumped by `revalidate_path`. A page
/// rendered under an older generation is never stored, so a render that
/// overlapped a write cannot bring back the pre-write page.
pub struct PageCache {
    entries: DashMap<String, CachedPage>,
    generations: DashMap<String, u64>,
    capacity: usize,
    ttl: Duration,
    stores: AtomicU64,
}

impl Default for PageCache {
    fn default() -> Self {
        Self::with_limits(DEFAULT_CAPACITY, DEFAULT_TTL)
    }
}

impl PageCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limits(capacity: usize, ttl: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            generations: DashMap::new(),
            capacity: capacity.max(1),
            ttl,
            stores: AtomicU64::new(0),
        }
    }

    pub fn key(path: &str, variant: &str) -> String {
        if variant.is_empty() {
            path.to_string()
        } else {
            format!("{}?{}", path, variant)
        }
    }

    pub fn get(&self, key: &str) -> Option<String> {
        if let Some(entry) = self.entries.get(key) {
            if !entry.is_expired() {
                return Some(entry.html.clone());
            }
        }
        self.entries.remove_if(key, |_, entry| entry.is_expired());
        None
    }

    /// Current generation of `path`. Read it before rendering and hand it to
    /// `insert_if_fresh`.
    pub fn generation(&self, path: &str) -> u64 {
        self.generations.get(path).map_or(0, |generation| *generation)
    }

    /// Stores `html` unless `route_of(key)` was revalidated since `generation` was read.
    pub fn insert_if_fresh(&self, key: String, html: String, generation: u64) -> bool {
        // holding the generation entry keeps `revalidate_path` from bumping it mid-insert
        let current = self.generations.entry(route_of(&key).to_string()).or_insert(0);
        if *current != generation {
            log::debug!("Dropped stale render of {}", key);
            return false;
        }
        self.store(key, html);
        true
    }

    pub fn insert(&self, key: String, html: String) {
        self.store(key, html);
    }

    /// Drops every cached variant of `path`, whatever its query string.
    pub fn revalidate_path(&self, path: &str) {
        *self.generations.entry(path.to_string()).or_insert(0) += 1;
        self.entries.retain(|key, _| route_of(key) != path);
        log::debug!("Revalidated {}", path);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn store(&self, key: String, html: String) {
        if !self.entries.contains_key(&key) && self.entries.len() >= self.capacity {
            self.entries.retain(|_, entry| !entry.is_expired());
            if self.entries.len() >= self.capacity {
                self.evict_oldest();
            }
        }
        let page = CachedPage {
            html,
            expires_at: Instant::now() + self.ttl,
            stored: self.stores.fetch_add(1, Ordering::Relaxed),
        };
        self.entries.insert(key, page);
    }

    fn evict_oldest(&self) {
        let oldest = self
            .entries
            .iter()
            .min_by_key(|entry| entry.stored)
            .map(|entry| entry.key().clone());
        if let Some(key) = oldest {
            self.entries.remove(&key);
        }
    }
}

fn route_of(key: &str) -> &str {
    key.split_once('?').map_or(key, |(path, _)| path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn revalidation_drops_all_query_variants() {
        let cache = PageCache::new();
        cache.insert(PageCache::key("/dashboard/invoices", ""), "a".into());
        cache.insert(PageCache::key("/dashboard/invoices", "page=2"), "b".into());
        cache.insert(PageCache::key("/dashboard/customers", ""), "c".into());

        cache.revalidate_path("/dashboard/invoices");

        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get("/dashboard/customers").as_deref(), Some("c"));
        assert!(cache.get("/dashboard/invoices?page=2").is_none());
    }

    #[test]
    fn revalidation_does_not_touch_nested_routes() {
        let cache = PageCache::new();
        cache.insert("/dashboard".into(), "overview".into());
        cache.insert("/dashboard/invoices".into(), "list".into());

        cache.revalidate_path("/dashboard");

        assert!(cache.get("/dashboard").is_none());
        assert_eq!(cache.get("/dashboard/invoices").as_deref(), Some("list"));
    }

    #[test]
    fn render_from_before_revalidation_is_not_stored() {
        let cache = PageCache::new();
        let generation = cache.generation("/dashboard/invoices");

        cache.revalidate_path("/dashboard/invoices");

        assert!(!cache.insert_if_fresh("/dashboard/invoices?p".into(), "old".into(), generation));
        assert!(cache.is_empty());

        let generation = cache.generation("/dashboard/invoices");
        assert!(cache.insert_if_fresh("/dashboard/invoices?p".into(), "new".into(), generation));
        assert_eq!(cache.get("/dashboard/invoices?p").as_deref(), Some("new"));
    }

    #[test]
    fn other_routes_keep_their_generation() {
        let cache = PageCache::new();
        let generation = cache.generation("/dashboard/customers");

        cache.revalidate_path("/dashboard/invoices");

        assert!(cache.insert_if_fresh("/dashboard/customers".into(), "c".into(), generation));
    }

    #[test]
    fn capacity_bounds_the_number_of_pages() {
        let cache = PageCache::with_limits(3, DEFAULT_TTL);
        for i in 0..100 {
            cache.insert(PageCache::key("/dashboard/customers", &i.to_string()), "c".into());
        }

        assert_eq!(cache.len(), 3);
        assert!(cache.get("/dashboard/customers?99").is_some());
        assert!(cache.get("/dashboard/customers?0").is_none());
    }

    #[test]
    fn expired_pages_are_not_served() {
        let cache = PageCache::with_limits(8, Duration::ZERO);
        cache.insert("/dashboard".into(), "overview".into());

        std::thread::sleep(Duration::from_millis(2));

        assert!(cache.get("/dashboard").is_none());
        assert!(cache.is_empty());
    }
}
