//! In-memory response cache keyed by request target.

use std::{
    collections::HashMap,
    sync::{Arc, RwLock},
    time::{Duration, Instant},
};

use axum::http::HeaderValue;

use super::lock::{rw_read, rw_write};
use crate::application::render::RenderedPage;

const SOURCE: &str = "cache::store";

/// A stored render and the moment it was stored.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub page: Arc<RenderedPage>,
    pub cache_control: HeaderValue,
    pub stored_at: Instant,
}

/// `now - stored_at < ttl`. An entry exactly `ttl` old is stale.
pub fn is_fresh(entry: &CacheEntry, now: Instant, ttl: Duration) -> bool {
    now.saturating_duration_since(entry.stored_at) < ttl
}

/// Process-lifetime map of rendered responses.
///
/// Entries are never evicted; `put` overwrites unconditionally so the last
/// writer for a key wins.
#[derive(Debug, Default)]
pub struct ResponseCache {
    entries: RwLock<HashMap<String, CacheEntry>>,
}

impl ResponseCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<CacheEntry> {
        rw_read(&self.entries, SOURCE, "get").get(key).cloned()
    }

    pub fn put(&self, key: impl Into<String>, entry: CacheEntry) {
        rw_write(&self.entries, SOURCE, "put").insert(key.into(), entry);
    }

    pub fn len(&self) -> usize {
        rw_read(&self.entries, SOURCE, "len").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;

    use super::*;

    fn entry(body: &str, stored_at: Instant) -> CacheEntry {
        CacheEntry {
            page: Arc::new(RenderedPage::html(StatusCode::OK, body)),
            cache_control: HeaderValue::from_static("public, max-age=60"),
            stored_at,
        }
    }

    #[test]
    fn put_overwrites_existing_key() {
        let cache = ResponseCache::new();
        let now = Instant::now();

        cache.put("/", entry("first", now));
        cache.put("/", entry("second", now));

        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get("/").map(|e| e.page.body.clone()), Some("second".into()));
    }

    #[test]
    fn missing_key_is_none() {
        let cache = ResponseCache::new();
        assert!(cache.get("/nope").is_none());
        assert!(cache.is_empty());
    }

    #[test]
    fn freshness_boundary_is_exclusive() {
        let start = Instant::now();
        let stored = entry("x", start);
        let ttl = Duration::from_secs(10);

        assert!(is_fresh(&stored, start + Duration::from_secs(9), ttl));
        assert!(!is_fresh(&stored, start + ttl, ttl));
        assert!(!is_fresh(&stored, start, Duration::ZERO));
    }
}
