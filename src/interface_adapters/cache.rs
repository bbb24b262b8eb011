//! Bounded render cache with TTL and least-recently-used eviction.

use std::time::Duration;

use moka::policy::EvictionPolicy;
use moka::sync::Cache;

use crate::domain::ports::RenderCache;

/// Rendered image URLs keyed by the content hash of the signed data.
///
/// Expired entries are never returned, but their memory is only reclaimed
/// by pending maintenance; see `run_pending_tasks`.
#[derive(Clone)]
pub struct InMemoryRenderCache {
    inner: Cache<String, String>,
}

impl InMemoryRenderCache {
    /// Create a cache holding at most `capacity` entries for `ttl` each.
    pub fn new(capacity: u64, ttl: Duration) -> Self {
        let inner = Cache::builder()
            .max_capacity(capacity.max(1))
            .time_to_live(ttl)
            .eviction_policy(EvictionPolicy::lru())
            .build();

        Self { inner }
    }

    /// Apply queued evictions and drop expired entries.
    pub fn run_pending_tasks(&self) {
        self.inner.run_pending_tasks();
    }

    pub fn entry_count(&self) -> u64 {
        self.inner.run_pending_tasks();
        self.inner.entry_count()
    }

    pub fn is_empty(&self) -> bool {
        self.entry_count() == 0
    }
}

impl RenderCache for InMemoryRenderCache {
    fn get(&self, key: &str) -> Option<String> {
        self.inner.get(key)
    }

    fn insert(&self, key: String, url: String) {
        self.inner.insert(key, url);
    }
}
