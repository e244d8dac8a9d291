//! Caching for price-history responses
//!
//! Recommendation cards each trigger a one-month history fetch; a short TTL
//! cache keeps repeated renders from hammering the quote service.

use crate::api::yahoo::Quote;
use cached::{Cached, TimedCache};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

/// Cache key: symbol plus trailing range
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HistoryKey {
    pub symbol: String,
    pub range: String,
}

impl HistoryKey {
    pub fn new(symbol: impl Into<String>, range: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            range: range.into(),
        }
    }
}

/// Thread-safe TTL cache for history windows
pub struct HistoryCache {
    cache: Arc<RwLock<TimedCache<HistoryKey, Vec<Quote>>>>,
}

impl HistoryCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            cache: Arc::new(RwLock::new(TimedCache::with_lifespan(ttl))),
        }
    }

    pub async fn get(&self, key: &HistoryKey) -> Option<Vec<Quote>> {
        let mut cache = self.cache.write().await;
        cache.cache_get(key).cloned()
    }

    pub async fn insert(&self, key: HistoryKey, quotes: Vec<Quote>) {
        let mut cache = self.cache.write().await;
        let _ = cache.cache_set(key, quotes);
    }

    pub async fn len(&self) -> usize {
        let cache = self.cache.read().await;
        cache.cache_size()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl Clone for HistoryCache {
    fn clone(&self) -> Self {
        Self {
            cache: Arc::clone(&self.cache),
        }
    }
}
