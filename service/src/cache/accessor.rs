//! Cache-through access to upstream resources.

use std::sync::Arc;

use serde_json::Value;

use super::store::CacheStore;
use crate::upstream::{UpstreamError, UpstreamFetcher, UpstreamRequest};

/// Wraps an [`UpstreamFetcher`] with a [`CacheStore`] lookup.
///
/// Concurrent misses on the same key are not coalesced: each caller that
/// misses performs its own upstream fetch and the last one to finish wins the
/// slot. Failures are never stored, so the next call retries upstream.
#[derive(Clone)]
pub struct CachedUpstream {
    store: Arc<CacheStore>,
    fetcher: Arc<dyn UpstreamFetcher>,
}

impl CachedUpstream {
    pub fn new(store: Arc<CacheStore>, fetcher: Arc<dyn UpstreamFetcher>) -> Self {
        Self { store, fetcher }
    }

    /// The backing store, for flushes and sweeps.
    #[must_use]
    pub const fn store(&self) -> &Arc<CacheStore> {
        &self.store
    }

    /// Return the cached payload for `request`, fetching and storing it under
    /// the resource class TTL on a miss.
    ///
    /// # Errors
    /// Propagates the fetcher's [`UpstreamError`] on a miss that fails.
    pub async fn fetch_or_cache(&self, request: &UpstreamRequest) -> Result<Value, UpstreamError> {
        let key = request.cache_key();

        if let Some(value) = self.store.get(&key).await {
            tracing::debug!(%key, "cache hit");
            return Ok(value);
        }

        tracing::debug!(%key, "cache miss, fetching fresh data");
        let class = request.resource_class();
        let value = self.fetcher.fetch(request).await?;
        self.store.set(key, value.clone(), class.ttl()).await;

        Ok(value)
    }
}
