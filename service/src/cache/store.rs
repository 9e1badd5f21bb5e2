//! In-memory key/value store with per-entry expiry, backed by moka.

use std::sync::{Arc, Weak};
use std::time::{Duration, Instant};

use moka::{future::Cache, Expiry};
use serde_json::Value;

/// A cached upstream payload and the TTL it was stored under.
#[derive(Debug, Clone)]
struct CacheEntry {
    value: Value,
    ttl: Duration,
}

/// Expires each entry after its own TTL. Overwrites restart the clock.
struct EntryTtl;

impl Expiry<String, CacheEntry> for EntryTtl {
    fn expire_after_create(
        &self,
        _key: &String,
        entry: &CacheEntry,
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(entry.ttl)
    }

    fn expire_after_update(
        &self,
        _key: &String,
        entry: &CacheEntry,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        Some(entry.ttl)
    }
}

/// Process-wide cache of upstream payloads.
///
/// A read at or past an entry's expiry is a miss. Expired entries are
/// reclaimed by moka's housekeeping, which [`CacheStore::sweep_expired`]
/// runs on demand. The store has no size bound. Values are cloned out on read
/// so callers never share mutable state through the cache.
pub struct CacheStore {
    entries: Cache<String, CacheEntry>,
}

impl Default for CacheStore {
    fn default() -> Self {
        Self {
            entries: Cache::builder().expire_after(EntryTtl).build(),
        }
    }
}

impl CacheStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a live entry.
    pub async fn get(&self, key: &str) -> Option<Value> {
        self.entries.get(key).await.map(|entry| entry.value)
    }

    /// Insert or overwrite `key`, resetting its expiry to `now + ttl`.
    pub async fn set(&self, key: impl Into<String>, value: Value, ttl: Duration) {
        self.entries.insert(key.into(), CacheEntry { value, ttl }).await;
    }

    /// Remove every entry. Returns how many live entries were dropped.
    pub async fn flush_all(&self) -> u64 {
        let removed = self.len().await;
        self.entries.invalidate_all();
        self.entries.run_pending_tasks().await;
        removed
    }

    /// Run pending housekeeping, evicting entries whose expiry has passed.
    pub async fn sweep_expired(&self) {
        self.entries.run_pending_tasks().await;
    }

    /// Number of live entries.
    pub async fn len(&self) -> u64 {
        self.sweep_expired().await;
        self.entries.entry_count()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

/// Spawn a background task that sweeps `store` every `period`.
///
/// The task holds only a weak reference and exits once the store is dropped.
pub fn spawn_sweeper(store: &Arc<CacheStore>, period: Duration) -> tokio::task::JoinHandle<()> {
    let weak: Weak<CacheStore> = Arc::downgrade(store);
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        // First tick completes immediately.
        interval.tick().await;

        loop {
            interval.tick().await;
            let Some(store) = weak.upgrade() else {
                break;
            };
            store.sweep_expired().await;
            tracing::debug!(entries = store.entries.entry_count(), "cache swept");
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn get_returns_none_for_missing_key() {
        let store = CacheStore::new();
        assert!(store.get("nope").await.is_none());
    }

    #[tokio::test]
    async fn set_then_get_returns_value() {
        let store = CacheStore::new();
        store
            .set("vote_detail_7", json!({"roll": 7}), Duration::from_secs(60))
            .await;

        assert_eq!(store.get("vote_detail_7").await, Some(json!({"roll": 7})));
    }

    #[tokio::test]
    async fn entry_present_before_ttl_and_absent_after() {
        let store = CacheStore::new();
        store.set("k", json!(1), Duration::from_millis(300)).await;

        assert_eq!(store.get("k").await, Some(json!(1)));

        tokio::time::sleep(Duration::from_millis(450)).await;
        assert!(store.get("k").await.is_none());
    }

    #[tokio::test]
    async fn entries_expire_on_their_own_ttl() {
        let store = CacheStore::new();
        store.set("short", json!(1), Duration::from_millis(200)).await;
        store.set("long", json!(2), Duration::from_secs(60)).await;

        tokio::time::sleep(Duration::from_millis(350)).await;

        assert!(store.get("short").await.is_none());
        assert_eq!(store.get("long").await, Some(json!(2)));
    }

    #[tokio::test]
    async fn overwrite_resets_expiry() {
        let store = CacheStore::new();
        store.set("k", json!("old"), Duration::from_millis(500)).await;

        tokio::time::sleep(Duration::from_millis(350)).await;
        store.set("k", json!("new"), Duration::from_millis(500)).await;

        tokio::time::sleep(Duration::from_millis(350)).await;
        assert_eq!(store.get("k").await, Some(json!("new")));
    }

    #[tokio::test]
    async fn flush_all_empties_store() {
        let store = CacheStore::new();
        store.set("a", json!(1), Duration::from_secs(60)).await;
        store.set("b", json!(2), Duration::from_secs(60)).await;

        assert_eq!(store.flush_all().await, 2);
        assert!(store.is_empty().await);
        assert!(store.get("a").await.is_none());
    }

    #[tokio::test]
    async fn sweep_removes_only_expired_entries() {
        let store = CacheStore::new();
        store.set("short", json!(1), Duration::from_millis(100)).await;
        store.set("long", json!(2), Duration::from_secs(60)).await;

        tokio::time::sleep(Duration::from_millis(250)).await;
        store.sweep_expired().await;

        assert_eq!(store.entries.entry_count(), 1);
        assert_eq!(store.get("long").await, Some(json!(2)));
    }

    #[tokio::test(start_paused = true)]
    async fn sweeper_task_exits_when_store_is_dropped() {
        let store = Arc::new(CacheStore::new());
        let handle = spawn_sweeper(&store, Duration::from_secs(60));

        tokio::time::sleep(Duration::from_secs(61)).await;
        assert!(!handle.is_finished());

        drop(store);
        tokio::time::timeout(Duration::from_secs(120), handle)
            .await
            .expect("sweeper should stop")
            .expect("sweeper task");
    }

    #[tokio::test]
    async fn concurrent_writers_leave_one_intact_value() {
        let store = Arc::new(CacheStore::new());
        let mut tasks = Vec::new();
        for i in 0..16 {
            let store = Arc::clone(&store);
            tasks.push(tokio::spawn(async move {
                store.set("shared", json!({ "writer": i }), Duration::from_secs(60)).await;
            }));
        }
        for task in tasks {
            task.await.expect("task");
        }

        let value = store.get("shared").await.expect("value present");
        let writer = value["writer"].as_u64().expect("writer field");
        assert!(writer < 16);
        assert_eq!(store.len().await, 1);
    }
}
