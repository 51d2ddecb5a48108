use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};

use tracing::debug;

struct Entry<V> {
    value: Arc<V>,
    expires_at: Instant,
}

/// In-memory TTL cache keyed by name.
///
/// Constructed once at startup and injected into whoever needs it; there is
/// no global instance. Values are handed out as `Arc<V>` and must not be
/// mutated after insertion. An expired entry and a missing entry are
/// indistinguishable to callers; expired entries are reclaimed lazily on
/// `get` misses and in bulk by the sweeper task.
pub struct TtlCache<V> {
    entries: RwLock<HashMap<String, Entry<V>>>,
    ttl: Duration,
}

impl<V> TtlCache<V> {
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    pub fn get(&self, name: &str) -> Option<Arc<V>> {
        let entries = self.entries.read().ok()?;
        let entry = entries.get(name)?;
        if entry.expires_at <= Instant::now() {
            return None;
        }
        Some(Arc::clone(&entry.value))
    }

    /// Inserts or refreshes an entry. The TTL clock restarts on every write.
    pub fn set(&self, name: &str, value: Arc<V>) {
        if let Ok(mut entries) = self.entries.write() {
            entries.insert(
                name.to_string(),
                Entry {
                    value,
                    expires_at: Instant::now() + self.ttl,
                },
            );
        }
    }

    /// Drops every expired entry, returning how many were reclaimed.
    pub fn purge_expired(&self) -> usize {
        let Ok(mut entries) = self.entries.write() else {
            return 0;
        };
        let before = entries.len();
        let now = Instant::now();
        entries.retain(|_, entry| entry.expires_at > now);
        before - entries.len()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().map_or(0, |entries| entries.len())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<V: Send + Sync + 'static> TtlCache<V> {
    /// Spawns the background sweep loop. Expiry is therefore at most
    /// TTL + sweep-interval stale, not wall-clock exact.
    pub fn spawn_sweeper(self: Arc<Self>, every: Duration) -> tokio::task::JoinHandle<()> {
        let cache = self;
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(every);
            interval.tick().await;
            loop {
                interval.tick().await;
                let purged = cache.purge_expired();
                if purged > 0 {
                    debug!("Cache sweep reclaimed {} expired entries", purged);
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_then_get_returns_value() {
        let cache = TtlCache::new(Duration::from_secs(60));
        cache.set("pikachu", Arc::new(25));

        assert_eq!(cache.get("pikachu").as_deref(), Some(&25));
        assert!(cache.get("bulbasaur").is_none());
    }

    #[test]
    fn expired_entry_reads_as_absent() {
        let cache = TtlCache::new(Duration::from_millis(5));
        cache.set("pikachu", Arc::new(25));

        std::thread::sleep(Duration::from_millis(10));
        assert!(cache.get("pikachu").is_none());
    }

    #[test]
    fn set_refreshes_expiry() {
        let cache = TtlCache::new(Duration::from_millis(100));
        cache.set("pikachu", Arc::new(1));

        std::thread::sleep(Duration::from_millis(60));
        cache.set("pikachu", Arc::new(2));
        std::thread::sleep(Duration::from_millis(60));

        assert_eq!(cache.get("pikachu").as_deref(), Some(&2));
    }

    #[test]
    fn purge_expired_reclaims_only_stale_entries() {
        let cache = TtlCache::new(Duration::from_millis(5));
        cache.set("expired", Arc::new(1));
        std::thread::sleep(Duration::from_millis(10));
        cache.set("fresh", Arc::new(2));

        assert_eq!(cache.purge_expired(), 1);
        assert_eq!(cache.len(), 1);
        assert!(cache.get("fresh").is_some());
    }

    #[test]
    fn zero_ttl_expires_immediately() {
        let cache = TtlCache::new(Duration::ZERO);
        cache.set("pikachu", Arc::new(25));
        assert!(cache.get("pikachu").is_none());
    }
}
