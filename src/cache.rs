// src/cache.rs
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::hash::Hash;

struct CacheEntry<V> {
    value: V,
    expires_at: DateTime<Utc>,
}

/// Expiring key-value store with a soft capacity bound.
///
/// Each instance is owned by exactly one fetcher. Expired entries are removed
/// lazily by `is_cached`; inserts past capacity evict the entry closest to
/// expiry until the cache is back at capacity.
pub struct TtlCache<K, V> {
    entries: HashMap<K, CacheEntry<V>>,
    capacity: usize,
}

impl<K: Eq + Hash + Clone, V> TtlCache<K, V> {
    pub fn new(capacity: usize) -> Self {
        TtlCache {
            entries: HashMap::new(),
            capacity,
        }
    }

    /// True iff the key is present and unexpired. An expired entry is dropped
    /// as a side effect, so a `true` here guarantees `get` sees a live value.
    pub fn is_cached(&mut self, key: &K) -> bool {
        match self.entries.get(key) {
            Some(entry) if Utc::now() < entry.expires_at => true,
            Some(_) => {
                self.entries.remove(key);
                false
            }
            None => false,
        }
    }

    /// Insert or overwrite, stamping `expires_at = now + ttl`.
    pub fn put(&mut self, key: K, value: V, ttl: Duration) {
        self.entries.insert(
            key,
            CacheEntry {
                value,
                expires_at: Utc::now() + ttl,
            },
        );

        while self.entries.len() > self.capacity {
            let oldest = self
                .entries
                .iter()
                .min_by_key(|(_, entry)| entry.expires_at)
                .map(|(key, _)| key.clone());
            match oldest {
                Some(key) => {
                    self.entries.remove(&key);
                }
                None => break,
            }
        }
    }

    /// A plain lookup; a miss returns `None`. Expiry is not re-checked here,
    /// callers gate reads with `is_cached`.
    pub fn get(&self, key: &K) -> Option<&V> {
        self.entries.get(key).map(|entry| &entry.value)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expired_entry_is_not_cached() {
        let mut cache: TtlCache<String, u32> = TtlCache::new(10);
        cache.put("k".to_string(), 1, Duration::zero());
        assert!(!cache.is_cached(&"k".to_string()));
        // Lazy eviction removed it entirely
        assert!(cache.get(&"k".to_string()).is_none());
        assert!(cache.is_empty());
    }

    #[test]
    fn live_entry_round_trips() {
        let mut cache: TtlCache<String, u32> = TtlCache::new(10);
        cache.put("k".to_string(), 7, Duration::seconds(60));
        assert!(cache.is_cached(&"k".to_string()));
        assert_eq!(cache.get(&"k".to_string()), Some(&7));
    }

    #[test]
    fn miss_returns_none() {
        let cache: TtlCache<String, u32> = TtlCache::new(10);
        assert!(cache.get(&"missing".to_string()).is_none());
    }

    #[test]
    fn capacity_evicts_oldest_expiry_first() {
        let mut cache: TtlCache<String, u32> = TtlCache::new(2);
        cache.put("a".to_string(), 1, Duration::seconds(10));
        cache.put("b".to_string(), 2, Duration::seconds(60));
        cache.put("c".to_string(), 3, Duration::seconds(30));

        assert_eq!(cache.len(), 2);
        assert!(!cache.is_cached(&"a".to_string()));
        assert!(cache.is_cached(&"b".to_string()));
        assert!(cache.is_cached(&"c".to_string()));
    }

    #[test]
    fn overwrite_replaces_value_and_expiry() {
        let mut cache: TtlCache<String, u32> = TtlCache::new(10);
        cache.put("k".to_string(), 1, Duration::zero());
        cache.put("k".to_string(), 2, Duration::seconds(60));

        assert!(cache.is_cached(&"k".to_string()));
        assert_eq!(cache.get(&"k".to_string()), Some(&2));
        assert_eq!(cache.len(), 1);
    }
}
