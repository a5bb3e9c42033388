use std::{
    collections::HashMap,
    fmt::Display,
    future::Future,
    sync::RwLock,
    time::{Duration, Instant},
};

use color_eyre::eyre::Result;

const PRUNE_THRESHOLD: usize = 128;
const MAX_ENTRIES: usize = 1024;

struct CacheEntry<T> {
    value: T,
    expires_at: Instant,
}

impl<T: Clone> CacheEntry<T> {
    fn new(value: T, ttl: Duration) -> Self {
        Self {
            value,
            expires_at: Instant::now() + ttl,
        }
    }

    fn is_expired(&self) -> bool {
        Instant::now() >= self.expires_at
    }

    fn get(&self) -> Option<T> {
        if self.is_expired() {
            None
        } else {
            Some(self.value.clone())
        }
    }
}

/// Values keyed by [`cache_key`], each expiring `ttl` after insertion
pub struct TtlCache<T> {
    entries: RwLock<HashMap<String, CacheEntry<T>>>,
    ttl: Duration,
}

/// `function(arg1,arg2,...)`
pub fn cache_key(function: &str, args: &[&dyn Display]) -> String {
    let args = args
        .iter()
        .map(|arg| arg.to_string())
        .collect::<Vec<_>>()
        .join(",");
    format!("{function}({args})")
}

impl<T: Clone> TtlCache<T> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    pub fn get(&self, key: &str) -> Option<T> {
        self.entries
            .read()
            .ok()
            .and_then(|guard| guard.get(key).and_then(|entry| entry.get()))
    }

    pub fn insert(&self, key: String, value: T) {
        if let Ok(mut guard) = self.entries.write() {
            guard.insert(key, CacheEntry::new(value, self.ttl));
            if guard.len() > PRUNE_THRESHOLD {
                guard.retain(|_, entry| !entry.is_expired());
            }
            if guard.len() > MAX_ENTRIES {
                let oldest = guard
                    .iter()
                    .min_by_key(|(_, entry)| entry.expires_at)
                    .map(|(key, _)| key.clone());
                if let Some(oldest) = oldest {
                    guard.remove(&oldest);
                }
            }
        }
    }

    /// Return the cached value for `key`, or run `fetch` and cache its result.
    /// Errors are passed through and never cached.
    pub async fn get_or_try_fetch<F, Fut>(&self, key: String, fetch: F) -> Result<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        if let Some(value) = self.get(&key) {
            return Ok(value);
        }
        let value = fetch().await?;
        self.insert(key, value.clone());
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use color_eyre::eyre::eyre;

    use super::*;

    #[test]
    fn key_includes_function_and_arguments() {
        assert_eq!(
            cache_key("fetch_pois", &[&"restaurant", &52.52, &13.405, &3000]),
            "fetch_pois(restaurant,52.52,13.405,3000)"
        );
        assert_eq!(cache_key("exchange_rate", &[]), "exchange_rate()");
    }

    #[tokio::test]
    async fn second_call_is_served_from_cache() {
        let cache = TtlCache::new(Duration::from_secs(60));
        let calls = AtomicU32::new(0);
        for _ in 0..3 {
            let value = cache
                .get_or_try_fetch("k".to_string(), || async {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok(7)
                })
                .await
                .unwrap();
            assert_eq!(value, 7);
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn errors_are_not_cached() {
        let cache = TtlCache::<u32>::new(Duration::from_secs(60));
        let failed = cache
            .get_or_try_fetch("k".to_string(), || async { Err(eyre!("down")) })
            .await;
        assert!(failed.is_err());
        assert_eq!(cache.get("k"), None);
        let value = cache
            .get_or_try_fetch("k".to_string(), || async { Ok(1) })
            .await
            .unwrap();
        assert_eq!(value, 1);
    }

    #[test]
    fn full_cache_evicts_the_oldest_entry() {
        let cache = TtlCache::new(Duration::from_secs(60));
        for i in 0..=MAX_ENTRIES {
            cache.insert(i.to_string(), i);
        }
        assert_eq!(cache.entries.read().unwrap().len(), MAX_ENTRIES);
        assert_eq!(cache.get("0"), None);
        assert_eq!(cache.get(&MAX_ENTRIES.to_string()), Some(MAX_ENTRIES));
    }

    #[test]
    fn expired_entries_are_not_returned() {
        let cache = TtlCache::new(Duration::ZERO);
        cache.insert("k".to_string(), 1);
        assert_eq!(cache.get("k"), None);
    }
}
