use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::Utc;

/// 24h: the upstream directory changes at most daily.
pub const DIRECTORY_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// 1h: gateway bearer tokens are issued with a longer validity than this.
pub const TOKEN_TTL: Duration = Duration::from_secs(60 * 60);

struct Entry<T> {
    value: T,
    expire_at_ms: i64,
}

/// Tiny keyed TTL memo for slow-changing upstream resources.
///
/// Holds at most two keys in practice (the fund directory snapshot and the
/// gateway bearer token), so there is no capacity bound or eviction policy
/// beyond expiry. Not a general-purpose cache. Concurrent misses both
/// re-fetch upstream; at this request volume that is fine.
///
/// The clock is injectable so tests can sit exactly on the expiry boundary.
#[derive(Clone)]
pub struct TtlCache<T: Clone> {
    entries: Arc<Mutex<HashMap<String, Entry<T>>>>,
    now_ms: Arc<dyn Fn() -> i64 + Send + Sync>,
}

impl<T: Clone> TtlCache<T> {
    pub fn new() -> Self {
        Self::with_clock(Arc::new(|| Utc::now().timestamp_millis()))
    }

    pub fn with_clock(now_ms: Arc<dyn Fn() -> i64 + Send + Sync>) -> Self {
        Self {
            entries: Arc::new(Mutex::new(HashMap::new())),
            now_ms,
        }
    }

    /// A miss is "no entry" or "now past expiry"; expired entries are evicted
    /// on the way out so they never serve stale data.
    pub fn get(&self, key: &str) -> Option<T> {
        let now = (self.now_ms)();
        let mut entries = self.entries.lock().expect("cache lock poisoned");

        match entries.get(key) {
            Some(entry) if now <= entry.expire_at_ms => Some(entry.value.clone()),
            Some(_) => {
                entries.remove(key);
                None
            }
            None => None,
        }
    }

    /// Always overwrites.
    pub fn set(&self, key: &str, value: T, ttl: Duration) {
        let expire_at_ms = (self.now_ms)() + ttl.as_millis() as i64;
        let mut entries = self.entries.lock().expect("cache lock poisoned");
        entries.insert(key.to_string(), Entry { value, expire_at_ms });
    }
}

impl<T: Clone> Default for TtlCache<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicI64, Ordering};

    fn manual_clock(start: i64) -> (Arc<AtomicI64>, Arc<dyn Fn() -> i64 + Send + Sync>) {
        let t = Arc::new(AtomicI64::new(start));
        let t2 = t.clone();
        (t, Arc::new(move || t2.load(Ordering::SeqCst)))
    }

    #[test]
    fn hit_just_before_expiry_miss_just_after() {
        let (clock, now) = manual_clock(1_000);
        let cache: TtlCache<String> = TtlCache::with_clock(now);

        cache.set("k", "v".to_string(), Duration::from_millis(500));

        // expire_at = 1500
        clock.store(1_499, Ordering::SeqCst);
        assert_eq!(cache.get("k").as_deref(), Some("v"));

        clock.store(1_501, Ordering::SeqCst);
        assert_eq!(cache.get("k"), None);

        // expired entry was evicted, not just hidden
        clock.store(1_000, Ordering::SeqCst);
        assert_eq!(cache.get("k"), None);
    }

    #[test]
    fn read_at_exact_expiry_is_a_hit() {
        let (clock, now) = manual_clock(0);
        let cache: TtlCache<u32> = TtlCache::with_clock(now);

        cache.set("k", 7, Duration::from_millis(100));
        clock.store(100, Ordering::SeqCst);
        assert_eq!(cache.get("k"), Some(7));
    }

    #[test]
    fn set_overwrites_value_and_ttl() {
        let (clock, now) = manual_clock(0);
        let cache: TtlCache<u32> = TtlCache::with_clock(now);

        cache.set("k", 1, Duration::from_millis(10));
        cache.set("k", 2, Duration::from_millis(1_000));

        clock.store(500, Ordering::SeqCst);
        assert_eq!(cache.get("k"), Some(2));
    }

    #[test]
    fn missing_key_is_a_miss() {
        let cache: TtlCache<u32> = TtlCache::new();
        assert_eq!(cache.get("nope"), None);
    }
}
