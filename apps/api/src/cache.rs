//! In-memory response caches for AI-derived results.
//!
//! Two kinds of instances exist process-wide: the extraction caches (résumé
//! text -> profile / role) and the analysis cache (skills + job description
//! -> relevance). All share the same semantics; only the analysis cache is
//! purged opportunistically, so the extraction caches grow without bound over
//! the life of the process. That is an accepted limitation: entries are small
//! and the retention check in `get` keeps stale values from ever being served.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use tokio::time::Instant;

/// How long a cached AI result stays valid.
pub const RETENTION_WINDOW: Duration = Duration::from_secs(24 * 60 * 60);

struct CacheEntry<T> {
    value: T,
    stored_at: Instant,
}

/// A process-wide memoization map with time-based eviction.
///
/// Constructed once at startup and shared via `Arc`. Uses `tokio::time::Instant`
/// so tests can drive expiry with a paused clock. Concurrent writers to the
/// same key race last-write-wins, which is fine for idempotent AI results.
pub struct ResponseCache<T> {
    entries: Mutex<HashMap<String, CacheEntry<T>>>,
    retention: Duration,
}

impl<T: Clone> ResponseCache<T> {
    pub fn new(retention: Duration) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            retention,
        }
    }

    /// Returns the cached value unless it has aged past the retention window.
    pub fn get(&self, key: &str) -> Option<T> {
        let entries = self.entries.lock().expect("cache mutex poisoned");
        entries
            .get(key)
            .filter(|e| e.stored_at.elapsed() < self.retention)
            .map(|e| e.value.clone())
    }

    pub fn put(&self, key: impl Into<String>, value: T) {
        let mut entries = self.entries.lock().expect("cache mutex poisoned");
        entries.insert(
            key.into(),
            CacheEntry {
                value,
                stored_at: Instant::now(),
            },
        );
    }

    /// Sweeps entries older than the retention window. Triggered by use, not
    /// by a timer.
    pub fn purge_expired(&self) {
        let mut entries = self.entries.lock().expect("cache mutex poisoned");
        entries.retain(|_, e| e.stored_at.elapsed() < self.retention);
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.entries.lock().expect("cache mutex poisoned").len()
    }
}

impl<T: Clone> Default for ResponseCache<T> {
    fn default() -> Self {
        Self::new(RETENTION_WINDOW)
    }
}

/// Stable 32-bit rolling hash of a text, hex-encoded.
///
/// `h = h * 31 + c` over the chars, with wrapping arithmetic, so the same
/// input always yields the same key across runs and platforms. Not
/// cryptographic; collisions only cost a wrong cache hit on heuristic data.
pub fn stable_hash(text: &str) -> String {
    let mut hash: i32 = 0;
    for c in text.chars() {
        hash = hash.wrapping_shl(5).wrapping_sub(hash).wrapping_add(c as i32);
    }
    format!("{hash:x}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stable_hash_is_deterministic() {
        assert_eq!(stable_hash("python,aws"), stable_hash("python,aws"));
    }

    #[test]
    fn test_stable_hash_differs_on_different_input() {
        assert_ne!(stable_hash("python"), stable_hash("java"));
    }

    #[test]
    fn test_stable_hash_empty_input() {
        assert_eq!(stable_hash(""), "0");
    }

    #[tokio::test]
    async fn test_put_then_get_round_trips() {
        let cache: ResponseCache<String> = ResponseCache::default();
        cache.put("k", "v".to_string());
        assert_eq!(cache.get("k"), Some("v".to_string()));
    }

    #[tokio::test]
    async fn test_get_missing_key_is_none() {
        let cache: ResponseCache<u32> = ResponseCache::default();
        assert_eq!(cache.get("absent"), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_expired_entry_is_not_returned() {
        let cache: ResponseCache<u32> = ResponseCache::default();
        cache.put("k", 7);

        tokio::time::advance(RETENTION_WINDOW + Duration::from_secs(1)).await;

        assert_eq!(cache.get("k"), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_entry_within_window_survives() {
        let cache: ResponseCache<u32> = ResponseCache::default();
        cache.put("k", 7);

        tokio::time::advance(Duration::from_secs(23 * 60 * 60)).await;

        assert_eq!(cache.get("k"), Some(7));
    }

    #[tokio::test(start_paused = true)]
    async fn test_purge_expired_removes_only_stale_entries() {
        let cache: ResponseCache<u32> = ResponseCache::default();
        cache.put("old", 1);

        tokio::time::advance(RETENTION_WINDOW + Duration::from_secs(1)).await;
        cache.put("fresh", 2);
        cache.purge_expired();

        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get("fresh"), Some(2));
    }

    #[tokio::test]
    async fn test_put_overwrites_existing_key() {
        let cache: ResponseCache<u32> = ResponseCache::default();
        cache.put("k", 1);
        cache.put("k", 2);
        assert_eq!(cache.get("k"), Some(2));
        assert_eq!(cache.len(), 1);
    }
}
