// SPDX-FileCopyrightText: 2026 FinDeus Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Capacity-bounded cache with per-entry time-to-live.

use std::future::Future;
use std::hash::Hash;
use std::num::NonZeroUsize;
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};

use lru::LruCache;
use tracing::trace;

use crate::clock::{Clock, SystemClock};

struct Entry<V> {
    value: V,
    inserted_at: Instant,
}

/// A bounded LRU map whose entries expire `ttl` after insertion.
///
/// All operations take one short `std::sync::Mutex` lock and never hold it
/// across an `.await`. When full, expired entries at the cold end are dropped
/// first, then the least recently used entry is evicted.
pub struct TtlCache<K, V, C = SystemClock> {
    entries: Mutex<LruCache<K, Entry<V>>>,
    ttl: Duration,
    clock: C,
}

impl<K, V> TtlCache<K, V, SystemClock>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    /// Creates a cache backed by the system clock.
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        Self::with_clock(capacity, ttl, SystemClock)
    }
}

impl<K, V, C> TtlCache<K, V, C>
where
    K: Eq + Hash + Clone,
    V: Clone,
    C: Clock,
{
    /// Creates a cache with an explicit time source. A zero capacity is raised to one.
    pub fn with_clock(capacity: usize, ttl: Duration, clock: C) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: Mutex::new(LruCache::new(capacity)),
            ttl,
            clock,
        }
    }

    pub fn capacity(&self) -> usize {
        self.lock().cap().get()
    }

    /// Returns a clone of the live value for `key`, removing it if expired.
    ///
    /// A hit marks the entry as most recently used.
    pub fn get(&self, key: &K) -> Option<V> {
        let now = self.clock.now();
        let mut entries = self.lock();
        match entries.get(key) {
            Some(entry) if self.is_live(entry, now) => return Some(entry.value.clone()),
            Some(_) => {}
            None => return None,
        }
        entries.pop(key);
        None
    }

    /// Inserts or replaces `key`, evicting to stay within capacity.
    pub fn insert(&self, key: K, value: V) {
        let now = self.clock.now();
        let mut entries = self.lock();
        let capacity = entries.cap().get();

        if !entries.contains(&key) {
            while entries.len() >= capacity
                && entries
                    .peek_lru()
                    .is_some_and(|(_, e)| !self.is_live(e, now))
            {
                entries.pop_lru();
            }
            if entries.len() >= capacity {
                trace!("evicting least recently used cache entry");
            }
        }

        entries.put(
            key,
            Entry {
                value,
                inserted_at: now,
            },
        );
    }

    /// Returns the cached value for `key` or computes, stores, and returns it.
    ///
    /// `compute` runs only on a miss and its errors are returned uncached.
    /// The lock is released while `compute` runs, so concurrent misses for
    /// the same key may each call it.
    pub async fn get_or_insert_with<F, Fut, E>(&self, key: K, compute: F) -> Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        if let Some(value) = self.get(&key) {
            return Ok(value);
        }
        let value = compute().await?;
        self.insert(key, value.clone());
        Ok(value)
    }

    /// Drops every expired entry and returns how many were removed.
    pub fn purge_expired(&self) -> usize {
        let now = self.clock.now();
        let mut entries = self.lock();
        let expired: Vec<K> = entries
            .iter()
            .filter(|(_, e)| !self.is_live(e, now))
            .map(|(k, _)| k.clone())
            .collect();
        for key in &expired {
            entries.pop(key);
        }
        expired.len()
    }

    /// Number of stored entries, including expired ones not yet purged.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn is_live(&self, entry: &Entry<V>, now: Instant) -> bool {
        now.saturating_duration_since(entry.inserted_at) < self.ttl
    }

    // A panic while holding the lock cannot leave the map half-updated.
    fn lock(&self) -> MutexGuard<'_, LruCache<K, Entry<V>>> {
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use proptest::prelude::*;

    use super::*;
    use crate::clock::ManualClock;

    const TTL: Duration = Duration::from_secs(60);

    fn cache(capacity: usize) -> (TtlCache<String, u32, ManualClock>, ManualClock) {
        let clock = ManualClock::new();
        (TtlCache::with_clock(capacity, TTL, clock.clone()), clock)
    }

    #[test]
    fn get_returns_value_within_ttl() {
        let (cache, clock) = cache(4);
        cache.insert("aapl".into(), 1);
        clock.advance(TTL - Duration::from_millis(1));
        assert_eq!(cache.get(&"aapl".into()), Some(1));
    }

    #[test]
    fn get_removes_expired_entry() {
        let (cache, clock) = cache(4);
        cache.insert("aapl".into(), 1);
        clock.advance(TTL);
        assert_eq!(cache.get(&"aapl".into()), None);
        assert_eq!(cache.len(), 0);
    }

    #[test]
    fn insert_evicts_oldest_when_full() {
        let (cache, clock) = cache(2);
        cache.insert("a".into(), 1);
        clock.advance(Duration::from_secs(1));
        cache.insert("b".into(), 2);
        clock.advance(Duration::from_secs(1));
        cache.insert("c".into(), 3);

        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get(&"a".into()), None);
        assert_eq!(cache.get(&"b".into()), Some(2));
        assert_eq!(cache.get(&"c".into()), Some(3));
    }

    #[test]
    fn read_entry_survives_eviction() {
        let (cache, clock) = cache(2);
        cache.insert("a".into(), 1);
        clock.advance(Duration::from_secs(1));
        cache.insert("b".into(), 2);
        assert_eq!(cache.get(&"a".into()), Some(1));
        cache.insert("c".into(), 3);

        assert_eq!(cache.get(&"a".into()), Some(1));
        assert_eq!(cache.get(&"b".into()), None);
        assert_eq!(cache.get(&"c".into()), Some(3));
    }

    #[test]
    fn insert_prefers_dropping_expired_over_live() {
        let (cache, clock) = cache(2);
        cache.insert("stale".into(), 1);
        clock.advance(Duration::from_secs(30));
        cache.insert("fresh".into(), 2);
        clock.advance(Duration::from_secs(31));
        cache.insert("new".into(), 3);

        assert_eq!(cache.get(&"fresh".into()), Some(2));
        assert_eq!(cache.get(&"new".into()), Some(3));
    }

    #[test]
    fn replacing_existing_key_does_not_evict() {
        let (cache, _clock) = cache(2);
        cache.insert("a".into(), 1);
        cache.insert("b".into(), 2);
        cache.insert("a".into(), 10);
        assert_eq!(cache.get(&"a".into()), Some(10));
        assert_eq!(cache.get(&"b".into()), Some(2));
    }

    #[test]
    fn purge_expired_reports_removed_count() {
        let (cache, clock) = cache(8);
        cache.insert("a".into(), 1);
        cache.insert("b".into(), 2);
        clock.advance(Duration::from_secs(45));
        cache.insert("c".into(), 3);
        clock.advance(Duration::from_secs(20));

        assert_eq!(cache.purge_expired(), 2);
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.purge_expired(), 0);
    }

    #[test]
    fn zero_capacity_still_holds_one_entry() {
        let (cache, _clock) = cache(0);
        assert_eq!(cache.capacity(), 1);
        cache.insert("a".into(), 1);
        assert_eq!(cache.get(&"a".into()), Some(1));
    }

    #[tokio::test]
    async fn one_upstream_call_within_ttl_then_one_recompute() {
        let (cache, clock) = cache(4);
        let calls = AtomicUsize::new(0);
        let counter = &calls;
        let fetch = move || async move {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok::<_, ()>(42)
        };

        assert_eq!(cache.get_or_insert_with("k".into(), fetch).await, Ok(42));
        clock.advance(Duration::from_secs(10));
        assert_eq!(cache.get_or_insert_with("k".into(), fetch).await, Ok(42));
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        clock.advance(TTL);
        assert_eq!(cache.get_or_insert_with("k".into(), fetch).await, Ok(42));
        assert_eq!(cache.get_or_insert_with("k".into(), fetch).await, Ok(42));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn errors_are_not_cached() {
        let (cache, _clock) = cache(4);
        let calls = AtomicUsize::new(0);
        let counter = &calls;

        let failing = cache
            .get_or_insert_with("k".into(), move || async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Err::<u32, _>("upstream down")
            })
            .await;
        assert_eq!(failing, Err("upstream down"));

        let ok = cache
            .get_or_insert_with("k".into(), move || async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok::<_, &str>(7)
            })
            .await;
        assert_eq!(ok, Ok(7));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    proptest! {
        #[test]
        fn never_exceeds_capacity(
            capacity in 1usize..16,
            ops in proptest::collection::vec((0u8..32, 0u64..90), 0..200),
        ) {
            let (cache, clock) = cache(capacity);
            for (key, step) in ops {
                clock.advance(Duration::from_secs(step));
                cache.insert(key.to_string(), u32::from(key));
                prop_assert!(cache.len() <= capacity);
            }
        }
    }
}
