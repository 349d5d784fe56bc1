//! # LFU Cache with LRU Tie-Breaking
//!
//! Bounded key/value cache that evicts the Least-Frequently-Used entry when
//! full. Among entries with equal frequency the one accessed longest ago goes
//! first.
//!
//! ## Architecture
//!
//! ```text
//!   ┌──────────────────────────────────────────────────────────────────────────┐
//!   │                           LfuCache<K, V>                                 │
//!   │                                                                          │
//!   │   index: FxHashMap<K, SlotId>        entries: SlotArena<Entry<K, V>>     │
//!   │   ┌─────────┬────────┐               ┌──────┬──────────────────────────┐ │
//!   │   │  "a"    │  s#0 ──┼──────────────►│ s#0  │ a, v, freq=3, t=7, pos=2 │ │
//!   │   │  "b"    │  s#1 ──┼──────────────►│ s#1  │ b, v, freq=1, t=2, pos=0 │ │
//!   │   │  "c"    │  s#2 ──┼──────────────►│ s#2  │ c, v, freq=2, t=5, pos=1 │ │
//!   │   └─────────┴────────┘               └──────┴──────────────────────────┘ │
//!   │                                                 ▲      pos back-refs     │
//!   │   heap: IndexedMinHeap                          │                        │
//!   │   ┌──────┬──────┬──────┐                        │                        │
//!   │   │ s#1  │ s#2  │ s#0  │ ───────────────────────┘                        │
//!   │   └──────┴──────┴──────┘                                                 │
//!   │      ▲ root = eviction candidate, ordered by (freq, last_access)         │
//!   │                                                                          │
//!   │   capacity: usize            clock: u64 (logical access time)            │
//!   └──────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The arena exclusively owns entries. The index and the heap hold only
//! [`SlotId`] handles, and each entry records its own heap position so a key
//! lookup can repair or remove its heap slot in O(log n).
//!
//! ## Eviction Order
//!
//! ```text
//!   capacity = 2
//!
//!   add(1, "a")      heap: [(1,t1) k1]
//!   add(2, "b")      heap: [(1,t1) k1, (1,t2) k2]
//!   get(1)           heap: [(1,t2) k2, (2,t3) k1]     ← k1 sifts down
//!   add(3, "c")      full → pop root k2 (freq 1) → evicted
//!                    heap: [(1,t4) k3, (2,t3) k1]
//! ```
//!
//! Access times come from a per-cache counter that advances on every use, so
//! no two entries ever share a timestamp and eviction is fully deterministic.
//!
//! ## Core Operations
//!
//! | Method           | Complexity | Description                              |
//! |------------------|------------|------------------------------------------|
//! | `try_new(cap)`   | O(1)       | Create cache, rejects zero capacity      |
//! | `add(k, v)`      | O(log n)   | Insert or update, may evict on insert    |
//! | `get(&k)`        | O(log n)   | Get value, increments frequency          |
//! | `delete(&k)`     | O(log n)   | Remove entry, return its value           |
//! | `contains(&k)`   | O(1)       | Membership, no frequency change          |
//! | `peek(&k)`       | O(1)       | Read value, no frequency change          |
//! | `pop_lfu()`      | O(log n)   | Remove the eviction candidate            |
//! | `peek_lfu()`     | O(1)       | Inspect the eviction candidate           |
//! | `frequency(&k)`  | O(1)       | Current access count                     |
//!
//! ## Observability
//!
//! Every capacity eviction emits a `tracing` event at `DEBUG` level carrying
//! the evicted key and its frequency. With the `metrics` feature, operation
//! counters are available through [`LfuCache::metrics_snapshot`].
//!
//! ## Example Usage
//!
//! ```
//! use freqcache::policy::lfu::LfuCache;
//! use freqcache::prelude::*;
//!
//! let mut cache = LfuCache::try_new(2)?;
//! cache.add(1, "a");
//! cache.add(2, "b");
//! cache.get(&1)?;            // freq(1) = 2
//! cache.add(3, "c");         // evicts 2
//!
//! assert_eq!(cache.get(&2), Err(CacheError::NotFound));
//! assert_eq!(cache.get(&1), Ok(&"a"));
//! assert_eq!(cache.get(&3), Ok(&"c"));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Thread Safety
//!
//! - `LfuCache` is **not** internally synchronized; every operation that can
//!   change eviction order takes `&mut self`.
//! - `ConcurrentLfuCache` (feature `concurrency`) guards the index, arena and
//!   heap with one `parking_lot::Mutex`, so each call is atomic as a whole.

use std::fmt;
use std::hash::Hash;
use std::mem;
#[cfg(feature = "concurrency")]
use std::sync::Arc;

#[cfg(feature = "concurrency")]
use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use tracing::debug;

use crate::ds::{HeapSlots, IndexedMinHeap, SlotArena, SlotId};
use crate::error::{CacheError, ConfigError, InvariantError};
#[cfg(feature = "metrics")]
use crate::metrics::metrics_impl::LfuMetrics;
#[cfg(feature = "metrics")]
use crate::metrics::snapshot::LfuMetricsSnapshot;
#[cfg(feature = "metrics")]
use crate::metrics::traits::{
    CoreMetricsRecorder, LfuMetricsReadRecorder, LfuMetricsRecorder, MetricsReset,
    MetricsSnapshotProvider,
};
#[cfg(feature = "concurrency")]
use crate::traits::ConcurrentCache;
use crate::traits::{CoreCache, LfuCacheTrait, MutableCache};

const ENTRY_MISSING: &str = "lfu entry missing for live slot";

#[derive(Debug)]
pub(crate) struct Entry<K, V> {
    key: K,
    value: V,
    frequency: u64,
    last_access: u64,
    heap_pos: usize,
}

impl<K, V> HeapSlots for SlotArena<Entry<K, V>> {
    type Priority = (u64, u64);

    #[inline]
    fn priority(&self, id: SlotId) -> (u64, u64) {
        let entry = self.get(id).expect(ENTRY_MISSING);
        (entry.frequency, entry.last_access)
    }

    #[inline]
    fn heap_pos(&self, id: SlotId) -> usize {
        self.get(id).expect(ENTRY_MISSING).heap_pos
    }

    #[inline]
    fn set_heap_pos(&mut self, id: SlotId, pos: usize) {
        self.get_mut(id).expect(ENTRY_MISSING).heap_pos = pos;
    }
}

/// LFU cache with least-recently-used tie-breaking.
///
/// See module-level documentation for details.
pub struct LfuCache<K, V> {
    index: FxHashMap<K, SlotId>,
    entries: SlotArena<Entry<K, V>>,
    heap: IndexedMinHeap,
    capacity: usize,
    clock: u64,
    #[cfg(feature = "metrics")]
    metrics: LfuMetrics,
}

impl<K, V> fmt::Debug for LfuCache<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LfuCache")
            .field("len", &self.entries.len())
            .field("capacity", &self.capacity)
            .finish_non_exhaustive()
    }
}

impl<K, V> LfuCache<K, V>
where
    K: Eq + Hash + Clone + fmt::Debug,
{
    /// Creates a cache holding at most `capacity` entries.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero. Use [`try_new`](Self::try_new) when the
    /// capacity comes from user input.
    ///
    /// # Example
    ///
    /// ```
    /// use freqcache::policy::lfu::LfuCache;
    /// use freqcache::traits::CoreCache;
    ///
    /// let cache: LfuCache<String, i32> = LfuCache::new(100);
    /// assert_eq!(cache.capacity(), 100);
    /// assert!(cache.is_empty());
    /// ```
    pub fn new(capacity: usize) -> Self {
        match Self::try_new(capacity) {
            Ok(cache) => cache,
            Err(err) => panic!("{err}"),
        }
    }

    /// Creates a cache holding at most `capacity` entries.
    ///
    /// Returns [`ConfigError`] if `capacity` is zero.
    pub fn try_new(capacity: usize) -> Result<Self, ConfigError> {
        Self::try_with_prealloc(capacity, true)
    }

    /// Like [`try_new`](Self::try_new); with `prealloc` set, storage for
    /// `capacity` entries is reserved up front.
    pub fn try_with_prealloc(capacity: usize, prealloc: bool) -> Result<Self, ConfigError> {
        if capacity == 0 {
            return Err(ConfigError::new("capacity must be greater than 0"));
        }
        let reserve = if prealloc { capacity } else { 0 };
        Ok(Self {
            index: FxHashMap::with_capacity_and_hasher(reserve, Default::default()),
            entries: SlotArena::with_capacity(reserve),
            heap: IndexedMinHeap::with_capacity(reserve),
            capacity,
            clock: 0,
            #[cfg(feature = "metrics")]
            metrics: LfuMetrics::default(),
        })
    }

    /// Reads the value for `key` without counting it as a use.
    pub fn peek(&self, key: &K) -> Option<&V> {
        let id = *self.index.get(key)?;
        self.entries.get(id).map(|entry| &entry.value)
    }

    /// Logical time of the last use of `key`.
    ///
    /// Values are only comparable within one cache; a larger value means a
    /// more recent use.
    pub fn last_access(&self, key: &K) -> Option<u64> {
        let id = *self.index.get(key)?;
        self.entries.get(id).map(|entry| entry.last_access)
    }

    /// Iterates live entries in arbitrary order without counting as uses.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.entries
            .iter()
            .map(|(_, entry)| (&entry.key, &entry.value))
    }

    /// Verifies that the index, arena and heap agree.
    ///
    /// An error here means an internal bug, never a caller mistake.
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        let len = self.index.len();
        if self.entries.len() != len || self.heap.len() != len {
            return Err(InvariantError::new(format!(
                "size mismatch: index={} entries={} heap={}",
                len,
                self.entries.len(),
                self.heap.len()
            )));
        }
        if len > self.capacity {
            return Err(InvariantError::new(format!(
                "len {} exceeds capacity {}",
                len, self.capacity
            )));
        }
        for (key, &id) in &self.index {
            let entry = self.entries.get(id).ok_or_else(|| {
                InvariantError::new(format!("index points {:?} at empty slot", key))
            })?;
            if &entry.key != key {
                return Err(InvariantError::new(format!(
                    "slot {} holds {:?} but is indexed as {:?}",
                    id.index(),
                    entry.key,
                    key
                )));
            }
            if self.heap.get(entry.heap_pos) != Some(id) {
                return Err(InvariantError::new(format!(
                    "{:?} records heap position {} which holds another slot",
                    key, entry.heap_pos
                )));
            }
        }
        self.heap.check_invariants(&self.entries)
    }

    fn tick(&mut self) -> u64 {
        self.clock += 1;
        self.clock
    }

    /// Bumps frequency and access time of a live slot and repairs its heap
    /// position.
    fn touch_slot(&mut self, id: SlotId) -> &mut Entry<K, V> {
        let now = self.tick();
        let pos = {
            let entry = self.entries.get_mut(id).expect(ENTRY_MISSING);
            entry.frequency = entry.frequency.saturating_add(1);
            entry.last_access = now;
            entry.heap_pos
        };
        self.heap.fix_at(pos, &mut self.entries);
        self.entries.get_mut(id).expect(ENTRY_MISSING)
    }

    fn take_min(&mut self) -> Option<Entry<K, V>> {
        let id = self.heap.pop_min(&mut self.entries)?;
        let entry = self.entries.remove(id).expect(ENTRY_MISSING);
        self.index.remove(&entry.key);
        Some(entry)
    }

    fn evict_for_insert(&mut self) {
        #[cfg(feature = "metrics")]
        self.metrics.record_evict_call();

        if let Some(entry) = self.take_min() {
            debug!(
                key = ?entry.key,
                frequency = entry.frequency,
                "evicting least-frequently-used entry"
            );

            #[cfg(feature = "metrics")]
            self.metrics.record_evicted_entry();
        }
    }
}

impl<K, V> CoreCache<K, V> for LfuCache<K, V>
where
    K: Eq + Hash + Clone + fmt::Debug,
{
    fn add(&mut self, key: K, value: V) -> Option<V> {
        #[cfg(feature = "metrics")]
        self.metrics.record_add_call();

        if let Some(&id) = self.index.get(&key) {
            #[cfg(feature = "metrics")]
            self.metrics.record_add_update();

            let entry = self.touch_slot(id);
            return Some(mem::replace(&mut entry.value, value));
        }

        #[cfg(feature = "metrics")]
        self.metrics.record_add_new();

        if self.index.len() >= self.capacity {
            self.evict_for_insert();
        }
        debug_assert!(self.index.len() < self.capacity);

        let now = self.tick();
        let id = self.entries.insert(Entry {
            key: key.clone(),
            value,
            frequency: 1,
            last_access: now,
            heap_pos: 0,
        });
        self.heap.push(id, &mut self.entries);
        self.index.insert(key, id);
        None
    }

    fn get(&mut self, key: &K) -> Result<&V, CacheError> {
        let Some(&id) = self.index.get(key) else {
            #[cfg(feature = "metrics")]
            self.metrics.record_get_miss();
            return Err(CacheError::NotFound);
        };

        #[cfg(feature = "metrics")]
        self.metrics.record_get_hit();

        Ok(&self.touch_slot(id).value)
    }

    fn contains(&self, key: &K) -> bool {
        self.index.contains_key(key)
    }

    fn len(&self) -> usize {
        self.index.len()
    }

    fn capacity(&self) -> usize {
        self.capacity
    }

    fn clear(&mut self) {
        #[cfg(feature = "metrics")]
        self.metrics.record_clear();

        self.index.clear();
        self.entries.clear();
        self.heap.clear();
    }
}

impl<K, V> MutableCache<K, V> for LfuCache<K, V>
where
    K: Eq + Hash + Clone + fmt::Debug,
{
    fn delete(&mut self, key: &K) -> Result<V, CacheError> {
        #[cfg(feature = "metrics")]
        self.metrics.record_delete_call();

        let id = self.index.remove(key).ok_or(CacheError::NotFound)?;
        let pos = self.entries.heap_pos(id);
        let removed = self.heap.remove_at(pos, &mut self.entries);
        debug_assert_eq!(removed, Some(id));
        let entry = self.entries.remove(id).expect(ENTRY_MISSING);

        #[cfg(feature = "metrics")]
        self.metrics.record_delete_found();

        Ok(entry.value)
    }
}

impl<K, V> LfuCacheTrait<K, V> for LfuCache<K, V>
where
    K: Eq + Hash + Clone + fmt::Debug,
{
    fn pop_lfu(&mut self) -> Option<(K, V)> {
        #[cfg(feature = "metrics")]
        self.metrics.record_pop_lfu_call();

        let entry = self.take_min()?;

        #[cfg(feature = "metrics")]
        self.metrics.record_pop_lfu_found();

        Some((entry.key, entry.value))
    }

    fn peek_lfu(&self) -> Option<(&K, &V)> {
        #[cfg(feature = "metrics")]
        self.metrics.record_peek_lfu_call();

        let entry = self.heap.peek_min().and_then(|id| self.entries.get(id))?;

        #[cfg(feature = "metrics")]
        self.metrics.record_peek_lfu_found();

        Some((&entry.key, &entry.value))
    }

    fn frequency(&self, key: &K) -> Option<u64> {
        #[cfg(feature = "metrics")]
        self.metrics.record_frequency_call();

        let result = self
            .index
            .get(key)
            .and_then(|&id| self.entries.get(id))
            .map(|entry| entry.frequency);

        #[cfg(feature = "metrics")]
        if result.is_some() {
            self.metrics.record_frequency_found();
        }

        result
    }
}

#[cfg(feature = "metrics")]
impl<K, V> LfuCache<K, V> {
    pub fn metrics_snapshot(&self) -> LfuMetricsSnapshot {
        LfuMetricsSnapshot {
            get_calls: self.metrics.get_calls,
            get_hits: self.metrics.get_hits,
            get_misses: self.metrics.get_misses,
            add_calls: self.metrics.add_calls,
            add_updates: self.metrics.add_updates,
            add_new: self.metrics.add_new,
            evict_calls: self.metrics.evict_calls,
            evicted_entries: self.metrics.evicted_entries,
            delete_calls: self.metrics.delete_calls,
            delete_found: self.metrics.delete_found,
            pop_lfu_calls: self.metrics.pop_lfu_calls,
            pop_lfu_found: self.metrics.pop_lfu_found,
            peek_lfu_calls: self.metrics.peek_lfu_calls.get(),
            peek_lfu_found: self.metrics.peek_lfu_found.get(),
            frequency_calls: self.metrics.frequency_calls.get(),
            frequency_found: self.metrics.frequency_found.get(),
            clear_calls: self.metrics.clear_calls,
            cache_len: self.index.len(),
            capacity: self.capacity,
        }
    }
}

#[cfg(feature = "metrics")]
impl<K, V> MetricsSnapshotProvider<LfuMetricsSnapshot> for LfuCache<K, V> {
    fn snapshot(&self) -> LfuMetricsSnapshot {
        self.metrics_snapshot()
    }
}

#[cfg(feature = "metrics")]
impl<K, V> MetricsReset for LfuCache<K, V> {
    fn reset_metrics(&mut self) {
        self.metrics.reset();
    }
}

// ==============================================
// CONCURRENT WRAPPER
// ==============================================

/// Thread-safe handle to an [`LfuCache`].
///
/// A single `parking_lot::Mutex` guards index, arena and heap together.
/// `get` reorders the heap, so reads need exclusive access as well and a
/// read-write lock would buy nothing. Cloning the handle shares the cache.
#[cfg(feature = "concurrency")]
pub struct ConcurrentLfuCache<K, V> {
    inner: Arc<Mutex<LfuCache<K, V>>>,
}

#[cfg(feature = "concurrency")]
impl<K, V> Clone for ConcurrentLfuCache<K, V> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

#[cfg(feature = "concurrency")]
impl<K, V> fmt::Debug for ConcurrentLfuCache<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cache = self.inner.lock();
        f.debug_struct("ConcurrentLfuCache")
            .field("len", &cache.entries.len())
            .field("capacity", &cache.capacity)
            .finish_non_exhaustive()
    }
}

#[cfg(feature = "concurrency")]
impl<K, V> ConcurrentLfuCache<K, V>
where
    K: Eq + Hash + Clone + fmt::Debug + Send,
    V: Send,
{
    /// Creates a shared cache holding at most `capacity` entries.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    ///
    /// # Example
    ///
    /// ```
    /// use freqcache::policy::lfu::ConcurrentLfuCache;
    ///
    /// let cache: ConcurrentLfuCache<u32, String> = ConcurrentLfuCache::new(100);
    /// assert_eq!(cache.capacity(), 100);
    /// assert!(cache.is_empty());
    /// ```
    pub fn new(capacity: usize) -> Self {
        Self::from_cache(LfuCache::new(capacity))
    }

    pub fn try_new(capacity: usize) -> Result<Self, ConfigError> {
        LfuCache::try_new(capacity).map(Self::from_cache)
    }

    pub fn from_cache(cache: LfuCache<K, V>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(cache)),
        }
    }

    pub fn add(&self, key: K, value: V) -> Option<V> {
        self.inner.lock().add(key, value)
    }

    /// Returns a clone of the value, counting the lookup as a use.
    pub fn get(&self, key: &K) -> Result<V, CacheError>
    where
        V: Clone,
    {
        self.inner.lock().get(key).cloned()
    }

    /// Runs `f` on the value under the lock, counting the lookup as a use.
    pub fn get_with<R>(&self, key: &K, f: impl FnOnce(&V) -> R) -> Result<R, CacheError> {
        self.inner.lock().get(key).map(f)
    }

    pub fn delete(&self, key: &K) -> Result<V, CacheError> {
        self.inner.lock().delete(key)
    }

    pub fn pop_lfu(&self) -> Option<(K, V)> {
        self.inner.lock().pop_lfu()
    }

    pub fn contains(&self, key: &K) -> bool {
        self.inner.lock().contains(key)
    }

    pub fn frequency(&self, key: &K) -> Option<u64> {
        self.inner.lock().frequency(key)
    }

    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.inner.lock().capacity()
    }

    pub fn clear(&self) {
        self.inner.lock().clear();
    }

    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        self.inner.lock().check_invariants()
    }

    #[cfg(feature = "metrics")]
    pub fn metrics_snapshot(&self) -> LfuMetricsSnapshot {
        self.inner.lock().metrics_snapshot()
    }
}

#[cfg(feature = "concurrency")]
impl<K: Send, V: Send> ConcurrentCache for ConcurrentLfuCache<K, V> {}
