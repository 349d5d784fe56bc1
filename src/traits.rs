//! # Cache Trait Hierarchy
//!
//! Operations are split the same way eviction policies differ in what they
//! can support: every cache can add and look up; only caches that tolerate
//! arbitrary removal expose `delete`; frequency-ordered caches add the LFU
//! introspection methods on top.
//!
//! ```text
//!                ┌─────────────────────────────────────────┐
//!                │            CoreCache<K, V>              │
//!                │                                         │
//!                │  add(&mut, K, V) → Option<V>            │
//!                │  get(&mut, &K) → Result<&V, CacheError> │
//!                │  contains(&, &K) → bool                 │
//!                │  len / is_empty / capacity / clear      │
//!                └──────────────────┬──────────────────────┘
//!                                   │
//!                                   ▼
//!                ┌─────────────────────────────────────────┐
//!                │          MutableCache<K, V>             │
//!                │                                         │
//!                │  delete(&mut, &K) → Result<V, _>        │
//!                │  delete_batch(&mut, &[K])               │
//!                └──────────────────┬──────────────────────┘
//!                                   │
//!                                   ▼
//!                ┌─────────────────────────────────────────┐
//!                │          LfuCacheTrait<K, V>            │
//!                │                                         │
//!                │  pop_lfu() → Option<(K, V)>             │
//!                │  peek_lfu() → Option<(&K, &V)>          │
//!                │  frequency(&K) → Option<u64>            │
//!                └─────────────────────────────────────────┘
//! ```
//!
//! ## Example Usage
//!
//! ```
//! use freqcache::policy::lfu::LfuCache;
//! use freqcache::traits::{CoreCache, LfuCacheTrait, MutableCache};
//!
//! // Works with any cache that can evict by frequency.
//! fn drain_coldest<C: LfuCacheTrait<u64, String>>(cache: &mut C, n: usize) -> Vec<u64> {
//!     (0..n).filter_map(|_| cache.pop_lfu().map(|(k, _)| k)).collect()
//! }
//!
//! let mut cache = LfuCache::new(8);
//! for k in 0..4u64 {
//!     cache.add(k, format!("v{k}"));
//! }
//! cache.get(&0).unwrap();
//! cache.get(&1).unwrap();
//!
//! assert_eq!(drain_coldest(&mut cache, 2), vec![2, 3]);
//! assert_eq!(cache.delete(&0).as_deref(), Ok("v0"));
//! ```
//!
//! ## Thread Safety
//!
//! The traits take `&mut self` for every mutating call; implementations are
//! not internally synchronized. See
//! [`ConcurrentLfuCache`](crate::policy::lfu::ConcurrentLfuCache) (feature
//! `concurrency`) for a shared handle.

use crate::error::CacheError;

/// Operations every cache supports.
pub trait CoreCache<K, V> {
    /// Adds or updates `key`.
    ///
    /// Updating an existing key replaces its value and returns the previous
    /// one; it never evicts. Adding a new key to a full cache evicts first and
    /// returns `None`.
    fn add(&mut self, key: K, value: V) -> Option<V>;

    /// Returns the value for `key`, counting the lookup as a use.
    ///
    /// Fails with [`CacheError::NotFound`] without touching the cache when the
    /// key is absent.
    fn get(&mut self, key: &K) -> Result<&V, CacheError>;

    /// Membership test that does not count as a use.
    fn contains(&self, key: &K) -> bool;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn capacity(&self) -> usize;

    fn clear(&mut self);
}

/// Caches that support removal of arbitrary keys.
pub trait MutableCache<K, V>: CoreCache<K, V> {
    /// Removes `key` and returns its value.
    ///
    /// Fails with [`CacheError::NotFound`] without touching the cache when the
    /// key is absent.
    fn delete(&mut self, key: &K) -> Result<V, CacheError>;

    /// Deletes each key in order, reporting every outcome.
    fn delete_batch(&mut self, keys: &[K]) -> Vec<Result<V, CacheError>> {
        keys.iter().map(|key| self.delete(key)).collect()
    }
}

/// Frequency-ordered caches.
pub trait LfuCacheTrait<K, V>: MutableCache<K, V> {
    /// Removes and returns the current eviction candidate.
    fn pop_lfu(&mut self) -> Option<(K, V)>;

    /// Current eviction candidate, without counting as a use.
    fn peek_lfu(&self) -> Option<(&K, &V)>;

    /// Access count of `key`, starting at 1 on insertion.
    fn frequency(&self, key: &K) -> Option<u64>;
}

/// Marker for cache handles that may be shared across threads.
pub trait ConcurrentCache: Send + Sync {}
