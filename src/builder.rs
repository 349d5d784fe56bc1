//! Programmatic configuration for [`LfuCache`].
//!
//! The crate reads no files or environment variables; callers describe a
//! cache with [`CacheConfig`] or the [`CacheBuilder`] chain and get a
//! [`ConfigError`] back if the description is invalid.
//!
//! ## Example
//!
//! ```rust
//! use freqcache::builder::CacheBuilder;
//! use freqcache::traits::CoreCache;
//!
//! let mut cache = CacheBuilder::new(100).try_build::<u64, String>()?;
//! cache.add(1, "hello".to_string());
//! assert_eq!(cache.get(&1), Ok(&"hello".to_string()));
//!
//! assert!(CacheBuilder::new(0).try_build::<u64, String>().is_err());
//! # Ok::<(), freqcache::error::ConfigError>(())
//! ```

use std::fmt::Debug;
use std::hash::Hash;

use crate::error::ConfigError;
#[cfg(feature = "concurrency")]
use crate::policy::lfu::ConcurrentLfuCache;
use crate::policy::lfu::LfuCache;

/// Cache construction parameters.
///
/// | Field      | Type    | Default | Description                          |
/// |------------|---------|---------|--------------------------------------|
/// | `capacity` | `usize` | 1000    | Maximum entries, must be > 0         |
/// | `prealloc` | `bool`  | true    | Reserve storage for `capacity` items |
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheConfig {
    pub capacity: usize,
    pub prealloc: bool,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            capacity: 1000,
            prealloc: true,
        }
    }
}

impl CacheConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.capacity == 0 {
            return Err(ConfigError::new("capacity must be greater than 0"));
        }
        Ok(())
    }
}

/// Builder for creating cache instances.
#[derive(Debug, Clone, Copy)]
pub struct CacheBuilder {
    config: CacheConfig,
}

impl CacheBuilder {
    /// Create a new cache builder with the specified capacity.
    pub fn new(capacity: usize) -> Self {
        Self {
            config: CacheConfig {
                capacity,
                ..CacheConfig::default()
            },
        }
    }

    pub fn from_config(config: CacheConfig) -> Self {
        Self { config }
    }

    /// Whether to reserve index, arena and heap storage for the full capacity
    /// up front. Defaults to `true`.
    pub fn prealloc(mut self, prealloc: bool) -> Self {
        self.config.prealloc = prealloc;
        self
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Build the cache, validating the configuration.
    pub fn try_build<K, V>(self) -> Result<LfuCache<K, V>, ConfigError>
    where
        K: Eq + Hash + Clone + Debug,
    {
        self.config.validate()?;
        LfuCache::try_with_prealloc(self.config.capacity, self.config.prealloc)
    }

    /// Build a shareable, mutex-guarded cache.
    #[cfg(feature = "concurrency")]
    pub fn try_build_concurrent<K, V>(self) -> Result<ConcurrentLfuCache<K, V>, ConfigError>
    where
        K: Eq + Hash + Clone + Debug + Send,
        V: Send,
    {
        self.try_build().map(ConcurrentLfuCache::from_cache)
    }
}

impl Default for CacheBuilder {
    fn default() -> Self {
        Self::from_config(CacheConfig::default())
    }
}
