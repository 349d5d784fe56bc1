//! freqcache: a bounded LFU cache with least-recently-used tie-breaking.
//!
//! Entries live in a slot arena; a key index and an indexed binary min-heap
//! refer to them by handle. See [`policy::lfu`] for the cache itself and
//! [`ds`] for the building blocks.

pub mod builder;
pub mod ds;
pub mod error;
#[cfg(feature = "metrics")]
pub mod metrics;
pub mod policy;
pub mod prelude;
pub mod traits;

pub use crate::ds::{HeapSlots, IndexedMinHeap, SlotArena, SlotId};
pub use crate::error::{CacheError, ConfigError, InvariantError};
#[cfg(feature = "metrics")]
pub use crate::metrics::snapshot::LfuMetricsSnapshot;
#[cfg(feature = "concurrency")]
pub use crate::policy::lfu::ConcurrentLfuCache;
pub use crate::policy::lfu::LfuCache;
