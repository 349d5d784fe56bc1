pub use crate::builder::CacheBuilder;
pub use crate::error::{CacheError, ConfigError};
pub use crate::policy::lfu::LfuCache;
pub use crate::traits::{CoreCache, LfuCacheTrait, MutableCache};

#[cfg(feature = "concurrency")]
pub use crate::policy::lfu::ConcurrentLfuCache;
#[cfg(feature = "concurrency")]
pub use crate::traits::ConcurrentCache;
