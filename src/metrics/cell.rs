use std::cell::Cell;

/// A counter that can be bumped through `&self`.
///
/// Used for read-only cache methods (`peek_lfu`, `frequency`). The cell makes
/// the owning cache `!Sync`; shared access goes through
/// [`ConcurrentLfuCache`](crate::policy::lfu::ConcurrentLfuCache), whose mutex
/// only needs `Send`.
#[repr(transparent)]
#[derive(Debug, Default)]
pub struct MetricsCell(Cell<u64>);

impl MetricsCell {
    #[inline]
    pub fn new() -> Self {
        Self(Cell::new(0))
    }

    #[inline]
    pub fn get(&self) -> u64 {
        self.0.get()
    }

    #[inline]
    pub fn incr(&self) {
        self.0.set(self.0.get().saturating_add(1));
    }

    #[inline]
    pub fn reset(&self) {
        self.0.set(0);
    }
}
