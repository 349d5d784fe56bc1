//! Operation counters for [`LfuCache`](crate::policy::lfu::LfuCache).
//!
//! Compiled only with the `metrics` feature. Recording, snapshotting and
//! exporting are split into separate traits (see [`traits`]) so the cache
//! only ever writes counters.

pub mod cell;
pub mod exporter;
pub mod metrics_impl;
pub mod snapshot;
pub mod traits;
