//! # Metrics Trait Hierarchy
//!
//! Recording, snapshotting and export are separate responsibilities so that
//! cache logic never depends on how counters are consumed.
//!
//! ```text
//!            ┌─────────────────────────────┐
//!            │     CoreMetricsRecorder     │
//!            │  get_hit/get_miss/add/evict │
//!            └──────────────┬──────────────┘
//!                           │
//!                           ▼
//!            ┌─────────────────────────────┐    ┌──────────────────────────┐
//!            │     LfuMetricsRecorder      │    │  LfuMetricsReadRecorder  │
//!            │  delete/pop_lfu (&mut self) │    │  peek_lfu/frequency      │
//!            └─────────────────────────────┘    │  (&self, interior mut.)  │
//!                                               └──────────────────────────┘
//!
//!   Consumption (decoupled from recording):
//!   ┌──────────────────────────────┐    ┌──────────────────────────────┐
//!   │ MetricsSnapshotProvider<S>   │    │ MetricsExporter<S>           │
//!   │ (bench/test)                 │    │ (production monitoring)      │
//!   └──────────────────────────────┘    └──────────────────────────────┘
//! ```

/// Counters shared by every cache operation path.
pub trait CoreMetricsRecorder {
    fn record_get_hit(&mut self);
    fn record_get_miss(&mut self);
    fn record_add_call(&mut self);
    fn record_add_new(&mut self);
    fn record_add_update(&mut self);
    fn record_evict_call(&mut self);
    fn record_evicted_entry(&mut self);
    fn record_clear(&mut self);
}

/// LFU-specific counters for `&mut self` operations.
pub trait LfuMetricsRecorder: CoreMetricsRecorder {
    fn record_delete_call(&mut self);
    fn record_delete_found(&mut self);
    fn record_pop_lfu_call(&mut self);
    fn record_pop_lfu_found(&mut self);
}

/// LFU counters for `&self` methods (uses interior mutability).
pub trait LfuMetricsReadRecorder {
    fn record_peek_lfu_call(&self);
    fn record_peek_lfu_found(&self);
    fn record_frequency_call(&self);
    fn record_frequency_found(&self);
}

/// Produce a point-in-time copy of the counters.
pub trait MetricsSnapshotProvider<S> {
    fn snapshot(&self) -> S;
}

/// Reset metrics between tests or benchmark iterations.
pub trait MetricsReset {
    fn reset_metrics(&mut self);
}

/// Publish a snapshot to a monitoring backend.
pub trait MetricsExporter<S> {
    fn export(&self, snapshot: &S);
}
