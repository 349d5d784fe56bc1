// ==============================================
// EVICTION EVENT TESTS (integration)
// ==============================================
//
// Capacity evictions are reported through `tracing`. These tests install a
// capturing layer for the duration of one closure so they do not interfere
// with each other.

use std::fmt::{self, Write as _};
use std::sync::{Arc, Mutex};

use freqcache::prelude::*;
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

#[derive(Debug, Clone)]
struct Captured {
    level: Level,
    target: String,
    fields: String,
}

#[derive(Clone, Default)]
struct CaptureLayer {
    events: Arc<Mutex<Vec<Captured>>>,
}

struct FieldWriter<'a>(&'a mut String);

impl Visit for FieldWriter<'_> {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        let _ = write!(self.0, "{}={:?} ", field.name(), value);
    }
}

impl<S: Subscriber> Layer<S> for CaptureLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut fields = String::new();
        event.record(&mut FieldWriter(&mut fields));
        self.events.lock().unwrap().push(Captured {
            level: *event.metadata().level(),
            target: event.metadata().target().to_string(),
            fields,
        });
    }
}

fn capture<F: FnOnce()>(f: F) -> Vec<Captured> {
    let layer = CaptureLayer::default();
    let events = Arc::clone(&layer.events);
    let subscriber = tracing_subscriber::registry().with(layer);
    tracing::subscriber::with_default(subscriber, f);
    let captured = events.lock().unwrap().clone();
    captured
}

#[test]
fn eviction_emits_key_and_frequency() {
    let events = capture(|| {
        let mut cache = LfuCache::new(2);
        cache.add(1u32, "a");
        cache.add(2u32, "b");
        cache.get(&1).unwrap();
        cache.add(3u32, "c");
    });

    assert_eq!(events.len(), 1, "{events:?}");
    let event = &events[0];
    assert_eq!(event.level, Level::DEBUG);
    assert!(event.target.starts_with("freqcache"));
    assert!(event.fields.contains("key=2"), "{}", event.fields);
    assert!(event.fields.contains("frequency=1"), "{}", event.fields);
}

#[test]
fn updates_deletes_and_misses_are_silent() {
    let events = capture(|| {
        let mut cache = LfuCache::new(1);
        cache.add("k", 1);
        cache.add("k", 2);
        let _ = cache.get(&"missing");
        let _ = cache.delete(&"missing");
        cache.delete(&"k").unwrap();
    });

    assert!(events.is_empty(), "{events:?}");
}

#[test]
fn each_eviction_is_reported_once() {
    let events = capture(|| {
        let mut cache = LfuCache::new(3);
        for k in 0..10u32 {
            cache.add(k, k);
        }
    });

    assert_eq!(events.len(), 7);
    for (event, evicted) in events.iter().zip(0u32..) {
        assert!(
            event.fields.contains(&format!("key={evicted} ")),
            "{}",
            event.fields
        );
    }
}
