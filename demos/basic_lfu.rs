use freqcache::policy::lfu::LfuCache;
use freqcache::traits::{CoreCache, LfuCacheTrait};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut cache: LfuCache<&str, String> = LfuCache::new(2);

    cache.add("a", "alpha".to_string());
    cache.add("b", "beta".to_string());

    let _ = cache.get(&"a");
    cache.add("c", "gamma".to_string());

    println!("contains a? {}", cache.contains(&"a"));
    println!("contains b? {}", cache.contains(&"b"));
    println!("frequency of a: {:?}", cache.frequency(&"a"));
    println!("next victim: {:?}", cache.peek_lfu().map(|(k, _)| *k));
}

// Expected output:
// contains a? true
// contains b? false
// frequency of a: Some(2)
// next victim: Some("c")
//
// Explanation: capacity=2; "a" is accessed before inserting "c", so "b" is
// evicted. Run with RUST_LOG=freqcache=debug to see the eviction event.
