#![no_main]

use freqcache::policy::lfu::LfuCache;
use freqcache::traits::{CoreCache, LfuCacheTrait, MutableCache};
use libfuzzer_sys::fuzz_target;

// Fuzz arbitrary operation sequences on LfuCache
//
// First byte picks the capacity; each following pair is (op, key). After
// every operation the index, arena and heap must agree and the cache must
// stay within capacity.
fuzz_target!(|data: &[u8]| {
    let Some((&cap_byte, ops)) = data.split_first() else {
        return;
    };
    let capacity = usize::from(cap_byte % 32) + 1;
    let mut cache: LfuCache<u8, u32> = LfuCache::new(capacity);

    for (step, chunk) in ops.chunks_exact(2).enumerate() {
        let key = chunk[1] % 64;
        match chunk[0] % 6 {
            0 | 1 => {
                let was_present = cache.contains(&key);
                let full = cache.len() == capacity;
                let candidate = cache.peek_lfu().map(|(k, _)| *k);
                let before = cache.frequency(&key);

                let prev = cache.add(key, step as u32);
                assert_eq!(prev.is_some(), was_present);
                if was_present {
                    assert_eq!(cache.frequency(&key), before.map(|f| f + 1));
                } else {
                    assert_eq!(cache.frequency(&key), Some(1));
                    if full {
                        let evicted = candidate.expect("full cache has a candidate");
                        assert!(!cache.contains(&evicted));
                    }
                }
            }
            2 | 3 => {
                let before = cache.frequency(&key);
                match cache.get(&key) {
                    Ok(_) => assert_eq!(cache.frequency(&key), before.map(|f| f + 1)),
                    Err(_) => assert!(before.is_none()),
                }
            }
            4 => {
                let len = cache.len();
                match cache.delete(&key) {
                    Ok(_) => assert_eq!(cache.len(), len - 1),
                    Err(_) => assert_eq!(cache.len(), len),
                }
                assert!(!cache.contains(&key));
            }
            5 => {
                let candidate = cache.peek_lfu().map(|(k, v)| (*k, *v));
                assert_eq!(cache.pop_lfu(), candidate);
            }
            _ => unreachable!(),
        }

        assert!(cache.len() <= capacity);
        cache.check_invariants().unwrap();
    }
});
