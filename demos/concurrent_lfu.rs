use std::thread;

use freqcache::builder::CacheBuilder;

fn main() {
    let cache = CacheBuilder::new(64)
        .try_build_concurrent::<u64, String>()
        .expect("capacity is non-zero");

    cache.add(0, "hot".to_string());

    let workers: Vec<_> = (0..4u64)
        .map(|t| {
            let cache = cache.clone();
            thread::spawn(move || {
                for i in 0..1_000u64 {
                    let _ = cache.get(&0);
                    cache.add(1 + t * 10_000 + i, format!("worker-{t}-{i}"));
                }
            })
        })
        .collect();

    for worker in workers {
        worker.join().expect("worker panicked");
    }

    println!("len: {}", cache.len());
    println!("hot still cached? {}", cache.contains(&0));
    println!("hot frequency: {:?}", cache.frequency(&0));
}

// Expected output:
// len: 64
// hot still cached? true
// hot frequency: Some(4001)
