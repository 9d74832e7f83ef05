use std::thread;

use recency::SharedCache;

#[test]
fn concurrent_puts_respect_capacity() {
    let cache: SharedCache<u64, u64> = SharedCache::new(64).unwrap();

    let handles: Vec<_> = (0..8u64)
        .map(|worker| {
            let cache = cache.clone();
            thread::spawn(move || {
                for i in 0..1_000u64 {
                    let key = worker * 10_000 + i;
                    cache.put(key, i);
                    cache.get(&key);
                    assert!(cache.len() <= cache.capacity());
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(cache.len(), 64);
    assert_eq!(cache.stats().inserts(), 8_000);
    assert_eq!(cache.stats().evictions(), 8_000 - 64);
    assert_eq!(
        cache.stats().hits() + cache.stats().misses(),
        8_000,
        "every get is either a hit or a miss"
    );
}

#[test]
fn concurrent_readers_share_hot_keys() {
    let cache = SharedCache::new(16).unwrap();
    for key in 0..16u32 {
        cache.put(key, key.to_string());
    }

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let cache = cache.clone();
            thread::spawn(move || {
                for round in 0..500u32 {
                    let key = round % 16;
                    assert_eq!(cache.get(&key), Some(key.to_string()));
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(cache.stats().hits(), 2_000);
    assert_eq!(cache.stats().misses(), 0);
    assert_eq!(cache.stats().hit_ratio(), 1.0);
}
