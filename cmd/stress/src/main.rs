//! Stress test - many threads hammering one store
//!
//! Every operation serializes on the store's single mutex, so this is a
//! contention test as much as a correctness one. Capacity misses are
//! expected once the thread count approaches the slot count.

use gresult::{site, Res, Store};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

fn main() {
    println!("=== gresult Stress Test ===\n");

    let num_threads: usize = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(8);
    let iterations: u64 = std::env::args()
        .nth(2)
        .and_then(|s| s.parse().ok())
        .unwrap_or(100_000);

    println!(
        "{} threads x {} create/read/delete cycles, {} slots\n",
        num_threads,
        iterations,
        gresult::constants::SLOT_CAPACITY
    );

    let store = Arc::new(Store::new());
    let completed = Arc::new(AtomicU64::new(0));
    let capacity_misses = Arc::new(AtomicU64::new(0));

    let start = Instant::now();
    let mut handles = vec![];

    for t in 0..num_threads as u64 {
        let store = Arc::clone(&store);
        let completed = Arc::clone(&completed);
        let capacity_misses = Arc::clone(&capacity_misses);

        handles.push(std::thread::spawn(move || {
            for i in 0..iterations {
                let value = t * iterations + i;
                let res = Res::ok(&store, value, site!());
                if res.is_fallback() {
                    // Arena momentarily full; count and move on
                    capacity_misses.fetch_add(1, Ordering::Relaxed);
                    continue;
                }

                let read_back = res.get(&store, site!()).expect("own live handle");
                assert_eq!(read_back, value);

                res.delete(&store, site!()).expect("own live handle");
                completed.fetch_add(1, Ordering::Relaxed);
            }
        }));
    }

    for h in handles {
        h.join().unwrap();
    }

    let elapsed = start.elapsed();
    let done = completed.load(Ordering::Relaxed);
    let missed = capacity_misses.load(Ordering::Relaxed);

    println!("=== Results ===");
    println!("Completed cycles: {}", done);
    println!("Capacity misses:  {}", missed);
    println!("Elapsed:          {:?}", elapsed);
    println!(
        "Throughput:       {:.0} cycles/sec",
        done as f64 / elapsed.as_secs_f64()
    );
    println!("Live leftovers:   {}", store.live_count());

    assert_eq!(store.live_count(), 0);
}
