//! Concurrency stress tests for the bounded line queue
//!
//! One producer pushes as fast as it can while one consumer pops at a
//! randomized, slower pace. Every delivered line must be intact and in
//! order, and every line must be either delivered or counted as dropped.

mod common;

use common::{checked_line, verify_checked_words};
use rand::Rng;
use squitterrator::decode::decode_line;
use squitterrator::{BoundedLineQueue, PopOutcome};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

fn run_stress(n: u32, capacity: usize, max_pause_us: u64) {
    let queue = Arc::new(BoundedLineQueue::with_capacity(capacity).unwrap());

    let producer = {
        let queue = queue.clone();
        thread::spawn(move || {
            let mut accepted = 0u64;
            for i in 0..n {
                if queue.try_push(checked_line(i).as_bytes()) {
                    accepted += 1;
                }
            }
            queue.close();
            accepted
        })
    };

    let consumer = {
        let queue = queue.clone();
        thread::spawn(move || {
            let mut rng = rand::thread_rng();
            let mut delivered = Vec::new();
            loop {
                match queue.pop_wait(Duration::from_millis(50)) {
                    PopOutcome::Line(line) => {
                        let record = decode_line(&line);
                        delivered.push(verify_checked_words(record.values()));
                        if max_pause_us > 0 {
                            thread::sleep(Duration::from_micros(rng.gen_range(0..max_pause_us)));
                        }
                    }
                    PopOutcome::TimedOut => continue,
                    PopOutcome::Closed => break,
                }
            }
            delivered
        })
    };

    let accepted = producer.join().unwrap();
    let delivered = consumer.join().unwrap();
    let stats = queue.stats();

    assert!(delivered.iter().all(Option::is_some), "torn record delivered");
    let indices: Vec<u32> = delivered.into_iter().flatten().collect();

    assert_eq!(indices.len() as u64, accepted);
    assert_eq!(stats.pushed, accepted);
    assert_eq!(stats.popped, accepted);
    assert_eq!(stats.pushed + stats.dropped, n as u64);
    assert!(indices.windows(2).all(|w| w[0] < w[1]), "FIFO order violated");
}

#[test]
fn test_stress_slow_consumer() {
    run_stress(5_000, 32, 200);
}

#[test]
fn test_stress_tiny_queue() {
    run_stress(2_000, 2, 50);
}

#[test]
fn test_stress_unpaced_consumer() {
    run_stress(50_000, 32, 0);
}
