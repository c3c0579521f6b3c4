//! Integration tests mirroring the pool's acceptance scenarios: happy path,
//! insufficient values, all-workers-fail, timeout, external cancellation,
//! and an adaptive factory that uses the success-count hint.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use wpool::{PoolError, ValueFactory, WorkerPool, WorkerPoolConfig};

#[test]
fn happy_path_returns_at_least_target_successes() {
    let pool = WorkerPool::new(
        |v: u32| -> Result<u32, String> { Ok(v * 10) },
        vec![1, 2, 3, 4, 5],
        3,
        Duration::from_secs(5),
    );
    pool.start();
    let successes = pool.block_until_target_successes().expect("should not fail");
    assert!(successes.len() >= 3);
    for (k, v) in &successes {
        assert_eq!(*v, k * 10);
    }
    pool.join().unwrap();
}

#[test]
fn insufficient_values_raises_out_of_values() {
    let pool = WorkerPool::new(
        |v: u32| -> Result<u32, String> { Ok(v) },
        vec![1, 2],
        5,
        Duration::from_secs(5),
    );
    pool.start();
    let err = pool.block_until_target_successes().unwrap_err();
    assert!(matches!(err, PoolError::OutOfValues));
    pool.join().unwrap();

    let mut expected = HashMap::new();
    expected.insert(1, 1);
    expected.insert(2, 2);
    assert_eq!(pool.get_successes(), expected);
}

#[test]
fn all_workers_failing_raises_out_of_values_and_records_failures() {
    let pool = WorkerPool::new(
        |_v: u32| -> Result<u32, String> { Err("boom".to_string()) },
        vec![1, 2, 3],
        1,
        Duration::from_secs(5),
    );
    pool.start();
    let err = pool.block_until_target_successes().unwrap_err();
    assert!(matches!(err, PoolError::OutOfValues));
    pool.join().unwrap();

    let failures = pool.get_failures();
    assert_eq!(failures.len(), 3);
    for message in failures.values() {
        assert!(message.contains("boom"));
    }
}

#[test]
fn slow_worker_triggers_timeout() {
    let pool = WorkerPool::new(
        |v: u32| -> Result<u32, String> {
            thread::sleep(Duration::from_secs(10));
            Ok(v)
        },
        vec![1],
        1,
        Duration::from_millis(100),
    );
    pool.start();
    let start = std::time::Instant::now();
    let err = pool.block_until_target_successes().unwrap_err();
    assert!(matches!(err, PoolError::TimedOut));
    pool.join().unwrap();
    // join() must complete within a small multiple of the timeout, not wait
    // for the 10s worker sleep.
    assert!(start.elapsed() < Duration::from_secs(2));
}

#[test]
fn external_cancel_never_hangs() {
    let pool = WorkerPool::new(
        |v: u32| -> Result<u32, String> {
            thread::sleep(Duration::from_secs(1));
            Ok(v)
        },
        (1..=100).collect(),
        100,
        Duration::from_secs(30),
    );
    pool.start();

    let canceller = pool.clone();
    thread::spawn(move || {
        thread::sleep(Duration::from_millis(100));
        canceller.cancel();
    });

    // Either OutOfValues or TimedOut is acceptable depending on the race;
    // what must never happen is hanging.
    let result = pool.block_until_target_successes();
    assert!(result.is_err());
    pool.join().unwrap();
}

#[test]
fn adaptive_factory_stops_once_hint_reaches_target() {
    struct CountingFactory {
        next: u32,
    }
    impl ValueFactory<u32> for CountingFactory {
        fn produce(&mut self, current_successes: usize) -> Vec<u32> {
            if current_successes >= 2 {
                Vec::new()
            } else {
                self.next += 1;
                vec![self.next]
            }
        }
    }

    let pool = WorkerPool::with_config(
        |v: u32| -> Result<u32, String> { Ok(v) },
        CountingFactory { next: 0 },
        WorkerPoolConfig::new(2, Duration::from_secs(5)).stagger_timeout(Duration::from_millis(5)),
    );
    pool.start();
    let successes = pool.block_until_target_successes().expect("should reach target");
    assert_eq!(successes.len(), 2);
    pool.join().unwrap();
}

#[test]
fn finished_never_exceeds_started_and_join_is_idempotent() {
    let started_values: Vec<u32> = (1..=20).collect();
    let call_count = Arc::new(AtomicUsize::new(0));
    let counted = Arc::clone(&call_count);

    let pool = WorkerPool::new(
        move |v: u32| -> Result<u32, String> {
            counted.fetch_add(1, Ordering::SeqCst);
            Ok(v)
        },
        started_values,
        20,
        Duration::from_secs(5),
    );
    pool.start();
    let successes = pool.block_until_target_successes().unwrap();
    assert_eq!(successes.len(), 20);
    assert_eq!(call_count.load(Ordering::SeqCst), 20);

    pool.join().unwrap();
    pool.join().unwrap(); // idempotent, does not raise
}
