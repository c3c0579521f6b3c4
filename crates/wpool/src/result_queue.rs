//! A bounded-wait multi-producer, single-consumer queue of outcomes.
//!
//! Every executor worker thread (and the producer thread, for the
//! `ProducerDone` sentinel) pushes; only the result-processor thread pops,
//! via `pop_timeout`. Built the same way `wpool-executor::FixedPool` parks
//! idle workers: a lock-free queue for the hot path, paired with a condvar
//! so the consumer sleeps instead of spinning between items, waking on
//! either a push or its own poll interval.

use std::sync::{Condvar, Mutex};
use std::time::Duration;

use crossbeam_queue::SegQueue;

/// Default interval `pop_timeout` is polled at by the result-processor's
/// loop — short enough that a cancellation/timeout is noticed quickly,
/// long enough not to spin.
pub const POP_PARK_TIMEOUT: Duration = Duration::from_millis(25);

pub struct ResultQueue<T> {
    queue: SegQueue<T>,
    notify_lock: Mutex<()>,
    notify: Condvar,
}

impl<T> ResultQueue<T> {
    pub fn new() -> Self {
        Self {
            queue: SegQueue::new(),
            notify_lock: Mutex::new(()),
            notify: Condvar::new(),
        }
    }

    pub fn push(&self, item: T) {
        self.queue.push(item);
        let _guard = self.notify_lock.lock().unwrap();
        self.notify.notify_one();
    }

    /// Waits up to `timeout` for an item to arrive; returns `None` if none
    /// did. The caller is expected to loop, re-checking its own exit
    /// conditions (e.g. cancellation) between calls — this is what lets the
    /// result-processor thread stop waiting on a worker that will never
    /// finish in time instead of blocking indefinitely.
    pub fn pop_timeout(&self, timeout: Duration) -> Option<T> {
        if let Some(item) = self.queue.pop() {
            return Some(item);
        }
        let guard = self.notify_lock.lock().unwrap();
        if self.queue.is_empty() {
            let (_guard, _timed_out) = self.notify.wait_timeout(guard, timeout).unwrap();
        }
        self.queue.pop()
    }
}

impl<T> Default for ResultQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}
