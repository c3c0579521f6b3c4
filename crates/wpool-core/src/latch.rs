//! A single-assignment cell with a blocking `get`, and a reset path for the
//! one caller that needs to consume-and-clear.

use std::sync::{Condvar, Mutex};
use std::time::Duration;

/// A value that can be set exactly once and waited on by any number of
/// threads.
///
/// The coordinator races three independent settle sources (target reached,
/// producer exhausted, timeout) against at most one take operation
/// (`block_until_target_successes`). `set` reduces that race to "first one
/// in wins, the rest are no-ops" — no caller needs to coordinate who gets to
/// call `set`.
///
/// `get_and_clear` exists only so `block_until_target_successes` can consume
/// a producer-side error without preventing `join()` from observing a later,
/// fresh settlement on the same latch.
pub struct OnceLatch<T> {
    state: Mutex<Option<T>>,
    settled: Condvar,
}

impl<T: Clone> OnceLatch<T> {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(None),
            settled: Condvar::new(),
        }
    }

    /// First call wins. Later calls while already settled are no-ops.
    pub fn set(&self, value: T) {
        let mut guard = self.state.lock().unwrap();
        if guard.is_none() {
            *guard = Some(value);
            self.settled.notify_all();
        }
    }

    /// Non-blocking query of the settled flag.
    pub fn is_set(&self) -> bool {
        self.state.lock().unwrap().is_some()
    }

    /// Blocks until settled, then returns a clone of the stored value
    /// without clearing it.
    pub fn get(&self) -> T {
        let mut guard = self.state.lock().unwrap();
        loop {
            if let Some(value) = guard.as_ref() {
                return value.clone();
            }
            guard = self.settled.wait(guard).unwrap();
        }
    }

    /// Blocks for up to `timeout`, returning `true` as soon as the latch is
    /// settled (by this or any other caller) and `false` if the timeout
    /// elapsed first. Used by the timeout thread to wait on the cancel
    /// event for a bounded duration, and by the producer's interruptible
    /// stagger sleep.
    pub fn wait_timeout(&self, timeout: Duration) -> bool {
        let guard = self.state.lock().unwrap();
        if guard.is_some() {
            return true;
        }
        let (guard, _timeout_result) = self.settled.wait_timeout(guard, timeout).unwrap();
        guard.is_some()
    }

    /// Blocks until settled, then atomically reads and clears the value and
    /// the settled flag, so the latch can be settled again.
    pub fn get_and_clear(&self) -> T {
        let mut guard = self.state.lock().unwrap();
        loop {
            if guard.is_some() {
                return guard.take().unwrap();
            }
            guard = self.settled.wait(guard).unwrap();
        }
    }
}

impl<T: Clone> Default for OnceLatch<T> {
    fn default() -> Self {
        Self::new()
    }
}
