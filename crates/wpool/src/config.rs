//! Worker pool configuration.
//!
//! A builder-with-defaults struct: start from `WorkerPoolConfig::new(..)`
//! (the two parameters that have no sane default) and chain setters for
//! everything else.

use std::time::Duration;

/// Configuration for a [`crate::WorkerPool`].
///
/// `target_successes` and `timeout` have no sane default and are required
/// at construction; `stagger_timeout`, `pool_size`, and `pool_name` default
/// to "no delay between batches", "auto-sized executor", and `"wpool"`.
#[derive(Debug, Clone)]
pub struct WorkerPoolConfig {
    pub(crate) target_successes: usize,
    pub(crate) timeout: Duration,
    pub(crate) stagger_timeout: Duration,
    pub(crate) pool_size: Option<usize>,
    pub(crate) pool_name: String,
}

impl WorkerPoolConfig {
    /// `target_successes` must be greater than zero — the pool can never
    /// terminate via the success path otherwise.
    pub fn new(target_successes: usize, timeout: Duration) -> Self {
        assert!(target_successes > 0, "target_successes must be > 0");
        Self {
            target_successes,
            timeout,
            stagger_timeout: Duration::ZERO,
            pool_size: None,
            pool_name: "wpool".to_string(),
        }
    }

    /// Delay between successive batch submissions. Gives in-flight workers
    /// a chance to succeed before the next wave is launched.
    pub fn stagger_timeout(mut self, d: Duration) -> Self {
        self.stagger_timeout = d;
        self
    }

    /// Fix the executor's thread count. Unset means auto-sized (half the
    /// available parallelism, clamped to `[2, 8]`).
    pub fn pool_size(mut self, n: usize) -> Self {
        assert!(n > 0, "pool_size must be > 0");
        self.pool_size = Some(n);
        self
    }

    /// Prefix used to name every spawned thread and `tracing` span.
    pub fn pool_name(mut self, name: impl Into<String>) -> Self {
        self.pool_name = name.into();
        self
    }
}
