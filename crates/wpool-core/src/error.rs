//! Pool error types.

use std::fmt;

/// The outcome of `block_until_target_successes` when the pool did not
/// reach its target via ordinary success accumulation.
#[derive(Debug)]
pub enum PoolError {
    /// The timeout thread fired before `target_successes` was reached.
    TimedOut,
    /// The value factory was exhausted before `target_successes` was reached.
    OutOfValues,
    /// The producer thread hit an unexpected error (not a worker failure)
    /// and the pool cancelled itself. Carries a printable representation of
    /// the error, captured at the thread boundary.
    ProducerFailed(String),
}

impl fmt::Display for PoolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TimedOut => write!(f, "timed out waiting for target successes"),
            Self::OutOfValues => write!(f, "value factory exhausted before target successes"),
            Self::ProducerFailed(e) => write!(f, "unexpected error in the producer thread: {e}"),
        }
    }
}

impl std::error::Error for PoolError {}

pub type Result<T> = std::result::Result<T, PoolError>;
