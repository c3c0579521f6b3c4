//! # wpool — bounded-parallelism worker pool
//!
//! Drives a pluggable [`ValueFactory`] against a pluggable [`Worker`],
//! fanning values out over a fixed-size thread pool and collecting outcomes
//! until one of three terminal conditions is reached: a target number of
//! successes, exhaustion of the factory, or a wall-clock timeout.
//!
//! This is the primitive used to fan a request out to a fleet of remote
//! peers and collect enough successful responses to make progress,
//! tolerating slow or failing peers along the way. The pool itself knows
//! nothing about peers, HTTP, or certificates — `Worker` is any `V -> R`
//! callable the caller supplies.
//!
//! ```
//! use std::time::Duration;
//! use wpool::WorkerPool;
//!
//! let pool = WorkerPool::new(
//!     |v: u32| -> Result<u32, String> { Ok(v * 10) },
//!     vec![1, 2, 3, 4, 5],
//!     3,
//!     Duration::from_secs(5),
//! );
//! pool.start();
//! let successes = pool.block_until_target_successes().unwrap();
//! assert!(successes.len() >= 3);
//! pool.join().unwrap();
//! ```

mod config;
mod coordinator;
mod result_queue;

pub use config::WorkerPoolConfig;
pub use coordinator::WorkerPool;
pub use wpool_core::{AllAtOnceFactory, PoolError, ValueFactory, Worker};
