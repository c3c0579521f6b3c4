//! # wpool-core — trait definitions for the bounded-parallelism worker pool
//!
//! This crate defines the boundary types that `wpool-executor` and `wpool`
//! build on: the tagged `Outcome` a worker invocation produces, the
//! `ValueFactory` trait a producer drains, and the `OnceLatch` primitive the
//! coordinator uses to race its three settle sources against a single take.
//!
//! Every type here is generic over the value type `V` and result type `R`;
//! nothing in this crate spawns a thread or owns a queue — that is
//! `wpool-executor` and `wpool`'s job.

pub mod error;
pub mod factory;
pub mod latch;
pub mod outcome;
pub mod worker;

pub use error::PoolError;
pub use factory::{AllAtOnceFactory, ValueFactory};
pub use latch::OnceLatch;
pub use outcome::Outcome;
pub use worker::Worker;
