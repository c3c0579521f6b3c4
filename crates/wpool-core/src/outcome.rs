//! The tagged result a worker invocation posts to the result queue.

/// One worker invocation's result, plus the two control sentinels that
/// travel over the same queue.
///
/// `Cancelled` and `ProducerDone` carry no value: the former because a
/// cancelled worker never ran to a meaningful result, the latter because it
/// is not a worker outcome at all — it's the producer thread signalling that
/// no more values will ever be submitted.
#[derive(Debug)]
pub enum Outcome<V, R> {
    /// The worker returned normally.
    Success { value: V, result: R },
    /// The worker returned an error. `error` is a printable representation
    /// captured at the thread boundary, not a live error object — it must
    /// be `Send` without requiring the worker's error type to be.
    Failure { value: V, error: String },
    /// The worker observed the cancel event before or during execution and
    /// did not run (or its result is being discarded).
    Cancelled,
    /// Posted exactly once by the producer thread when it exits, by either
    /// termination path (factory exhaustion or unexpected producer error).
    ProducerDone,
}
