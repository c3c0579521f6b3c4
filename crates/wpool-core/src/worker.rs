//! `Worker` — a user-supplied function from value to result.

/// A worker callable, invoked concurrently from many executor threads.
/// Must therefore be `Send + Sync`: it is shared (not cloned) across every
/// invocation, unlike `ValueFactory`, which is owned solely by the producer
/// thread.
///
/// Errors are captured as a `String` at the boundary, per the outcome
/// model's printable-representation contract — the worker's own error type
/// never has to cross a thread on its own.
pub trait Worker<V, R>: Send + Sync {
    fn run(&self, value: V) -> Result<R, String>;
}

impl<V, R, F, E> Worker<V, R> for F
where
    F: Fn(V) -> Result<R, E> + Send + Sync,
    E: std::fmt::Display,
{
    fn run(&self, value: V) -> Result<R, String> {
        self(value).map_err(|e| e.to_string())
    }
}
