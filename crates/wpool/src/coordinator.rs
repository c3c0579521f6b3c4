//! The `WorkerPool` coordinator: producer thread, result-processor thread,
//! timeout thread, and the public API that ties them together.

use std::collections::HashMap;
use std::hash::Hash;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use wpool_core::{AllAtOnceFactory, OnceLatch, Outcome, PoolError, ValueFactory, Worker};
use wpool_executor::FixedPool;

use crate::config::WorkerPoolConfig;
use crate::result_queue::{ResultQueue, POP_PARK_TIMEOUT};

/// The terminal value stored in the pool's result latch: exactly one of a
/// frozen success-map snapshot, a timeout marker, or a producer-exhausted
/// marker.
#[derive(Clone)]
enum Terminal<V, R> {
    Successes(HashMap<V, R>),
    TimedOut,
    ProducerStopped,
}

/// Broadcast flag used to cooperatively stop the producer, the timeout
/// thread, and (indirectly, via discarded outcomes) in-flight workers.
/// Reuses `OnceLatch<()>`: cancellation only ever transitions false→true
/// once, which is exactly what `OnceLatch::set` already guarantees.
type CancelEvent = OnceLatch<()>;

struct Inner<V, R> {
    worker: Arc<dyn Worker<V, R> + Send + Sync>,
    value_factory: Mutex<Option<Box<dyn ValueFactory<V> + Send>>>,

    target_successes: usize,
    timeout: Duration,
    stagger_timeout: Duration,
    pool_size: Option<usize>,
    pool_name: String,

    executor: Mutex<Option<FixedPool>>,
    result_queue: ResultQueue<Outcome<V, R>>,

    successes: Mutex<HashMap<V, R>>,
    failures: Mutex<HashMap<V, String>>,
    started_tasks: AtomicUsize,
    finished_tasks: AtomicUsize,

    cancel_event: CancelEvent,
    target_value: OnceLatch<Terminal<V, R>>,
    unexpected_error: OnceLatch<String>,

    producer_thread: Mutex<Option<JoinHandle<()>>>,
    result_thread: Mutex<Option<JoinHandle<()>>>,
    timeout_thread: Mutex<Option<JoinHandle<()>>>,

    stopped: AtomicBool,
}

/// A generalized bounded-parallelism worker pool.
///
/// Drives `value_factory` against `worker` on a fixed-size thread pool,
/// collecting outcomes until `target_successes` is reached, the factory is
/// exhausted, or `timeout` elapses. See the crate-level docs for the full
/// lifecycle contract.
///
/// Cheap to clone: a `WorkerPool` is a handle around an `Arc`, so the same
/// pool can be handed to another thread (e.g. to call `cancel()` from
/// outside) without any extra synchronization on the caller's part.
pub struct WorkerPool<V, R> {
    inner: Arc<Inner<V, R>>,
}

impl<V, R> Clone for WorkerPool<V, R> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<V, R> WorkerPool<V, R>
where
    V: Eq + Hash + Clone + Send + 'static,
    R: Clone + Send + 'static,
{
    /// Construct a pool with an explicit [`WorkerPoolConfig`] and a
    /// [`ValueFactory`] implementation.
    pub fn with_config(
        worker: impl Worker<V, R> + 'static,
        value_factory: impl ValueFactory<V> + Send + 'static,
        config: WorkerPoolConfig,
    ) -> Self {
        let inner = Inner {
            worker: Arc::new(worker),
            value_factory: Mutex::new(Some(Box::new(value_factory))),
            target_successes: config.target_successes,
            timeout: config.timeout,
            stagger_timeout: config.stagger_timeout,
            pool_size: config.pool_size,
            pool_name: config.pool_name,
            executor: Mutex::new(None),
            result_queue: ResultQueue::new(),
            successes: Mutex::new(HashMap::new()),
            failures: Mutex::new(HashMap::new()),
            started_tasks: AtomicUsize::new(0),
            finished_tasks: AtomicUsize::new(0),
            cancel_event: CancelEvent::new(),
            target_value: OnceLatch::new(),
            unexpected_error: OnceLatch::new(),
            producer_thread: Mutex::new(None),
            result_thread: Mutex::new(None),
            timeout_thread: Mutex::new(None),
            stopped: AtomicBool::new(false),
        };
        Self {
            inner: Arc::new(inner),
        }
    }

    /// Construct a pool that draws from a plain `Vec<V>` in a single batch
    /// (via [`AllAtOnceFactory`]), the common case.
    pub fn new(
        worker: impl Worker<V, R> + 'static,
        values: Vec<V>,
        target_successes: usize,
        timeout: Duration,
    ) -> Self {
        Self::with_config(
            worker,
            AllAtOnceFactory::new(values),
            WorkerPoolConfig::new(target_successes, timeout),
        )
    }

    /// Starts the executor, then the producer, result-processor, and
    /// timeout threads.
    ///
    /// # Panics
    ///
    /// Panics if called more than once on the same pool — `start()` must be
    /// called exactly once before any other method, per the single-shot
    /// lifecycle contract.
    pub fn start(&self) {
        let factory = self
            .inner
            .value_factory
            .lock()
            .unwrap()
            .take()
            .expect("WorkerPool::start called more than once");

        let executor = match self.inner.pool_size {
            Some(n) => FixedPool::new(n, &format!("{}-worker", self.inner.pool_name)),
            None => FixedPool::auto_sized(&format!("{}-worker", self.inner.pool_name)),
        };
        *self.inner.executor.lock().unwrap() = Some(executor);

        let producer_inner = Arc::clone(&self.inner);
        let producer_handle = thread::Builder::new()
            .name(format!("{}-producer", self.inner.pool_name))
            .spawn(move || run_producer(producer_inner, factory))
            .expect("failed to spawn producer thread");
        *self.inner.producer_thread.lock().unwrap() = Some(producer_handle);

        let result_inner = Arc::clone(&self.inner);
        let result_handle = thread::Builder::new()
            .name(format!("{}-result-processor", self.inner.pool_name))
            .spawn(move || run_result_processor(result_inner))
            .expect("failed to spawn result-processor thread");
        *self.inner.result_thread.lock().unwrap() = Some(result_handle);

        let timeout_inner = Arc::clone(&self.inner);
        let timeout_handle = thread::Builder::new()
            .name(format!("{}-timeout", self.inner.pool_name))
            .spawn(move || run_timeout(timeout_inner))
            .expect("failed to spawn timeout thread");
        *self.inner.timeout_thread.lock().unwrap() = Some(timeout_handle);

        tracing::debug!(pool = %self.inner.pool_name, "worker pool started");
    }

    /// Sets the cancel event. Never blocks; safe to call from any thread at
    /// any time, including reentrantly from a service thread.
    pub fn cancel(&self) {
        tracing::debug!(pool = %self.inner.pool_name, "cancel requested");
        self.inner.cancel_event.set(());
    }

    /// Blocks until all three service threads have exited and the executor's
    /// shutdown has been signalled (not necessarily finished — see
    /// `FixedPool::shutdown_detached`). Safe to call more than once: only the
    /// first call does any work or can return an error; later calls return
    /// `Ok(())` immediately.
    pub fn join(&self) -> Result<(), PoolError> {
        if self.inner.stopped.swap(true, Ordering::SeqCst) {
            return Ok(());
        }

        if let Some(h) = self.inner.producer_thread.lock().unwrap().take() {
            let _ = h.join();
        }
        if let Some(h) = self.inner.result_thread.lock().unwrap().take() {
            let _ = h.join();
        }
        if let Some(h) = self.inner.timeout_thread.lock().unwrap().take() {
            let _ = h.join();
        }

        if let Some(mut executor) = self.inner.executor.lock().unwrap().take() {
            // Not `shutdown()`: the result-processor having exited only
            // means every *accounted-for* task is done, not that every
            // submitted worker has returned (cancellation lets a straggler
            // keep running). Joining its thread synchronously here would
            // leave `join()` blocked on however long that straggler takes.
            executor.shutdown_detached();
        }

        if self.inner.unexpected_error.is_set() {
            let e = self.inner.unexpected_error.get();
            tracing::debug!(pool = %self.inner.pool_name, error = %e, "join re-raising producer error");
            return Err(PoolError::ProducerFailed(e));
        }
        Ok(())
    }

    /// Blocks until the terminal latch settles, then translates it into a
    /// success snapshot or a typed failure. Can be called more than once.
    pub fn block_until_target_successes(&self) -> Result<HashMap<V, R>, PoolError> {
        if self.inner.unexpected_error.is_set() {
            let e = self.inner.unexpected_error.get_and_clear();
            return Err(PoolError::ProducerFailed(e));
        }

        match self.inner.target_value.get() {
            Terminal::Successes(map) => Ok(map),
            Terminal::TimedOut => Err(PoolError::TimedOut),
            Terminal::ProducerStopped => Err(PoolError::OutOfValues),
        }
    }

    /// A snapshot of the current successes, safe to call at any point
    /// during or after the run.
    pub fn get_successes(&self) -> HashMap<V, R> {
        self.inner.successes.lock().unwrap().clone()
    }

    /// A snapshot of the current failures, safe to call at any point
    /// during or after the run.
    pub fn get_failures(&self) -> HashMap<V, String> {
        self.inner.failures.lock().unwrap().clone()
    }
}

fn run_producer<V, R>(inner: Arc<Inner<V, R>>, mut factory: Box<dyn ValueFactory<V> + Send>)
where
    V: Eq + Hash + Clone + Send + 'static,
    R: Clone + Send + 'static,
{
    loop {
        let current_successes = inner.successes.lock().unwrap().len();

        let batch = match panic::catch_unwind(AssertUnwindSafe(|| factory.produce(current_successes))) {
            Ok(batch) => batch,
            Err(payload) => {
                inner.unexpected_error.set(panic_message(payload));
                inner.cancel_event.set(());
                break;
            }
        };

        if batch.is_empty() {
            break;
        }

        inner.started_tasks.fetch_add(batch.len(), Ordering::SeqCst);
        tracing::trace!(pool = %inner.pool_name, batch_len = batch.len(), "producer submitting batch");

        for value in batch {
            let job_inner = Arc::clone(&inner);
            let executor_guard = inner.executor.lock().unwrap();
            executor_guard
                .as_ref()
                .expect("executor started before producer runs")
                .submit(move || worker_wrapper(job_inner, value));
        }

        if inner.cancel_event.wait_timeout(inner.stagger_timeout) {
            break;
        }
    }

    inner.result_queue.push(Outcome::ProducerDone);
    tracing::trace!(pool = %inner.pool_name, "producer exiting");
}

fn worker_wrapper<V, R>(inner: Arc<Inner<V, R>>, value: V)
where
    V: Eq + Hash + Clone + Send + 'static,
    R: Clone + Send + 'static,
{
    // A zero-duration check: if we're already cancelled, don't bother
    // starting the worker at all.
    if inner.cancel_event.is_set() {
        inner.result_queue.push(Outcome::Cancelled);
        return;
    }

    let worker = Arc::clone(&inner.worker);
    let value_for_worker = value.clone();
    let outcome = match panic::catch_unwind(AssertUnwindSafe(|| worker.run(value_for_worker))) {
        Ok(Ok(result)) => Outcome::Success { value, result },
        Ok(Err(error)) => Outcome::Failure { value, error },
        Err(payload) => Outcome::Failure {
            value,
            error: panic_message(payload),
        },
    };
    inner.result_queue.push(outcome);
}

fn run_result_processor<V, R>(inner: Arc<Inner<V, R>>)
where
    V: Eq + Hash + Clone + Send + 'static,
    R: Clone + Send + 'static,
{
    let mut producer_done = false;
    let mut success_event_reached = false;

    loop {
        match inner.result_queue.pop_timeout(POP_PARK_TIMEOUT) {
            Some(Outcome::ProducerDone) => {
                producer_done = true;
            }
            Some(Outcome::Success { value, result }) => {
                inner.finished_tasks.fetch_add(1, Ordering::SeqCst);
                let len_successes = {
                    let mut successes = inner.successes.lock().unwrap();
                    successes.insert(value, result);
                    successes.len()
                };
                if !success_event_reached && len_successes == inner.target_successes {
                    success_event_reached = true;
                    let snapshot = inner.successes.lock().unwrap().clone();
                    tracing::debug!(pool = %inner.pool_name, len_successes, "target successes reached");
                    inner.target_value.set(Terminal::Successes(snapshot));
                }
            }
            Some(Outcome::Failure { value, error }) => {
                inner.finished_tasks.fetch_add(1, Ordering::SeqCst);
                inner.failures.lock().unwrap().insert(value, error);
            }
            Some(Outcome::Cancelled) => {
                inner.finished_tasks.fetch_add(1, Ordering::SeqCst);
            }
            // Nothing arrived within this poll interval; fall through to the
            // exit checks below instead of blocking indefinitely, so a
            // cancellation/timeout is noticed even while a worker is still
            // in flight.
            None => {}
        }

        let finished = inner.finished_tasks.load(Ordering::SeqCst);
        let started = inner.started_tasks.load(Ordering::SeqCst);

        if producer_done && finished == started {
            inner.cancel_event.set(()); // release the timeout thread
            inner.target_value.set(Terminal::ProducerStopped);
            break;
        }

        // The pool has been cancelled (externally, by the timeout thread, or
        // by the producer's own unexpected-error path) and the producer has
        // posted its last value: don't keep waiting on stragglers that may
        // never finish. A worker still in flight runs to completion, but its
        // outcome is simply never popped once this thread exits — discarding
        // it is the documented contract of cancellation.
        if producer_done && inner.cancel_event.is_set() {
            inner.target_value.set(Terminal::ProducerStopped);
            break;
        }
    }
    tracing::trace!(pool = %inner.pool_name, "result processor exiting");
}

fn run_timeout<V, R>(inner: Arc<Inner<V, R>>) {
    if !inner.cancel_event.wait_timeout(inner.timeout) {
        tracing::debug!(pool = %inner.pool_name, "timeout fired");
        inner.target_value.set(Terminal::TimedOut);
    }
    // Unconditional: releases the producer's stagger sleep even when this
    // thread woke up because something else already cancelled the pool.
    inner.cancel_event.set(());
}

fn panic_message(payload: Box<dyn std::any::Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "worker panicked with a non-string payload".to_string()
    }
}
