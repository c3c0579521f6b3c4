//! # wpool-executor — the fixed-size thread pool `wpool` submits work to.
//!
//! `FixedPool` spawns N OS threads at construction and never resizes. Work
//! items are boxed `FnOnce() + Send` closures pushed onto a lock-free MPMC
//! queue (`crossbeam_queue::SegQueue`); idle workers park on a condvar so
//! they don't spin burning CPU between jobs, and are woken either by a new
//! job or by shutdown. `shutdown` joins every worker thread before
//! returning; `shutdown_detached` posts the same signal but joins them on a
//! background reaper thread instead, for callers that can't afford to wait
//! out a worker stuck in a long-running job.
//!
//! Workers run user-supplied closures rather than routing fixed-shape
//! entries, so the job queue is unbounded: `submit` never rejects a job.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Condvar, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_queue::SegQueue;

type Job = Box<dyn FnOnce() + Send + 'static>;

/// Upper bound on how long an idle worker sleeps before re-checking the
/// shutdown flag. Keeps `shutdown()` latency bounded without busy-spinning.
const PARK_TIMEOUT: Duration = Duration::from_millis(25);

struct Shared {
    queue: SegQueue<Job>,
    notify_lock: Mutex<()>,
    notify: Condvar,
    shutdown: AtomicBool,
}

/// A fixed-size pool of OS worker threads.
///
/// `submit` never blocks on completion — it pushes the job and returns.
/// `shutdown`/`shutdown_detached` are idempotent: calling either twice, or
/// calling them on a pool whose threads have already drained and exited, is
/// safe.
pub struct FixedPool {
    shared: Arc<Shared>,
    handles: Vec<JoinHandle<()>>,
}

impl FixedPool {
    /// Spawn a pool with exactly `size` worker threads, named
    /// `{name_prefix}-{n}` for diagnostics and `tracing` spans.
    pub fn new(size: usize, name_prefix: &str) -> Self {
        let size = size.max(1);
        let shared = Arc::new(Shared {
            queue: SegQueue::new(),
            notify_lock: Mutex::new(()),
            notify: Condvar::new(),
            shutdown: AtomicBool::new(false),
        });

        let mut handles = Vec::with_capacity(size);
        for id in 0..size {
            let shared = Arc::clone(&shared);
            let thread_name = format!("{name_prefix}-{id}");
            let handle = thread::Builder::new()
                .name(thread_name.clone())
                .spawn(move || worker_loop(shared, &thread_name))
                .expect("failed to spawn worker thread");
            handles.push(handle);
        }

        tracing::debug!(size, name_prefix, "executor started");
        FixedPool { shared, handles }
    }

    /// Default sizing when the caller has no opinion: half the available
    /// parallelism, clamped to `[2, 8]`.
    pub fn auto_sized(name_prefix: &str) -> Self {
        let cpus = thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(4);
        let size = (cpus / 2).clamp(2, 8);
        Self::new(size, name_prefix)
    }

    /// Enqueue a job. Returns immediately; the pool handles queueing and
    /// scheduling onto an idle worker.
    pub fn submit<F>(&self, job: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.shared.queue.push(Box::new(job));
        // A single new job can only be claimed by one worker; waking one
        // sleeper is enough and avoids a thundering herd on every submit.
        let _guard = self.shared.notify_lock.lock().unwrap();
        self.shared.notify.notify_one();
    }

    /// Signal all workers to exit once the queue drains, and join them.
    /// Idempotent: a second call observes `handles` already empty and
    /// returns immediately.
    ///
    /// Blocks until every worker thread has exited — including one that is
    /// mid-job, since a job cannot be preempted. Callers that cannot afford
    /// to wait out an arbitrarily long in-flight job (because they've
    /// already decided to stop waiting on it, e.g. after a timeout) should
    /// use [`Self::shutdown_detached`] instead.
    pub fn shutdown(&mut self) {
        self.begin_shutdown();
        for handle in self.handles.drain(..) {
            let _ = handle.join();
        }
    }

    /// Same effect as [`Self::shutdown`], but returns as soon as the signal
    /// is posted rather than waiting for worker threads to exit. The actual
    /// joins happen on a detached reaper thread in the background, so a
    /// worker stuck in a long-running job no longer holds up the caller —
    /// the job still runs to completion, its result is simply nobody's to
    /// collect anymore.
    pub fn shutdown_detached(&mut self) {
        self.begin_shutdown();
        let handles = std::mem::take(&mut self.handles);
        if handles.is_empty() {
            return;
        }
        let _ = thread::Builder::new()
            .name("wpool-executor-reaper".to_string())
            .spawn(move || {
                for handle in handles {
                    let _ = handle.join();
                }
            });
    }

    fn begin_shutdown(&self) {
        self.shared.shutdown.store(true, Ordering::SeqCst);
        let _guard = self.shared.notify_lock.lock().unwrap();
        self.shared.notify.notify_all();
    }
}

impl Drop for FixedPool {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn worker_loop(shared: Arc<Shared>, thread_name: &str) {
    loop {
        if let Some(job) = shared.queue.pop() {
            job();
            continue;
        }

        if shared.shutdown.load(Ordering::SeqCst) {
            break;
        }

        let guard = shared.notify_lock.lock().unwrap();
        // Re-check under the lock: a job or shutdown may have landed
        // between the failed pop above and taking the lock.
        if shared.queue.is_empty() && !shared.shutdown.load(Ordering::SeqCst) {
            let _ = shared.notify.wait_timeout(guard, PARK_TIMEOUT).unwrap();
        }
    }
    tracing::trace!(thread_name, "executor worker exiting");
}
