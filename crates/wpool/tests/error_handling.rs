//! Producer-error surfacing: exactly one of `block_until_target_successes`
//! or `join` observes an unexpected producer-side error, never both.

use std::time::Duration;

use wpool::{PoolError, ValueFactory, WorkerPool, WorkerPoolConfig};

struct PanickingFactory {
    called: bool,
}

impl ValueFactory<u32> for PanickingFactory {
    fn produce(&mut self, _current_successes: usize) -> Vec<u32> {
        if self.called {
            panic!("factory exploded");
        }
        self.called = true;
        vec![1, 2, 3]
    }
}

#[test]
fn producer_error_is_consumed_by_block_until_target_successes_not_join() {
    let pool = WorkerPool::with_config(
        |v: u32| -> Result<u32, String> { Ok(v) },
        PanickingFactory { called: false },
        WorkerPoolConfig::new(10, Duration::from_secs(5)),
    );
    pool.start();

    let err = pool.block_until_target_successes().unwrap_err();
    match err {
        PoolError::ProducerFailed(msg) => assert!(msg.contains("factory exploded")),
        other => panic!("expected ProducerFailed, got {other:?}"),
    }

    // Already consumed: join() must not re-raise it.
    pool.join().unwrap();
}

#[test]
fn producer_error_surfaces_via_join_when_never_consumed() {
    let pool = WorkerPool::with_config(
        |v: u32| -> Result<u32, String> { Ok(v) },
        PanickingFactory { called: false },
        WorkerPoolConfig::new(10, Duration::from_secs(5)),
    );
    pool.start();

    let err = pool.join().unwrap_err();
    match err {
        PoolError::ProducerFailed(msg) => assert!(msg.contains("factory exploded")),
        other => panic!("expected ProducerFailed, got {other:?}"),
    }

    // Second join() does not re-raise.
    pool.join().unwrap();
}
