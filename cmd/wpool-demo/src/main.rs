//! wpool basic example
//!
//! Fans a toy "fetch from peer" worker out over a list of simulated peer
//! ids, some of which are slow and some of which fail, and collects enough
//! successful responses to make progress.

use std::thread;
use std::time::Duration;

use wpool::WorkerPool;

/// Simulates querying a remote peer: peers divisible by 7 are unreachable,
/// peers divisible by 5 are slow enough to miss the deadline.
fn fetch_from_peer(peer_id: u32) -> Result<String, String> {
    if peer_id % 7 == 0 {
        return Err(format!("peer {peer_id} refused the connection"));
    }
    if peer_id % 5 == 0 {
        thread::sleep(Duration::from_secs(2));
    } else {
        thread::sleep(Duration::from_millis(50));
    }
    Ok(format!("peer {peer_id} says hello"))
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    println!("=== wpool basic example ===\n");

    let peers: Vec<u32> = (1..=30).collect();
    let target_successes = 10;

    let pool = WorkerPool::new(
        fetch_from_peer,
        peers,
        target_successes,
        Duration::from_secs(3),
    );
    pool.start();

    println!("Fanning out to {} simulated peers, waiting for {target_successes} successes...\n", 30);

    match pool.block_until_target_successes() {
        Ok(successes) => {
            println!("Reached target with {} successes:", successes.len());
            let mut peer_ids: Vec<_> = successes.keys().copied().collect();
            peer_ids.sort_unstable();
            for peer_id in peer_ids {
                println!("  {}", successes[&peer_id]);
            }
        }
        Err(e) => {
            println!("Did not reach target: {e}");
        }
    }

    let failures = pool.get_failures();
    if !failures.is_empty() {
        println!("\n{} peers failed:", failures.len());
        let mut peer_ids: Vec<_> = failures.keys().copied().collect();
        peer_ids.sort_unstable();
        for peer_id in peer_ids {
            println!("  peer {peer_id}: {}", failures[&peer_id]);
        }
    }

    pool.join().expect("pool shutdown cleanly");
    println!("\n=== Example complete ===");
}
