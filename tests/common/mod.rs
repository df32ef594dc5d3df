//! Common test utilities for partition-batch integration tests.
#![allow(dead_code)]

use partition_batch::*;
use rand::prelude::*;

/// Numeric dataset of `size` values in `0..=max`.
pub fn create_numeric_values(size: usize, max: Value, seed: u64) -> Vec<Value> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..size).map(|_| rng.gen_range(0..=max)).collect()
}

/// Run a whole batch locally and return every rank's outcome.
pub fn run_batch<K: Kernel>(
    kernel: &K,
    dataset_size: usize,
    num_processes: usize,
    seed: u64,
) -> Result<Vec<ProcessOutcome<K::Output, K::Report>>> {
    let job = Job { dataset_size, seed };
    launch_local(kernel, job, num_processes)
}

/// Merged outputs held by the coordinator after a successful run.
pub fn coordinator_outputs<O: Clone, R>(outcomes: &[ProcessOutcome<O, R>]) -> Vec<O> {
    outcomes[COORDINATOR_RANK]
        .collected
        .as_ref()
        .expect("coordinator holds the merged outputs")
        .outputs
        .clone()
}

/// Reduced totals held by the coordinator after a successful run.
pub fn coordinator_totals<O, R>(outcomes: &[ProcessOutcome<O, R>]) -> Vec<u64> {
    outcomes[COORDINATOR_RANK]
        .collected
        .as_ref()
        .expect("coordinator holds the reduced totals")
        .totals
        .clone()
}

/// Divisors of `n`, ascending.
pub fn divisors(n: usize) -> Vec<usize> {
    (1..=n).filter(|d| n % d == 0).collect()
}
