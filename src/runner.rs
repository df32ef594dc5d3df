//! Role-parameterised run of one process, and the local launcher.
//!
//! Every rank calls [`run_process`] with the same kernel and dataset
//! parameters. All ranks check the partition precondition first, so an
//! indivisible dataset aborts the whole world before any message is sent.
//! After that the coordinator scatters, computes chunk 0, gathers, reduces
//! and reports, while workers receive, compute, send and reduce.

use crate::buffer::MergedOutput;
use crate::comm::collective::reduce_sum_each;
use crate::comm::{Communicator, LocalWorld};
use crate::config::Config;
use crate::core::constants::COORDINATOR_RANK;
use crate::core::error::{BatchError, Result};
use crate::core::types::{Aggregate, KernelKind, Rank, Role};
use crate::dispatch::{gather, scatter};
use crate::kernel::{ChunkResult, GeometricKernel, Kernel, NumericKernel};
use crate::partition::{Chunk, Partition};
use crate::report::RunReport;
use crate::worker::run_worker;

/// Dataset parameters shared by every rank of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Job {
    /// Number of elements S
    pub dataset_size: usize,
    /// Seed handed to [`Kernel::synthesize`]
    pub seed: u64,
}

impl Job {
    /// Job parameters of a configuration.
    pub fn from_config(config: &Config) -> Self {
        Job {
            dataset_size: config.dataset_size,
            seed: config.random_seed,
        }
    }
}

/// What the coordinator holds at the end of a run.
#[derive(Debug, Clone)]
pub struct Collected<O, R> {
    /// Merged outputs, one per dataset index
    pub outputs: Vec<O>,
    /// Reduced aggregates, positionally matching the kernel's names
    pub totals: Vec<Aggregate>,
    /// Final report
    pub report: R,
}

/// What one rank did during a run.
#[derive(Debug, Clone)]
pub struct ProcessOutcome<O, R> {
    /// This process's rank
    pub rank: Rank,
    /// Coordinator or worker
    pub role: Role,
    /// Chunk this process computed
    pub chunk: Chunk,
    /// Aggregates over that chunk only
    pub local_aggregates: Vec<Aggregate>,
    /// Present on the coordinator only
    pub collected: Option<Collected<O, R>>,
}

/// Run one process of a batch.
pub fn run_process<C, K>(comm: &C, kernel: &K, job: Job) -> Result<ProcessOutcome<K::Output, K::Report>>
where
    C: Communicator,
    K: Kernel,
{
    let partition = Partition::new(job.dataset_size, comm.size())?;
    let role = Role::of(comm.rank(), COORDINATOR_RANK);
    log::info!(
        "rank {} of {} starting as {} ({} kernel, chunk size {})",
        comm.rank(),
        comm.size(),
        role,
        kernel.kind(),
        partition.chunk_size()
    );

    let (chunk, aggregates, merged) = match role {
        Role::Coordinator => {
            let inputs = kernel.synthesize(job.dataset_size, job.seed);
            scatter(comm, &partition, &inputs)?;

            let chunk = partition.chunk(COORDINATOR_RANK)?;
            let ChunkResult { outputs, aggregates } = kernel.compute(chunk, &inputs[chunk.range()]);
            let mut merged = MergedOutput::new(job.dataset_size);
            merged.write_chunk(chunk, outputs)?;

            gather(comm, &partition, &mut merged)?;
            (chunk, aggregates, Some(merged))
        }
        Role::Worker => {
            let (chunk, result) = run_worker(comm, &partition, kernel)?;
            (chunk, result.aggregates, None)
        }
    };

    check_aggregates(kernel, &aggregates)?;
    let totals = reduce_sum_each(comm, &aggregates, COORDINATOR_RANK)?;

    let collected = match (merged, totals) {
        (Some(merged), Some(totals)) => {
            for (name, total) in kernel.aggregate_names().iter().zip(&totals) {
                log::info!("global {} count: {}", name, total);
            }
            let outputs = merged.into_complete()?;
            let report = kernel.report(&outputs, &totals);
            Some(Collected {
                outputs,
                totals,
                report,
            })
        }
        (None, None) => None,
        _ => return Err(BatchError::internal("reduction root is not the coordinator")),
    };

    Ok(ProcessOutcome {
        rank: comm.rank(),
        role,
        chunk,
        local_aggregates: aggregates,
        collected,
    })
}

fn check_aggregates<K: Kernel>(kernel: &K, aggregates: &[Aggregate]) -> Result<()> {
    let expected = kernel.aggregate_names().len();
    if aggregates.len() != expected {
        return Err(BatchError::internal(format!(
            "{} kernel produced {} aggregates, expected {}",
            kernel.kind(),
            aggregates.len(),
            expected
        )));
    }
    Ok(())
}

/// Launch `num_processes` ranks in this process and run the batch on all.
///
/// Outcomes are returned in rank order.
pub fn launch_local<K>(kernel: &K, job: Job, num_processes: usize) -> Result<Vec<ProcessOutcome<K::Output, K::Report>>>
where
    K: Kernel,
{
    LocalWorld::launch(num_processes, |comm| run_process(&comm, kernel, job))
}

/// Take the coordinator's collected results out of a run's outcomes.
pub fn into_collected<O, R>(outcomes: Vec<ProcessOutcome<O, R>>) -> Result<Collected<O, R>> {
    outcomes
        .into_iter()
        .find_map(|outcome| outcome.collected)
        .ok_or_else(|| BatchError::internal("no coordinator outcome"))
}

/// Run the batch described by `config` and return the coordinator's report.
pub fn run(config: &Config) -> Result<RunReport> {
    let job = Job::from_config(config);
    log::info!(
        "running {} kernel over {} elements on {} processes",
        config.kernel,
        job.dataset_size,
        config.num_processes
    );

    let report = match config.kernel {
        KernelKind::Geometric => {
            let outcomes = launch_local(&GeometricKernel::new(), job, config.num_processes)?;
            RunReport::Geometric(into_collected(outcomes)?.report)
        }
        KernelKind::Numeric => {
            let kernel = NumericKernel::new(config.value_min, config.value_max);
            let outcomes = launch_local(&kernel, job, config.num_processes)?;
            RunReport::Numeric(into_collected(outcomes)?.report)
        }
    };
    Ok(report)
}
