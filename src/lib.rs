//! # partition-batch
//!
//! A fixed-topology, single-round partitioned batch compute coordinator.
//!
//! A dataset of S elements is split into P equal contiguous chunks. The
//! coordinator (rank 0) synthesizes the dataset, sends every worker rank its
//! offset and input slice, computes chunk 0 itself, gathers the workers'
//! outputs back into full-size arrays, sums the scalar aggregates of every
//! rank and prints a report.
//!
//! ## Quick Start
//!
//! ```rust
//! use partition_batch::{ConfigBuilder, KernelKind, RunReport};
//!
//! # fn main() -> partition_batch::Result<()> {
//! let config = ConfigBuilder::new()
//!     .kernel(KernelKind::Numeric)
//!     .dataset_size(40)
//!     .num_processes(4)
//!     .build()?;
//!
//! let report = partition_batch::run(&config)?;
//! if let RunReport::Numeric(numeric) = &report {
//!     assert_eq!(numeric.dataset_size, 40);
//! }
//! println!("{}", report);
//! # Ok(())
//! # }
//! ```
//!
//! ## Kernels
//!
//! - **Geometric**: a random triangle inscribed under `y = -2x + 2` per
//!   element, and its area.
//! - **Numeric**: parity, primality and chunk-local frequency per element,
//!   with global parity and prime counts.
//!
//! Both implement [`Kernel`], so the coordination skeleton in [`runner`] is
//! written once.
//!
//! ## Architecture
//!
//! - [`core`]: types, constants, error handling, logging set-up
//! - [`config`]: run configuration, file and environment loading, validation
//! - [`partition`]: the divisibility precondition and chunk offsets
//! - [`comm`]: channels, the [`Communicator`] seam, the in-process world and
//!   collectives
//! - [`dispatch`] / [`worker`]: the two sides of the scatter/gather protocol
//! - [`buffer`]: full-size outputs with write-exactly-once tracking
//! - [`kernel`]: the compute strategies
//! - [`runner`]: one process of a run, for either role
//! - [`report`]: console and JSON reports

#![warn(missing_docs)]
#![deny(unsafe_op_in_unsafe_fn)]
#![warn(
    missing_debug_implementations,
    rust_2018_idioms,
    unreachable_pub,
    non_snake_case,
    non_upper_case_globals
)]

// Core infrastructure module - always available
pub mod core;

// Configuration management module
pub mod config;

pub mod buffer;
pub mod comm;
pub mod dispatch;
pub mod kernel;
pub mod partition;
pub mod report;
pub mod runner;
pub mod worker;

// Re-export core functionality for convenience
pub use crate::core::{
    constants::*,
    error::{BatchError, Result},
    types::*,
};

// Re-export configuration functionality
pub use config::{Config, ConfigBuilder, ConfigValidator, ValidationWarning};

pub use buffer::MergedOutput;
pub use comm::{Channel, Communicator, LocalCommunicator, LocalWorld};
pub use kernel::{ChunkResult, GeometricKernel, Kernel, NumericKernel};
pub use partition::{Chunk, Partition};
pub use report::{GeometricReport, NumericReport, RunReport};
pub use runner::{launch_local, run, run_process, Job, ProcessOutcome};

// Version information
pub use crate::core::constants::PARTITION_BATCH_VERSION as VERSION;

/// Initialize logging.
///
/// `verbosity` picks the default filter (0 = warn, 1 = info, 2+ = debug);
/// `RUST_LOG` overrides it. Safe to call more than once.
///
/// # Examples
///
/// ```rust
/// partition_batch::init(1);
/// ```
pub fn init(verbosity: u8) {
    crate::core::initialize_logging(verbosity);
}
