//! Per-chunk compute kernels.
//!
//! A [`Kernel`] is the only thing that differs between the geometric and the
//! numeric runs; the coordination skeleton in [`crate::runner`] is generic
//! over it. Kernels are stateless between calls and never look outside the
//! slice they are handed.

pub mod geometric;
pub mod numeric;

pub use geometric::{GeometricKernel, InscribedTriangle};
pub use numeric::{is_prime, Classification, NumericKernel};

use crate::core::types::{Aggregate, KernelKind};
use crate::partition::Chunk;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;

/// What one process produced for one chunk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChunkResult<O> {
    /// One record per element of the chunk, in chunk order
    pub outputs: Vec<O>,
    /// Local partial sums, positionally matching [`Kernel::aggregate_names`]
    pub aggregates: Vec<Aggregate>,
}

impl<O> ChunkResult<O> {
    /// Result with no aggregates.
    pub fn from_outputs(outputs: Vec<O>) -> Self {
        ChunkResult {
            outputs,
            aggregates: Vec::new(),
        }
    }
}

/// Compute strategy applied identically by every process.
pub trait Kernel: Send + Sync {
    /// One dataset element; moves to workers on the bulk channel.
    type Input: Clone + Send + Sync + Serialize + DeserializeOwned;
    /// One output record; moves back to the coordinator on the bulk channel.
    type Output: Clone + Send + Sync + Serialize + DeserializeOwned;
    /// Final report built at the coordinator.
    type Report: fmt::Display + Serialize + Send;

    /// Variant tag.
    fn kind(&self) -> KernelKind;

    /// Names of the scalar aggregates, in reduction order.
    fn aggregate_names(&self) -> &'static [&'static str];

    /// Build the full dataset. Only the coordinator calls this.
    fn synthesize(&self, size: usize, seed: u64) -> Vec<Self::Input>;

    /// Map every element of `inputs` (the elements of `chunk`) to its record
    /// and accumulate the local aggregates.
    fn compute(&self, chunk: Chunk, inputs: &[Self::Input]) -> ChunkResult<Self::Output>;

    /// Assemble the report from the merged outputs and the reduced totals.
    fn report(&self, outputs: &[Self::Output], totals: &[Aggregate]) -> Self::Report;
}
