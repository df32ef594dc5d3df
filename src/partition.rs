//! Static partitioning of a dataset into equal contiguous chunks.
//!
//! A [`Partition`] exists only when `dataset_size % num_processes == 0`;
//! constructing it is the run-start precondition every rank checks before
//! any message is sent. Rank `i` owns [`Chunk`] `[i * chunk_size, (i + 1) * chunk_size)`.

use crate::core::error::{BatchError, Result};
use crate::core::types::{DataIndex, Rank};
use serde::{Deserialize, Serialize};
use std::ops::Range;

/// A contiguous index range `[offset, offset + len)` of the dataset and of
/// every parallel output array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Chunk {
    offset: DataIndex,
    len: usize,
}

impl Chunk {
    /// Create a chunk starting at `offset` with `len` elements.
    pub fn new(offset: DataIndex, len: usize) -> Self {
        Chunk { offset, len }
    }

    /// First index owned by this chunk.
    pub fn offset(&self) -> DataIndex {
        self.offset
    }

    /// Number of indices in this chunk.
    pub fn len(&self) -> usize {
        self.len
    }

    /// True for a zero-length chunk.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// One past the last owned index.
    pub fn end(&self) -> DataIndex {
        self.offset + self.len
    }

    /// The owned indices as a range.
    pub fn range(&self) -> Range<DataIndex> {
        self.offset..self.end()
    }
}

/// Equal-size partition of `dataset_size` elements over `num_processes` ranks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Partition {
    dataset_size: usize,
    num_processes: usize,
    chunk_size: usize,
}

impl Partition {
    /// Validate the divisibility precondition and build the partition.
    ///
    /// Fails with [`BatchError::Partition`] when `dataset_size` is not a
    /// multiple of `num_processes`, and with [`BatchError::InvalidParameter`]
    /// when either is zero.
    pub fn new(dataset_size: usize, num_processes: usize) -> Result<Self> {
        if num_processes == 0 {
            return Err(BatchError::invalid_parameter(
                "num_processes",
                "0",
                "at least one process is required",
            ));
        }
        if dataset_size == 0 {
            return Err(BatchError::invalid_parameter(
                "dataset_size",
                "0",
                "dataset must not be empty",
            ));
        }
        if dataset_size % num_processes != 0 {
            return Err(BatchError::partition(dataset_size, num_processes));
        }
        Ok(Partition {
            dataset_size,
            num_processes,
            chunk_size: dataset_size / num_processes,
        })
    }

    /// Total number of elements S.
    pub fn dataset_size(&self) -> usize {
        self.dataset_size
    }

    /// Number of processes P.
    pub fn num_processes(&self) -> usize {
        self.num_processes
    }

    /// Elements per chunk, `S / P`.
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Offset assigned to `rank`.
    pub fn offset(&self, rank: Rank) -> Result<DataIndex> {
        self.check_rank(rank)?;
        Ok(rank * self.chunk_size)
    }

    /// Chunk owned by `rank` during the compute phase.
    pub fn chunk(&self, rank: Rank) -> Result<Chunk> {
        Ok(Chunk::new(self.offset(rank)?, self.chunk_size))
    }

    /// All chunks in rank order.
    pub fn chunks(&self) -> impl Iterator<Item = Chunk> + '_ {
        (0..self.num_processes).map(move |rank| Chunk::new(rank * self.chunk_size, self.chunk_size))
    }

    fn check_rank(&self, rank: Rank) -> Result<()> {
        if rank >= self.num_processes {
            return Err(BatchError::InvalidRank {
                rank,
                size: self.num_processes,
            });
        }
        Ok(())
    }
}
