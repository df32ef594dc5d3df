//! Coordinator side of the dispatch protocol.
//!
//! Scatter sends each worker rank, in ascending order, its offset on the
//! control channel and then its input slice on the bulk channel. Gather
//! receives the same pair back, in the same order and on the same channels,
//! and checks both against the partition before merging.

use crate::buffer::MergedOutput;
use crate::comm::{Channel, Communicator};
use crate::core::constants::COORDINATOR_RANK;
use crate::core::error::{BatchError, Result};
use crate::core::types::{DataIndex, Rank};
use crate::partition::Partition;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Ranks that receive a chunk from the coordinator, in ascending order.
fn worker_ranks<C: Communicator>(comm: &C) -> Result<impl Iterator<Item = Rank>> {
    if comm.rank() != COORDINATOR_RANK {
        return Err(BatchError::internal(format!(
            "rank {} cannot dispatch, only the coordinator can",
            comm.rank()
        )));
    }
    Ok(COORDINATOR_RANK + 1..comm.size())
}

/// Send every worker its offset and input slice.
pub fn scatter<C, I>(comm: &C, partition: &Partition, inputs: &[I]) -> Result<()>
where
    C: Communicator,
    I: Serialize,
{
    if inputs.len() != partition.dataset_size() {
        return Err(BatchError::internal(format!(
            "dataset has {} elements, partition expects {}",
            inputs.len(),
            partition.dataset_size()
        )));
    }

    for rank in worker_ranks(comm)? {
        let chunk = partition.chunk(rank)?;
        comm.send(rank, Channel::Control, &chunk.offset())?;
        comm.send(rank, Channel::Bulk, &inputs[chunk.range()])?;
        log::info!(
            "sent {} elements to rank {} at offset {}",
            chunk.len(),
            rank,
            chunk.offset()
        );
    }
    Ok(())
}

/// Receive every worker's offset and outputs and merge them.
pub fn gather<C, O>(comm: &C, partition: &Partition, merged: &mut MergedOutput<O>) -> Result<()>
where
    C: Communicator,
    O: DeserializeOwned,
{
    for rank in worker_ranks(comm)? {
        let chunk = partition.chunk(rank)?;

        let offset: DataIndex = comm.recv(rank, Channel::Control)?;
        if offset != chunk.offset() {
            return Err(BatchError::OffsetMismatch {
                rank,
                expected: chunk.offset(),
                actual: offset,
            });
        }

        let outputs: Vec<O> = comm.recv(rank, Channel::Bulk)?;
        if outputs.len() != chunk.len() {
            return Err(BatchError::LengthMismatch {
                rank,
                expected: chunk.len(),
                actual: outputs.len(),
            });
        }

        merged.write_chunk(chunk, outputs)?;
        log::debug!("gathered {} records from rank {} at offset {}", chunk.len(), rank, offset);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comm::LocalWorld;

    #[test]
    fn test_scatter_then_gather_echo() {
        let partition = Partition::new(8, 4).unwrap();
        let results = LocalWorld::launch(4, |comm| {
            if comm.rank() == 0 {
                let inputs: Vec<u32> = (0..8).collect();
                scatter(&comm, &partition, &inputs)?;
                let mut merged = MergedOutput::<u32>::new(8);
                merged.write_chunk(partition.chunk(0)?, vec![0, 10])?;
                gather(&comm, &partition, &mut merged)?;
                merged.into_complete()
            } else {
                let offset: usize = comm.recv(0, Channel::Control)?;
                let slice: Vec<u32> = comm.recv(0, Channel::Bulk)?;
                assert_eq!(offset, partition.offset(comm.rank())?);
                let doubled: Vec<u32> = slice.iter().map(|v| v * 10).collect();
                comm.send(0, Channel::Control, &offset)?;
                comm.send(0, Channel::Bulk, &doubled)?;
                Ok(Vec::new())
            }
        })
        .unwrap();
        assert_eq!(results[0], vec![0, 10, 20, 30, 40, 50, 60, 70]);
    }

    #[test]
    fn test_gather_rejects_wrong_offset() {
        let partition = Partition::new(4, 2).unwrap();
        let err = LocalWorld::launch(2, |comm| {
            if comm.rank() == 0 {
                let mut merged: MergedOutput<u32> = MergedOutput::new(4);
                gather(&comm, &partition, &mut merged)
            } else {
                comm.send(0, Channel::Control, &0usize)?;
                comm.send(0, Channel::Bulk, &vec![1u32, 2])?;
                Ok(())
            }
        })
        .unwrap_err();
        assert!(matches!(
            err,
            BatchError::OffsetMismatch {
                rank: 1,
                expected: 2,
                actual: 0
            }
        ));
    }

    #[test]
    fn test_gather_rejects_short_payload() {
        let partition = Partition::new(6, 2).unwrap();
        let err = LocalWorld::launch(2, |comm| {
            if comm.rank() == 0 {
                let mut merged: MergedOutput<u32> = MergedOutput::new(6);
                gather(&comm, &partition, &mut merged)
            } else {
                comm.send(0, Channel::Control, &3usize)?;
                comm.send(0, Channel::Bulk, &vec![1u32, 2])?;
                Ok(())
            }
        })
        .unwrap_err();
        assert!(matches!(
            err,
            BatchError::LengthMismatch {
                rank: 1,
                expected: 3,
                actual: 2
            }
        ));
    }

    #[test]
    fn test_scatter_rejects_wrong_dataset_length() {
        let partition = Partition::new(4, 1).unwrap();
        let results = LocalWorld::launch(1, |comm| scatter(&comm, &partition, &[1u8, 2, 3]));
        assert!(matches!(results, Err(BatchError::Internal { .. })));
    }
}
