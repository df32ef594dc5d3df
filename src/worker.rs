//! Worker side of the dispatch protocol.
//!
//! A worker performs exactly one receive round and one send round: offset
//! then input slice from the coordinator, offset then output slice back to
//! it, with the same channel discipline the coordinator uses.

use crate::comm::{Channel, Communicator};
use crate::core::constants::COORDINATOR_RANK;
use crate::core::error::{BatchError, Result};
use crate::core::types::DataIndex;
use crate::kernel::{ChunkResult, Kernel};
use crate::partition::{Chunk, Partition};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Block until this rank's chunk arrives and check it against the partition.
pub fn receive_chunk<C, I>(comm: &C, partition: &Partition) -> Result<(Chunk, Vec<I>)>
where
    C: Communicator,
    I: DeserializeOwned,
{
    let rank = comm.rank();
    let chunk = partition.chunk(rank)?;

    let offset: DataIndex = comm.recv(COORDINATOR_RANK, Channel::Control)?;
    if offset != chunk.offset() {
        return Err(BatchError::OffsetMismatch {
            rank,
            expected: chunk.offset(),
            actual: offset,
        });
    }

    let inputs: Vec<I> = comm.recv(COORDINATOR_RANK, Channel::Bulk)?;
    if inputs.len() != chunk.len() {
        return Err(BatchError::LengthMismatch {
            rank,
            expected: chunk.len(),
            actual: inputs.len(),
        });
    }

    log::debug!("rank {} received {} elements at offset {}", rank, inputs.len(), offset);
    Ok((chunk, inputs))
}

/// Send this rank's offset and outputs back to the coordinator.
pub fn return_chunk<C, O>(comm: &C, chunk: Chunk, outputs: &[O]) -> Result<()>
where
    C: Communicator,
    O: Serialize,
{
    comm.send(COORDINATOR_RANK, Channel::Control, &chunk.offset())?;
    comm.send(COORDINATOR_RANK, Channel::Bulk, outputs)?;
    log::debug!(
        "rank {} returned {} records at offset {}",
        comm.rank(),
        outputs.len(),
        chunk.offset()
    );
    Ok(())
}

/// Receive, compute and send one chunk.
///
/// The local aggregates are returned for the reduction that follows; they
/// do not travel with the outputs.
pub fn run_worker<C, K>(comm: &C, partition: &Partition, kernel: &K) -> Result<(Chunk, ChunkResult<K::Output>)>
where
    C: Communicator,
    K: Kernel,
{
    let (chunk, inputs) = receive_chunk::<C, K::Input>(comm, partition)?;
    let result = kernel.compute(chunk, &inputs);
    return_chunk(comm, chunk, &result.outputs)?;
    Ok((chunk, result))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comm::LocalWorld;
    use crate::kernel::NumericKernel;

    #[test]
    fn test_worker_round_trip() {
        let partition = Partition::new(6, 2).unwrap();
        let kernel = NumericKernel::default();
        let results = LocalWorld::launch(2, |comm| {
            if comm.rank() == 0 {
                comm.send(1, Channel::Control, &3usize)?;
                comm.send(1, Channel::Bulk, &vec![2u32, 4, 4])?;
                let offset: usize = comm.recv(1, Channel::Control)?;
                let outputs: Vec<crate::kernel::Classification> = comm.recv(1, Channel::Bulk)?;
                Ok((offset, outputs.iter().map(|c| c.frequency).collect::<Vec<_>>(), Vec::new()))
            } else {
                let (chunk, result) = run_worker(&comm, &partition, &kernel)?;
                Ok((chunk.offset(), Vec::new(), result.aggregates))
            }
        })
        .unwrap();

        assert_eq!(results[0], (3, vec![1, 2, 0], Vec::new()));
        // three evens, one prime
        assert_eq!(results[1].2, vec![3, 1]);
    }

    #[test]
    fn test_worker_rejects_foreign_offset() {
        let partition = Partition::new(4, 2).unwrap();
        let err = LocalWorld::launch(2, |comm| {
            if comm.rank() == 0 {
                comm.send(1, Channel::Control, &0usize)?;
                comm.send(1, Channel::Bulk, &vec![1u32, 2])?;
                Ok(())
            } else {
                receive_chunk::<_, u32>(&comm, &partition).map(|_| ())
            }
        })
        .unwrap_err();
        assert!(matches!(err, BatchError::OffsetMismatch { rank: 1, .. }));
    }

    #[test]
    fn test_worker_rejects_wrong_slice_length() {
        let partition = Partition::new(4, 2).unwrap();
        let err = LocalWorld::launch(2, |comm| {
            if comm.rank() == 0 {
                comm.send(1, Channel::Control, &2usize)?;
                comm.send(1, Channel::Bulk, &vec![1u32, 2, 3])?;
                Ok(())
            } else {
                receive_chunk::<_, u32>(&comm, &partition).map(|_| ())
            }
        })
        .unwrap_err();
        assert!(matches!(
            err,
            BatchError::LengthMismatch {
                rank: 1,
                expected: 2,
                actual: 3
            }
        ));
    }
}
