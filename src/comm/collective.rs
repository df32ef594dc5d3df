//! Collective operations built on point-to-point messaging.
//!
//! Collectives are barriers: every rank of the world must make the matching
//! call, in the same order, or the run blocks. Contributions travel on
//! [`Channel::Reduce`] so they never interleave with dispatch traffic.

use super::{Channel, Communicator};
use crate::core::error::{BatchError, Result};
use crate::core::types::Rank;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::ops::AddAssign;

/// Sum one scalar per rank at `root`.
///
/// The root receives every other rank's contribution in ascending rank
/// order and returns `Some(total)`; every other rank sends its value and
/// returns `None`. Only links between `root` and the other ranks are used.
pub fn reduce_sum<C, T>(comm: &C, local: T, root: Rank) -> Result<Option<T>>
where
    C: Communicator,
    T: Copy + AddAssign + Serialize + DeserializeOwned,
{
    let size = comm.size();
    if root >= size {
        return Err(BatchError::InvalidRank { rank: root, size });
    }

    if comm.rank() != root {
        comm.send(root, Channel::Reduce, &local)?;
        return Ok(None);
    }

    let mut total = local;
    for source in (0..size).filter(|&source| source != root) {
        let contribution: T = comm.recv(source, Channel::Reduce)?;
        total += contribution;
    }
    Ok(Some(total))
}

/// Sum each position of `local` across ranks at `root`, one reduction per
/// position, in index order.
pub fn reduce_sum_each<C, T>(comm: &C, local: &[T], root: Rank) -> Result<Option<Vec<T>>>
where
    C: Communicator,
    T: Copy + AddAssign + Serialize + DeserializeOwned,
{
    let mut totals = Vec::with_capacity(local.len());
    for &value in local {
        if let Some(total) = reduce_sum(comm, value, root)? {
            totals.push(total);
        }
    }
    Ok((comm.rank() == root).then_some(totals))
}
