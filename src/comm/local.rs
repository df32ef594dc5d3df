//! In-process runtime: launches the ranks of a world as OS threads.
//!
//! Ranks share no data. The world is a star: every rank is linked to one hub
//! rank, and each (source, destination, channel) triple on a spoke gets its
//! own FIFO link that only encoded payloads cross. Dropping an endpoint
//! closes its links, so a peer blocked on a receive from it fails with
//! [`BatchError::Disconnected`] instead of waiting forever.

use super::{Channel, Communicator};
use crate::core::constants::COORDINATOR_RANK;
use crate::core::error::{BatchError, Result};
use crate::core::types::Rank;
use std::collections::HashMap;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;

type Link = (Rank, Channel);

/// Endpoint of one rank in a [`LocalWorld`].
#[derive(Debug)]
pub struct LocalCommunicator {
    rank: Rank,
    size: usize,
    outbound: HashMap<Link, Sender<Vec<u8>>>,
    inbound: HashMap<Link, Receiver<Vec<u8>>>,
}

impl LocalCommunicator {
    fn check_peer(&self, peer: Rank) -> Result<()> {
        if peer >= self.size || peer == self.rank {
            return Err(BatchError::InvalidRank {
                rank: peer,
                size: self.size,
            });
        }
        Ok(())
    }
}

impl Communicator for LocalCommunicator {
    fn rank(&self) -> Rank {
        self.rank
    }

    fn size(&self) -> usize {
        self.size
    }

    fn send_bytes(&self, dest: Rank, channel: Channel, payload: Vec<u8>) -> Result<()> {
        self.check_peer(dest)?;
        let link = self
            .outbound
            .get(&(dest, channel))
            .ok_or_else(|| {
                BatchError::internal(format!("rank {} has no {} link to rank {}", self.rank, channel, dest))
            })?;
        log::trace!(
            "rank {} -> rank {} [{}]: {} bytes",
            self.rank,
            dest,
            channel,
            payload.len()
        );
        link.send(payload)
            .map_err(|_| BatchError::disconnected(dest, channel))
    }

    fn recv_bytes(&self, source: Rank, channel: Channel) -> Result<Vec<u8>> {
        self.check_peer(source)?;
        let link = self
            .inbound
            .get(&(source, channel))
            .ok_or_else(|| {
                BatchError::internal(format!("rank {} has no {} link from rank {}", self.rank, channel, source))
            })?;
        let payload = link
            .recv()
            .map_err(|_| BatchError::disconnected(source, channel))?;
        log::trace!(
            "rank {} <- rank {} [{}]: {} bytes",
            self.rank,
            source,
            channel,
            payload.len()
        );
        Ok(payload)
    }
}

/// A world of `size` endpoints wired as a star around one hub rank.
#[derive(Debug)]
pub struct LocalWorld {
    endpoints: Vec<LocalCommunicator>,
}

impl LocalWorld {
    /// Star world around [`COORDINATOR_RANK`].
    pub fn new(size: usize) -> Result<Self> {
        Self::with_hub(size, COORDINATOR_RANK)
    }

    /// Wire one link per channel in each direction between `hub` and every
    /// other rank.
    ///
    /// Ranks other than the hub have no link to each other; messaging
    /// between two of them fails with an internal error.
    pub fn with_hub(size: usize, hub: Rank) -> Result<Self> {
        if size == 0 {
            return Err(BatchError::invalid_parameter(
                "num_processes",
                "0",
                "a world needs at least one rank",
            ));
        }
        if hub >= size {
            return Err(BatchError::InvalidRank { rank: hub, size });
        }

        let mut endpoints: Vec<LocalCommunicator> = (0..size)
            .map(|rank| LocalCommunicator {
                rank,
                size,
                outbound: HashMap::new(),
                inbound: HashMap::new(),
            })
            .collect();

        for peer in (0..size).filter(|&peer| peer != hub) {
            for channel in Channel::ALL {
                connect(&mut endpoints, hub, peer, channel);
                connect(&mut endpoints, peer, hub, channel);
            }
        }

        Ok(LocalWorld { endpoints })
    }

    /// Number of ranks.
    pub fn size(&self) -> usize {
        self.endpoints.len()
    }

    /// Take the endpoints, in rank order.
    pub fn into_endpoints(self) -> Vec<LocalCommunicator> {
        self.endpoints
    }

    /// Run `body` once per rank of a star world around
    /// [`COORDINATOR_RANK`], each on its own thread, and wait for all.
    ///
    /// Results come back in rank order. If any rank fails, the run fails; a
    /// root-cause error is preferred over the disconnections it triggers on
    /// the other ranks.
    pub fn launch<F, R>(size: usize, body: F) -> Result<Vec<R>>
    where
        F: Fn(LocalCommunicator) -> Result<R> + Sync,
        R: Send,
    {
        Self::new(size)?.run(body)
    }

    /// Like [`LocalWorld::launch`], with the star centred on `hub`.
    pub fn launch_with_hub<F, R>(size: usize, hub: Rank, body: F) -> Result<Vec<R>>
    where
        F: Fn(LocalCommunicator) -> Result<R> + Sync,
        R: Send,
    {
        Self::with_hub(size, hub)?.run(body)
    }

    fn run<F, R>(self, body: F) -> Result<Vec<R>>
    where
        F: Fn(LocalCommunicator) -> Result<R> + Sync,
        R: Send,
    {
        let size = self.size();
        let endpoints = self.into_endpoints();
        let body = &body;

        let outcomes: Vec<Result<R>> = thread::scope(|scope| {
            let mut handles = Vec::with_capacity(size);
            for comm in endpoints {
                let rank = comm.rank();
                let handle = thread::Builder::new()
                    .name(format!("rank-{}", rank))
                    .spawn_scoped(scope, move || body(comm));
                match handle {
                    Ok(handle) => handles.push((rank, RankHandle::Running(handle))),
                    Err(err) => {
                        // endpoints not yet spawned are dropped here, which
                        // unblocks the ranks already running
                        log::error!("failed to spawn rank {}: {}", rank, err);
                        handles.push((rank, RankHandle::FailedToSpawn(err)));
                        break;
                    }
                }
            }
            handles
                .into_iter()
                .map(|(rank, handle)| handle.join(rank))
                .collect()
        });

        let mut results = Vec::with_capacity(outcomes.len());
        let mut errors = Vec::new();
        for (rank, outcome) in outcomes.into_iter().enumerate() {
            match outcome {
                Ok(value) => results.push(value),
                Err(err) => {
                    log::debug!("rank {} failed: {}", rank, err);
                    errors.push(err);
                }
            }
        }

        if errors.is_empty() {
            return Ok(results);
        }
        let root_cause = errors
            .iter()
            .position(|err| !matches!(err, BatchError::Disconnected { .. }))
            .unwrap_or(0);
        Err(errors.swap_remove(root_cause))
    }
}

fn connect(endpoints: &mut [LocalCommunicator], source: Rank, dest: Rank, channel: Channel) {
    let (tx, rx) = mpsc::channel();
    endpoints[source].outbound.insert((dest, channel), tx);
    endpoints[dest].inbound.insert((source, channel), rx);
}

/// Joinable stand-in for a rank thread.
enum RankHandle<'scope, R> {
    Running(thread::ScopedJoinHandle<'scope, Result<R>>),
    FailedToSpawn(std::io::Error),
}

impl<'scope, R> RankHandle<'scope, R> {
    fn join(self, rank: Rank) -> Result<R> {
        match self {
            RankHandle::Running(handle) => handle
                .join()
                .map_err(|_| BatchError::internal(format!("rank {} panicked", rank)))?,
            RankHandle::FailedToSpawn(err) => Err(err.into()),
        }
    }
}
