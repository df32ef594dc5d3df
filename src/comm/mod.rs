//! Blocking point-to-point messaging between ranks.
//!
//! A [`Communicator`] moves opaque byte payloads between ranks on a named
//! [`Channel`]. Within one (sender, receiver, channel) triple messages arrive
//! in send order; nothing is implied across channels, so every receive names
//! the channel it expects. Typed values are encoded with bincode.

pub mod collective;
pub mod local;

pub use collective::reduce_sum;
pub use local::{LocalCommunicator, LocalWorld};

use crate::core::error::Result;
use crate::core::types::Rank;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Logical channel a message travels on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Channel {
    /// Scalar control values (chunk offsets)
    Control,
    /// Element payloads (input and output slices)
    Bulk,
    /// Collective reduction contributions
    Reduce,
}

impl Channel {
    /// Every channel a world wires up.
    pub const ALL: [Channel; 3] = [Channel::Control, Channel::Bulk, Channel::Reduce];
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Channel::Control => write!(f, "control"),
            Channel::Bulk => write!(f, "bulk"),
            Channel::Reduce => write!(f, "reduce"),
        }
    }
}

/// One endpoint of a world of cooperating ranks.
pub trait Communicator {
    /// Rank of this endpoint.
    fn rank(&self) -> Rank;

    /// Number of ranks in the world.
    fn size(&self) -> usize;

    /// Hand `payload` to the transport for delivery to `dest` on `channel`.
    fn send_bytes(&self, dest: Rank, channel: Channel, payload: Vec<u8>) -> Result<()>;

    /// Block until the next message from `source` on `channel` arrives.
    fn recv_bytes(&self, source: Rank, channel: Channel) -> Result<Vec<u8>>;

    /// Encode `value` and send it.
    fn send<T: Serialize + ?Sized>(&self, dest: Rank, channel: Channel, value: &T) -> Result<()> {
        self.send_bytes(dest, channel, encode(value)?)
    }

    /// Receive and decode one value.
    fn recv<T: DeserializeOwned>(&self, source: Rank, channel: Channel) -> Result<T> {
        let payload = self.recv_bytes(source, channel)?;
        decode(&payload)
    }
}

/// Encode a value into a wire payload.
pub fn encode<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>> {
    Ok(bincode::serialize(value)?)
}

/// Decode a wire payload.
pub fn decode<T: DeserializeOwned>(payload: &[u8]) -> Result<T> {
    Ok(bincode::deserialize(payload)?)
}
