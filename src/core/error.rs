//! Error handling and error types for partition-batch.
//!
//! Every failure a run can hit is fatal: there is no retry and no partial
//! result. The variants exist so that the one validated precondition (the
//! divisibility check) and the protocol consistency checks report precisely
//! what went wrong before the run is torn down.

use crate::comm::Channel;
use crate::core::types::Rank;
use std::io;
use thiserror::Error;

/// Main error type for the crate.
#[derive(Error, Debug)]
pub enum BatchError {
    /// Dataset size is not divisible by the process count
    #[error("Array size of {dataset_size} must be divisible by world size {num_processes}")]
    Partition {
        /// Dataset size S
        dataset_size: usize,
        /// Process count P
        num_processes: usize,
    },

    /// A received offset differs from the one assigned to that rank
    #[error("Offset mismatch from rank {rank}: expected {expected}, got {actual}")]
    OffsetMismatch {
        /// Rank that reported the offset
        rank: Rank,
        /// Offset the partition assigns to that rank
        expected: usize,
        /// Offset actually received
        actual: usize,
    },

    /// A received slice does not have chunk length
    #[error("Payload length mismatch from rank {rank}: expected {expected}, got {actual}")]
    LengthMismatch {
        /// Rank that sent the payload
        rank: Rank,
        /// Chunk size
        expected: usize,
        /// Number of elements received
        actual: usize,
    },

    /// A dataset index was written twice
    #[error("Index {index} written more than once")]
    DuplicateWrite {
        /// The offending index
        index: usize,
    },

    /// The merged output still has unwritten indices
    #[error("Output incomplete: {missing} indices never written")]
    IncompleteOutput {
        /// Number of unwritten indices
        missing: usize,
    },

    /// The peer endpoint went away while a transfer was pending
    #[error("Peer rank {peer} disconnected on {channel} channel")]
    Disconnected {
        /// Peer rank
        peer: Rank,
        /// Channel of the pending transfer
        channel: Channel,
    },

    /// Rank outside the world
    #[error("Invalid rank {rank} for world of size {size}")]
    InvalidRank {
        /// Requested rank
        rank: Rank,
        /// World size
        size: usize,
    },

    /// Configuration and validation errors
    #[error("Configuration error: {message}")]
    Config {
        /// Description
        message: String,
    },

    /// Invalid input parameters
    #[error("Invalid parameter: {parameter} = {value}, {reason}")]
    InvalidParameter {
        /// Parameter name
        parameter: String,
        /// Offending value
        value: String,
        /// Why it is rejected
        reason: String,
    },

    /// Payload encoding errors
    #[error("Codec error: {source}")]
    Codec {
        /// Underlying bincode error
        #[from]
        source: bincode::Error,
    },

    /// File I/O errors
    #[error("I/O error: {source}")]
    IO {
        /// Underlying I/O error
        #[from]
        source: io::Error,
    },

    /// JSON errors
    #[error("JSON error: {source}")]
    Json {
        /// Underlying serde_json error
        #[from]
        source: serde_json::Error,
    },

    /// Internal errors (should not occur in normal usage)
    #[error("Internal error: {message}")]
    Internal {
        /// Description
        message: String,
    },
}

/// Type alias for Results using BatchError
pub type Result<T> = std::result::Result<T, BatchError>;

impl BatchError {
    /// Create a divisibility error
    pub fn partition(dataset_size: usize, num_processes: usize) -> Self {
        BatchError::Partition {
            dataset_size,
            num_processes,
        }
    }

    /// Create a configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        BatchError::Config {
            message: message.into(),
        }
    }

    /// Create an invalid parameter error
    pub fn invalid_parameter<P, V, R>(parameter: P, value: V, reason: R) -> Self
    where
        P: Into<String>,
        V: Into<String>,
        R: Into<String>,
    {
        BatchError::InvalidParameter {
            parameter: parameter.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a disconnection error
    pub fn disconnected(peer: Rank, channel: Channel) -> Self {
        BatchError::Disconnected { peer, channel }
    }

    /// Create an internal error (should be used sparingly)
    pub fn internal<S: Into<String>>(message: S) -> Self {
        BatchError::Internal {
            message: message.into(),
        }
    }

    /// True for errors raised by the protocol consistency checks.
    pub fn is_protocol_violation(&self) -> bool {
        matches!(
            self,
            BatchError::OffsetMismatch { .. }
                | BatchError::LengthMismatch { .. }
                | BatchError::DuplicateWrite { .. }
                | BatchError::IncompleteOutput { .. }
        )
    }

    /// Get error category for logging
    pub fn category(&self) -> &'static str {
        match self {
            BatchError::Partition { .. } => "partition",
            BatchError::OffsetMismatch { .. } => "offset_mismatch",
            BatchError::LengthMismatch { .. } => "length_mismatch",
            BatchError::DuplicateWrite { .. } => "duplicate_write",
            BatchError::IncompleteOutput { .. } => "incomplete_output",
            BatchError::Disconnected { .. } => "disconnected",
            BatchError::InvalidRank { .. } => "invalid_rank",
            BatchError::Config { .. } => "config",
            BatchError::InvalidParameter { .. } => "invalid_parameter",
            BatchError::Codec { .. } => "codec",
            BatchError::IO { .. } => "io",
            BatchError::Json { .. } => "json",
            BatchError::Internal { .. } => "internal",
        }
    }
}

impl From<toml::de::Error> for BatchError {
    fn from(err: toml::de::Error) -> Self {
        BatchError::config(format!("Failed to parse TOML config: {}", err))
    }
}

/// Convenience macro for configuration errors
#[macro_export]
macro_rules! config_error {
    ($msg:expr) => {
        $crate::core::error::BatchError::config($msg)
    };
    ($fmt:expr, $($arg:tt)*) => {
        $crate::core::error::BatchError::config(format!($fmt, $($arg)*))
    };
}
