//! System constants and default configuration values.

use crate::core::types::*;

/// Rank that owns chunk 0 and runs dispatch, gather, reduction and report.
pub const COORDINATOR_RANK: Rank = 0;

/// Default number of dataset elements.
pub const DEFAULT_DATASET_SIZE: usize = 4000;

/// Default number of cooperating processes, coordinator included.
pub const DEFAULT_NUM_PROCESSES: usize = 4;

/// Default seed for dataset synthesis.
pub const DEFAULT_RANDOM_SEED: u64 = 42;

/// Default lower bound (inclusive) of synthesized numeric values.
pub const DEFAULT_VALUE_MIN: Value = 0;

/// Default upper bound (inclusive) of synthesized numeric values.
pub const DEFAULT_VALUE_MAX: Value = 100;

/// Chunk length above which the quadratic chunk-local frequency scan
/// earns a validation warning.
pub const LARGE_NUMERIC_CHUNK: usize = 50_000;

/// Separator printed between geometric report entries.
pub const REPORT_SEPARATOR: &str = "-----------------------";

/// Slope of the hypotenuse the geometric kernel inscribes triangles in.
pub const HYPOTENUSE_SLOPE: f32 = -2.0;

/// Intercept of the hypotenuse the geometric kernel inscribes triangles in.
pub const HYPOTENUSE_INTERCEPT: f32 = 2.0;

/// Environment variable prefix for configuration overrides.
pub const ENV_PREFIX: &str = "PARTITION_BATCH_";

/// Crate version string.
pub const PARTITION_BATCH_VERSION: &str = env!("CARGO_PKG_VERSION");
