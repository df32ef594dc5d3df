//! Core infrastructure: fundamental types, constants, error handling and
//! logging set-up.
//!
//! ```rust
//! use partition_batch::core::{
//!     constants::DEFAULT_DATASET_SIZE,
//!     error::{BatchError, Result},
//!     types::{Triangle, Vertex},
//! };
//!
//! let tri = Triangle::new(Vertex::new(0.0, 1.0), Vertex::new(0.0, 0.0), Vertex::new(1.0, 0.0));
//! assert_eq!(tri.area(), 0.5);
//! assert_eq!(DEFAULT_DATASET_SIZE, 4000);
//! ```

pub mod constants;
pub mod error;
pub mod types;

pub use constants::*;
pub use error::{BatchError, Result};
pub use types::*;

use std::sync::Once;

static LOGGING_INIT: Once = Once::new();

/// Initialize the logging subsystem.
///
/// `verbosity` raises the default filter: 0 = warn, 1 = info, 2+ = debug.
/// `RUST_LOG` still wins when set. Repeated calls are no-ops.
pub fn initialize_logging(verbosity: u8) {
    LOGGING_INIT.call_once(|| {
        let default_filter = match verbosity {
            0 => "warn",
            1 => "info",
            _ => "debug",
        };
        let env = env_logger::Env::default().default_filter_or(default_filter);
        // a test harness or embedding binary may already own the logger
        let _ = env_logger::Builder::from_env(env)
            .format_timestamp(None)
            .try_init();
        log::debug!("logging initialized (verbosity {})", verbosity);
    });
}
