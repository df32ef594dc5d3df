//! Configuration management for partition-batch runs.
//!
//! Precedence, lowest first: defaults, configuration file, `PARTITION_BATCH_*`
//! environment variables, command line flags.

pub mod core;
pub mod validation;

pub use self::core::{Config, ConfigBuilder};
pub use validation::{ConfigValidator, ValidationRule, ValidationWarning};

use crate::core::error::Result;

/// Reject configurations that cannot run, then log and return the
/// [`ConfigValidator`] warnings for the rest.
pub fn check(config: &Config) -> Result<Vec<ValidationWarning>> {
    config.validate()?;
    let warnings = ConfigValidator::new().validate(config);
    for warning in &warnings {
        log::warn!("{}", warning);
    }
    Ok(warnings)
}
