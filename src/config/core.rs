//! Run configuration and its builder.
//!
//! A [`Config`] describes one batch run: how many elements, how many
//! processes, which kernel and how the dataset is synthesized. It can be
//! loaded from a `.toml` or `.json` file and overridden from
//! `PARTITION_BATCH_*` environment variables.

use crate::core::constants::*;
use crate::core::error::{BatchError, Result};
use crate::core::types::{KernelKind, Value};
use crate::config_error;

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;

/// Configuration of one batch run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Number of dataset elements S
    pub dataset_size: usize,
    /// Number of cooperating processes P, coordinator included
    pub num_processes: usize,
    /// Kernel applied to every chunk
    pub kernel: KernelKind,
    /// Seed of dataset synthesis
    pub random_seed: u64,
    /// Smallest synthesized value (numeric kernel)
    pub value_min: Value,
    /// Largest synthesized value (numeric kernel)
    pub value_max: Value,
    /// Log verbosity: 0 = warn, 1 = info, 2+ = debug
    pub verbosity: u8,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            dataset_size: DEFAULT_DATASET_SIZE,
            num_processes: DEFAULT_NUM_PROCESSES,
            kernel: KernelKind::default(),
            random_seed: DEFAULT_RANDOM_SEED,
            value_min: DEFAULT_VALUE_MIN,
            value_max: DEFAULT_VALUE_MAX,
            verbosity: 0,
        }
    }
}

impl Config {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate the configuration parameters.
    ///
    /// Divisibility of `dataset_size` by `num_processes` is not checked here;
    /// every rank checks it when the run starts.
    pub fn validate(&self) -> Result<()> {
        if self.dataset_size == 0 {
            return Err(BatchError::invalid_parameter(
                "dataset_size",
                self.dataset_size.to_string(),
                "must be at least 1",
            ));
        }

        if self.num_processes == 0 {
            return Err(BatchError::invalid_parameter(
                "num_processes",
                self.num_processes.to_string(),
                "must be at least 1",
            ));
        }

        if self.value_min > self.value_max {
            return Err(BatchError::invalid_parameter(
                "value_min",
                self.value_min.to_string(),
                format!("must not exceed value_max ({})", self.value_max),
            ));
        }

        Ok(())
    }

    /// Elements per chunk, if the dataset divides evenly.
    pub fn chunk_size(&self) -> Option<usize> {
        (self.num_processes != 0 && self.dataset_size % self.num_processes == 0)
            .then(|| self.dataset_size / self.num_processes)
    }

    /// Load configuration from a `.toml` or `.json` file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            config_error!("Failed to read config file {}: {}", path.display(), e)
        })?;

        let config = match path.extension().and_then(|s| s.to_str()) {
            Some("json") => serde_json::from_str(&content)
                .map_err(|e| config_error!("Failed to parse JSON config: {}", e))?,
            Some("toml") => toml::from_str(&content)?,
            _ => {
                return Err(BatchError::config(
                    "Unsupported config file format. Use .json or .toml",
                ))
            }
        };

        log::debug!("loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Save configuration to a `.toml` or `.json` file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let content = match path.extension().and_then(|s| s.to_str()) {
            Some("json") => serde_json::to_string_pretty(self)?,
            Some("toml") => toml::to_string_pretty(self)
                .map_err(|e| config_error!("Failed to serialize to TOML: {}", e))?,
            _ => {
                return Err(BatchError::config(
                    "Unsupported config file format. Use .json or .toml",
                ))
            }
        };

        std::fs::write(path, content)?;
        Ok(())
    }

    /// Override fields from `PARTITION_BATCH_*` environment variables
    pub fn apply_environment_overrides(&mut self) -> Result<()> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Override fields from any variable lookup keyed by full variable name.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        override_field(&lookup, "DATASET_SIZE", &mut self.dataset_size)?;
        override_field(&lookup, "NUM_PROCESSES", &mut self.num_processes)?;
        override_field(&lookup, "KERNEL", &mut self.kernel)?;
        override_field(&lookup, "RANDOM_SEED", &mut self.random_seed)?;
        override_field(&lookup, "VALUE_MIN", &mut self.value_min)?;
        override_field(&lookup, "VALUE_MAX", &mut self.value_max)?;
        override_field(&lookup, "VERBOSITY", &mut self.verbosity)?;
        Ok(())
    }
}

fn override_field<F, T>(lookup: &F, name: &str, field: &mut T) -> Result<()>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    let key = format!("{}{}", ENV_PREFIX, name);
    if let Some(raw) = lookup(&key) {
        *field = raw
            .trim()
            .parse()
            .map_err(|_| config_error!("Invalid {}: {:?}", key, raw))?;
    }
    Ok(())
}

/// Configuration builder for fluent configuration creation
#[derive(Debug, Clone)]
pub struct ConfigBuilder {
    config: Config,
    validation_errors: Vec<String>,
}

impl ConfigBuilder {
    /// Create a new configuration builder
    pub fn new() -> Self {
        ConfigBuilder {
            config: Config::default(),
            validation_errors: Vec::new(),
        }
    }

    /// Set the dataset size
    pub fn dataset_size(mut self, size: usize) -> Self {
        if size == 0 {
            self.validation_errors
                .push("dataset_size must be at least 1".to_string());
        }
        self.config.dataset_size = size;
        self
    }

    /// Set the process count
    pub fn num_processes(mut self, processes: usize) -> Self {
        if processes == 0 {
            self.validation_errors
                .push("num_processes must be at least 1".to_string());
        }
        self.config.num_processes = processes;
        self
    }

    /// Set the kernel
    pub fn kernel(mut self, kernel: KernelKind) -> Self {
        self.config.kernel = kernel;
        self
    }

    /// Set the synthesis seed
    pub fn random_seed(mut self, seed: u64) -> Self {
        self.config.random_seed = seed;
        self
    }

    /// Set the inclusive range of synthesized values
    pub fn value_range(mut self, min: Value, max: Value) -> Self {
        if min > max {
            self.validation_errors
                .push(format!("value range {}..={} is empty", min, max));
        }
        self.config.value_min = min;
        self.config.value_max = max;
        self
    }

    /// Set the log verbosity
    pub fn verbosity(mut self, verbosity: u8) -> Self {
        self.config.verbosity = verbosity;
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<Config> {
        if !self.validation_errors.is_empty() {
            return Err(BatchError::config(format!(
                "Configuration validation failed: {}",
                self.validation_errors.join(", ")
            )));
        }

        self.config.validate()?;
        Ok(self.config)
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.dataset_size, 4000);
        assert_eq!(config.num_processes, 4);
        assert_eq!(config.kernel, KernelKind::Geometric);
        assert_eq!(config.chunk_size(), Some(1000));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = Config::default();
        config.dataset_size = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.value_min = 10;
        config.value_max = 5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_indivisible_config_is_still_valid() {
        let config = ConfigBuilder::new()
            .dataset_size(10)
            .num_processes(3)
            .build()
            .unwrap();
        assert_eq!(config.chunk_size(), None);
    }

    #[test]
    fn test_config_builder() {
        let config = ConfigBuilder::new()
            .dataset_size(12)
            .num_processes(3)
            .kernel(KernelKind::Numeric)
            .random_seed(7)
            .value_range(1, 9)
            .verbosity(2)
            .build()
            .unwrap();
        assert_eq!(config.chunk_size(), Some(4));
        assert_eq!(config.kernel, KernelKind::Numeric);
        assert_eq!((config.value_min, config.value_max), (1, 9));
    }

    #[test]
    fn test_config_builder_validation() {
        assert!(ConfigBuilder::new().num_processes(0).build().is_err());
        assert!(ConfigBuilder::new().value_range(5, 1).build().is_err());
    }

    #[test]
    fn test_overrides() {
        let vars: HashMap<&str, &str> = [
            ("PARTITION_BATCH_DATASET_SIZE", "24"),
            ("PARTITION_BATCH_KERNEL", "numeric"),
            ("PARTITION_BATCH_VALUE_MAX", " 50 "),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        config
            .apply_overrides(|key| vars.get(key).map(|v| v.to_string()))
            .unwrap();
        assert_eq!(config.dataset_size, 24);
        assert_eq!(config.kernel, KernelKind::Numeric);
        assert_eq!(config.value_max, 50);
        assert_eq!(config.num_processes, DEFAULT_NUM_PROCESSES);
    }

    #[test]
    fn test_invalid_override_is_rejected() {
        let mut config = Config::default();
        let err = config
            .apply_overrides(|key| (key == "PARTITION_BATCH_NUM_PROCESSES").then(|| "many".into()))
            .unwrap_err();
        assert!(err.to_string().contains("PARTITION_BATCH_NUM_PROCESSES"));
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: Config = toml::from_str("kernel = \"numeric\"\nnum_processes = 2\n").unwrap();
        assert_eq!(config.kernel, KernelKind::Numeric);
        assert_eq!(config.num_processes, 2);
        assert_eq!(config.dataset_size, DEFAULT_DATASET_SIZE);
    }
}
