//! Configuration warnings.
//!
//! [`Config::validate`] rejects configurations that cannot run at all. The
//! [`ConfigValidator`] only looks at configurations that pass it, and warns
//! about those that will run badly or abort at run start.

use crate::config::core::Config;
use crate::core::constants::{DEFAULT_VALUE_MAX, DEFAULT_VALUE_MIN, LARGE_NUMERIC_CHUNK};
use crate::core::types::KernelKind;

use serde::{Deserialize, Serialize};
use std::fmt;

/// Validation warning structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationWarning {
    /// Parameter name
    pub parameter: String,
    /// Parameter value
    pub value: String,
    /// Warning message
    pub message: String,
    /// Suggested fix
    pub suggestion: Option<String>,
}

impl fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Parameter '{}' = '{}': {}", self.parameter, self.value, self.message)?;
        if let Some(ref suggestion) = self.suggestion {
            write!(f, " ({})", suggestion)?;
        }
        Ok(())
    }
}

/// Validation rule trait
pub trait ValidationRule: Send + Sync {
    /// Rule name
    fn name(&self) -> &'static str;

    /// Warnings for a configuration that passed [`Config::validate`]
    fn validate(&self, config: &Config) -> Vec<ValidationWarning>;
}

/// Configuration validator
pub struct ConfigValidator {
    rules: Vec<Box<dyn ValidationRule>>,
}

impl fmt::Debug for ConfigValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.rules.iter().map(|rule| rule.name()).collect();
        f.debug_struct("ConfigValidator").field("rules", &names).finish()
    }
}

impl Default for ConfigValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigValidator {
    /// Create a validator with the built-in rules
    pub fn new() -> Self {
        ConfigValidator {
            rules: vec![
                Box::new(SizeRule),
                Box::new(ValueRangeRule),
                Box::new(PartitionRule),
                Box::new(NumericChunkRule),
            ],
        }
    }

    /// Add custom validation rule
    pub fn add_rule(mut self, rule: Box<dyn ValidationRule>) -> Self {
        self.rules.push(rule);
        self
    }

    /// Run every rule and collect the warnings
    pub fn validate(&self, config: &Config) -> Vec<ValidationWarning> {
        self.rules
            .iter()
            .flat_map(|rule| {
                let results = rule.validate(config);
                if !results.is_empty() {
                    log::debug!("rule '{}' reported {} finding(s)", rule.name(), results.len());
                }
                results
            })
            .collect()
    }
}

struct SizeRule;

impl ValidationRule for SizeRule {
    fn name(&self) -> &'static str {
        "sizes"
    }

    fn validate(&self, config: &Config) -> Vec<ValidationWarning> {
        if config.num_processes <= config.dataset_size {
            return Vec::new();
        }
        vec![ValidationWarning {
            parameter: "num_processes".to_string(),
            value: config.num_processes.to_string(),
            message: "More processes than elements".to_string(),
            suggestion: Some("Use at most dataset_size processes".to_string()),
        }]
    }
}

struct ValueRangeRule;

impl ValidationRule for ValueRangeRule {
    fn name(&self) -> &'static str {
        "value_range"
    }

    fn validate(&self, config: &Config) -> Vec<ValidationWarning> {
        let custom_range = (config.value_min, config.value_max) != (DEFAULT_VALUE_MIN, DEFAULT_VALUE_MAX);
        if config.kernel == KernelKind::Geometric && custom_range {
            return vec![ValidationWarning {
                parameter: "value_range".to_string(),
                value: format!("{}..={}", config.value_min, config.value_max),
                message: "Ignored by the geometric kernel".to_string(),
                suggestion: None,
            }];
        }
        Vec::new()
    }
}

/// Divisibility is checked by every rank at run start; here it only warns.
struct PartitionRule;

impl ValidationRule for PartitionRule {
    fn name(&self) -> &'static str {
        "partition"
    }

    fn validate(&self, config: &Config) -> Vec<ValidationWarning> {
        if config.num_processes == 0 || config.chunk_size().is_some() {
            return Vec::new();
        }
        vec![ValidationWarning {
            parameter: "dataset_size".to_string(),
            value: config.dataset_size.to_string(),
            message: format!("Not divisible by num_processes ({}); the run will abort", config.num_processes),
            suggestion: Some("Pick a process count that divides the dataset size".to_string()),
        }]
    }
}

/// The chunk-local frequency scan is quadratic in the chunk size.
struct NumericChunkRule;

impl ValidationRule for NumericChunkRule {
    fn name(&self) -> &'static str {
        "numeric_chunk"
    }

    fn validate(&self, config: &Config) -> Vec<ValidationWarning> {
        match config.chunk_size() {
            Some(chunk) if config.kernel == KernelKind::Numeric && chunk > LARGE_NUMERIC_CHUNK => {
                vec![ValidationWarning {
                    parameter: "dataset_size".to_string(),
                    value: config.dataset_size.to_string(),
                    message: format!("Numeric chunks of {} elements make the frequency scan slow", chunk),
                    suggestion: Some("Use more processes".to_string()),
                }]
            }
            _ => Vec::new(),
        }
    }
}
