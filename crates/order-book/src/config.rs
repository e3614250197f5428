use std::path::Path;

use costscope_core::{HISTORY_SIZE, Quantity, Side};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Processor tuning. Every field is optional in the JSON form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessorConfig {
    /// Snapshots retained for the maker/taker scan
    pub history_size: usize,
    /// Probe size for the impact/slippage values published on every update
    pub reference_quantity: Quantity,
    pub reference_side: Side,
    /// Samples kept per operation by the latency monitor
    pub latency_history_size: usize,
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        ProcessorConfig {
            history_size: HISTORY_SIZE,
            reference_quantity: Decimal::ONE_HUNDRED,
            reference_side: Side::Buy,
            latency_history_size: HISTORY_SIZE,
        }
    }
}

impl ProcessorConfig {
    pub fn with_history_size(mut self, history_size: usize) -> Self {
        self.history_size = history_size;
        self
    }

    pub fn with_reference(mut self, quantity: Quantity, side: Side) -> Self {
        self.reference_quantity = quantity;
        self.reference_side = side;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.history_size == 0 {
            return Err(ConfigError::Invalid("history_size must be at least 1".into()));
        }
        if self.latency_history_size == 0 {
            return Err(ConfigError::Invalid(
                "latency_history_size must be at least 1".into(),
            ));
        }
        if self.reference_quantity <= Decimal::ZERO {
            return Err(ConfigError::Invalid(format!(
                "reference_quantity must be positive, got {}",
                self.reference_quantity
            )));
        }
        Ok(())
    }
}

/// Load and validate processor configuration from a JSON file
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<ProcessorConfig, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    load_config_from_str(&content)
}

/// Load and validate configuration from a JSON string
pub fn load_config_from_str(json: &str) -> Result<ProcessorConfig, ConfigError> {
    let config: ProcessorConfig = serde_json::from_str(json)?;
    config.validate()?;
    Ok(config)
}

/// Load the default embedded configuration
pub fn load_default_config() -> Result<ProcessorConfig, ConfigError> {
    load_config_from_str(include_str!("processor_config.json"))
}
