//! Configuration Module
//!
//! This module defines the configuration structures for batch receiving.
//! Configuration is loaded from TOML files and parsed using serde.

use serde::Deserialize;
use std::fs;
use std::time::Duration;
use thiserror::Error;

/// Default byte limit for a single batch (10 MiB)
pub const DEFAULT_MAX_NUM_BYTES: i64 = 10 * 1024 * 1024;

/// Default time to wait for a batch to fill up
pub const DEFAULT_TIMEOUT_MS: u64 = 100;

/// Errors raised while loading or validating configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("At least one of maxNumMessages, maxNumBytes, timeout must be specified.")]
    NoLimit,
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Main configuration structure
///
/// Loaded from a TOML file (e.g., config/default.toml).
/// Every section is optional and falls back to its defaults.
///
/// # Example TOML
/// ```toml
/// [batch_receive]
/// max_num_messages = 100
/// max_num_bytes = 1048576
/// timeout_ms = 200
///
/// [demo]
/// topic = "persistent://public/default/demo"
/// batches = 5
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub batch_receive: BatchReceivePolicy,
    pub demo: DemoConfig,
}

/// Limits applied to a single batch receive
///
/// # Fields
/// - `max_num_messages`: Maximum number of messages per batch (`<= 0` means unbounded)
/// - `max_num_bytes`: Maximum cumulative payload size per batch (`<= 0` means unbounded)
/// - `timeout_ms`: How long to wait for the batch to fill before returning what is there
///   (`0` means wait until a limit is reached)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct BatchReceivePolicy {
    pub max_num_messages: i32,
    pub max_num_bytes: i64,
    pub timeout_ms: u64,
}

impl Default for BatchReceivePolicy {
    fn default() -> Self {
        Self {
            max_num_messages: -1,
            max_num_bytes: DEFAULT_MAX_NUM_BYTES,
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }
}

impl BatchReceivePolicy {
    /// Creates a policy; a non-zero timeout is rounded up to whole milliseconds
    pub fn new(max_num_messages: i32, max_num_bytes: i64, timeout: Duration) -> Self {
        Self {
            max_num_messages,
            max_num_bytes,
            timeout_ms: timeout.as_nanos().div_ceil(1_000_000) as u64,
        }
    }

    /// Check that the policy can ever complete a batch
    pub fn verify(&self) -> Result<(), ConfigError> {
        if self.max_num_messages <= 0 && self.max_num_bytes <= 0 && self.timeout_ms == 0 {
            return Err(ConfigError::NoLimit);
        }
        Ok(())
    }

    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_ms > 0).then(|| Duration::from_millis(self.timeout_ms))
    }
}

/// Settings for the demo binary
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DemoConfig {
    /// Topic name stamped on generated messages
    pub topic: String,
    /// Number of batches to receive before exiting
    pub batches: usize,
    /// Delay between produced messages, in milliseconds
    pub publish_interval_ms: u64,
    /// Upper bound for generated payload sizes
    pub max_payload_bytes: usize,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            topic: "persistent://public/default/batch-receive".to_string(),
            batches: 10,
            publish_interval_ms: 5,
            max_payload_bytes: 512,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// # Arguments
    /// * `path` - Path to the TOML configuration file
    ///
    /// # Returns
    /// * `Ok(Config)` if the file was read, parsed and its batch policy verified
    /// * `Err` if the file couldn't be read, the TOML is invalid or no limit is set
    pub fn load(path: &str) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parse configuration from TOML text
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(content)?;
        config.batch_receive.verify()?;
        Ok(config)
    }
}
