//! Console service configuration

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Top-level configuration for the console service.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsoleConfig {
    /// Bind address
    pub address: String,
    /// Port
    pub port: u16,
    /// Backend SQL engine
    pub engine: EngineConfig,
}

/// Backend engine connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Base URL of the engine's HTTP API
    pub url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            address: "127.0.0.1".to_string(),
            port: 8080,
            engine: EngineConfig::default(),
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:9200".to_string(),
            timeout_secs: 60,
        }
    }
}

impl ConsoleConfig {
    /// Load configuration from a YAML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        let config: ConsoleConfig = serde_yaml::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.engine.url.is_empty() {
            return Err(ConfigError::Invalid("engine.url must not be empty".to_string()));
        }
        if self.engine.timeout_secs == 0 {
            return Err(ConfigError::Invalid("engine.timeout_secs must be positive".to_string()));
        }
        Ok(())
    }
}
