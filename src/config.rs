//! Exporter configuration file.
//!
//! ```toml
//! [source]
//! file = "/tmp/iwstat"
//! # or: command = ["iwstat-dump", "--all"]
//!
//! [server]
//! listen = "0.0.0.0:9999"
//!
//! [metrics]
//! namespace = "iwstat"
//! labels = "interface-and-client"  # or "client-only"
//! ```

use crate::metrics::{LabelSchema, DEFAULT_NAMESPACE};
use crate::snapshot::SnapshotSource;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::Path;

/// Configuration validation errors.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfigError {
    #[error("metric namespace must not be empty")]
    EmptyNamespace,
    #[error("snapshot command must name a program")]
    EmptyCommand,
    #[error("failed to read config file: {0}")]
    FileReadError(String),
    #[error("failed to parse config file: {0}")]
    ParseError(String),
}

/// Full configuration file format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct FileConfig {
    /// Where snapshots are read from.
    #[serde(default)]
    pub source: SnapshotSource,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub metrics: MetricsConfig,
}

/// HTTP server configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address the scrape endpoint listens on.
    pub listen: SocketAddr,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: ([0, 0, 0, 0], 9999).into(),
        }
    }
}

/// Metric naming configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
    /// Prefix of every metric name.
    pub namespace: String,
    /// Label dimensions of client metrics.
    pub labels: LabelSchema,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            namespace: DEFAULT_NAMESPACE.to_string(),
            labels: LabelSchema::default(),
        }
    }
}

impl FileConfig {
    /// Loads configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::FileReadError(e.to_string()))?;
        Self::from_toml(&content)
    }

    /// Parses and validates configuration from TOML text.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: FileConfig =
            toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration.
    ///
    /// Metric name syntax is checked later, when metrics are declared.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.metrics.namespace.is_empty() {
            return Err(ConfigError::EmptyNamespace);
        }
        if matches!(&self.source, SnapshotSource::Command(argv) if argv.is_empty()) {
            return Err(ConfigError::EmptyCommand);
        }
        Ok(())
    }
}
