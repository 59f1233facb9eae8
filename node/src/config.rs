//! Node configuration with TOML file support.

use std::path::Path;

use serde::{Deserialize, Serialize};

use oracle_types::Params;

use crate::logging::LogFormat;
use crate::NodeError;

/// Configuration for an oracle node.
///
/// Can be loaded from a TOML file via [`NodeConfig::from_toml_file`] or
/// built programmatically (e.g. for tests).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeConfig {
    /// Height of the first block the node processes.
    #[serde(default)]
    pub initial_height: u64,

    /// Log format: "human" or "json".
    #[serde(default)]
    pub log_format: LogFormat,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Size of the active validator set used by the in-memory staking registry.
    #[serde(default = "default_max_validators")]
    pub max_validators: u32,

    /// Tokens per unit of consensus power for the in-memory staking registry.
    #[serde(default = "default_power_reduction")]
    pub power_reduction: u64,

    /// Genesis oracle parameters.
    #[serde(default)]
    pub oracle: Params,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_log_level() -> String {
    "info".to_string()
}

fn default_max_validators() -> u32 {
    100
}

fn default_power_reduction() -> u64 {
    1_000_000
}

// ── Impl ───────────────────────────────────────────────────────────────

impl NodeConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, NodeError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string and validate it.
    pub fn from_toml_str(s: &str) -> Result<Self, NodeError> {
        let config: Self = toml::from_str(s).map_err(|e| NodeError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> Result<String, NodeError> {
        toml::to_string_pretty(self).map_err(|e| NodeError::Config(e.to_string()))
    }

    pub fn validate(&self) -> Result<(), NodeError> {
        if self.max_validators == 0 {
            return Err(NodeError::Config("max_validators must be > 0".to_string()));
        }
        if self.power_reduction == 0 {
            return Err(NodeError::Config("power_reduction must be > 0".to_string()));
        }
        self.oracle
            .validate()
            .map_err(|e| NodeError::Config(e.to_string()))
    }
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            initial_height: 0,
            log_format: LogFormat::default(),
            log_level: default_log_level(),
            max_validators: default_max_validators(),
            power_reduction: default_power_reduction(),
            oracle: Params::default(),
        }
    }
}
