//! Configuration management.

use anyhow::{Context, Result};
use ict_hw::TableConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Button poll interval in milliseconds
    #[serde(default = "default_poll")]
    pub poll_ms: u64,

    /// Board configuration
    #[serde(default)]
    pub table: TableConfig,
}

fn default_poll() -> u64 {
    50
}

impl Config {
    /// Loads configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content =
            std::fs::read_to_string(path.as_ref()).context("Failed to read configuration file")?;
        let config: Config = toml::from_str(&content).context("Failed to parse configuration")?;
        config.validate()?;
        Ok(config)
    }

    /// Checks values that parse but cannot run.
    pub fn validate(&self) -> Result<()> {
        if self.poll_ms == 0 {
            anyhow::bail!("poll_ms must be at least 1");
        }
        self.table
            .matrix
            .layout()
            .context("Invalid matrix configuration")?;
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            poll_ms: default_poll(),
            table: TableConfig::default(),
        }
    }
}
