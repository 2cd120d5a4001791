//! Static board configuration.

use crate::matrix::{ChainOrder, MatrixLayout};
use crate::{Result, DEFAULT_DEBOUNCE_MS, DEFAULT_INTENSITY};
use serde::{Deserialize, Serialize};

/// Board configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableConfig {
    /// Button debounce interval in milliseconds
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u16,

    /// LED matrix configuration
    #[serde(default)]
    pub matrix: MatrixConfig,
}

/// LED matrix chain configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatrixConfig {
    /// Number of 8x8 segments across
    #[serde(default = "default_segments")]
    pub segments_wide: usize,

    /// Number of 8x8 segments down
    #[serde(default = "default_segments")]
    pub segments_high: usize,

    /// Wiring order of the chain
    #[serde(default)]
    pub order: ChainOrder,

    /// Brightness (0-15)
    #[serde(default = "default_intensity")]
    pub intensity: u8,
}

impl MatrixConfig {
    /// Builds the chain geometry.
    pub fn layout(&self) -> Result<MatrixLayout> {
        MatrixLayout::new(self.segments_wide, self.segments_high, self.order)
    }
}

impl Default for MatrixConfig {
    fn default() -> Self {
        Self {
            segments_wide: default_segments(),
            segments_high: default_segments(),
            order: ChainOrder::default(),
            intensity: default_intensity(),
        }
    }
}

// Default value functions
fn default_debounce_ms() -> u16 {
    DEFAULT_DEBOUNCE_MS
}

fn default_segments() -> usize {
    2
}

fn default_intensity() -> u8 {
    DEFAULT_INTENSITY
}

impl TableConfig {
    /// Parses configuration from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            matrix: MatrixConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = TableConfig::from_toml_str("").unwrap();
        assert_eq!(config, TableConfig::default());
        assert_eq!(config.debounce_ms, 200);
        assert_eq!(config.matrix.intensity, 8);
        assert_eq!(config.matrix.layout().unwrap(), MatrixLayout::default());
    }

    #[test]
    fn test_partial_config() {
        let config = TableConfig::from_toml_str(
            r#"
            debounce_ms = 50

            [matrix]
            segments_wide = 4
            order = "serpentine"
            "#,
        )
        .unwrap();
        assert_eq!(config.debounce_ms, 50);
        assert_eq!(config.matrix.segments_wide, 4);
        assert_eq!(config.matrix.segments_high, 2);
        assert_eq!(config.matrix.order, ChainOrder::Serpentine);
    }

    #[test]
    fn test_invalid_config() {
        assert!(matches!(
            TableConfig::from_toml_str("debounce_ms = \"fast\""),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            TableConfig::from_toml_str("[matrix]\norder = \"zigzag\""),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_zero_segments_rejected_at_layout() {
        let config = TableConfig::from_toml_str("[matrix]\nsegments_high = 0").unwrap();
        assert!(config.matrix.layout().is_err());
    }
}
