//! Configuration management for LineScreen
//!
//! This module provides type-safe configuration for the spatial index
//! with validation and default values.

use crate::error::{LineScreenError, Result};
use crate::traits::{Serializable, Validatable};
use serde::{Deserialize, Serialize};

/// Spatial index configuration
///
/// Controls quadtree subdivision and the swept-AABB expansion policy.
/// The same configuration must be in effect for the build and the query
/// of any one index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexConfig {
    /// Upper bound on subdivision depth
    pub max_depth: u32,

    /// Leaf occupancy above which a cell subdivides
    ///
    /// A large threshold is intentional: clustered inputs otherwise pile
    /// into a handful of leaves that cannot split past `min_cell_size`.
    pub max_lines_per_node: usize,

    /// Smallest permitted cell side; no smaller cell is ever produced
    pub min_cell_size: f64,

    /// Relative-motion expansion factor (recommended range 0.2-0.5)
    pub k_rel: f64,

    /// Cell-gap expansion factor (recommended range 0.1-0.2)
    pub k_gap: f64,

    /// Absolute padding absorbing floating-point jitter
    pub eps_prec: f64,

    /// When true, the index tallies node/leaf/depth/occupancy statistics
    pub enable_debug_stats: bool,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            max_depth: 12,
            max_lines_per_node: 32,
            min_cell_size: 1e-3,
            k_rel: 0.3,
            k_gap: 0.15,
            eps_prec: 1e-6,
            enable_debug_stats: false,
        }
    }
}

impl Validatable for IndexConfig {
    fn validate(&self) -> Result<()> {
        if self.max_depth == 0 {
            return Err(LineScreenError::validation_field(
                "Max depth must be greater than 0",
                "max_depth",
            ));
        }

        if self.max_lines_per_node == 0 {
            return Err(LineScreenError::validation_field(
                "Max lines per node must be greater than 0",
                "max_lines_per_node",
            ));
        }

        if self.min_cell_size <= 0.0 || !self.min_cell_size.is_finite() {
            return Err(LineScreenError::validation_field(
                "Min cell size must be positive and finite",
                "min_cell_size",
            ));
        }

        if self.k_rel < 0.0 || !self.k_rel.is_finite() {
            return Err(LineScreenError::validation_field(
                "Relative-motion factor must be non-negative and finite",
                "k_rel",
            ));
        }

        if self.k_gap < 0.0 || !self.k_gap.is_finite() {
            return Err(LineScreenError::validation_field(
                "Cell-gap factor must be non-negative and finite",
                "k_gap",
            ));
        }

        if self.eps_prec < 0.0 || !self.eps_prec.is_finite() {
            return Err(LineScreenError::validation_field(
                "Precision padding must be non-negative and finite",
                "eps_prec",
            ));
        }

        Ok(())
    }

    fn validation_warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        if self.k_rel != 0.0 && !(0.2..=0.5).contains(&self.k_rel) {
            warnings.push(format!(
                "k_rel = {} is outside the recommended range 0.2-0.5",
                self.k_rel
            ));
        }

        if self.k_gap != 0.0 && !(0.1..=0.2).contains(&self.k_gap) {
            warnings.push(format!(
                "k_gap = {} is outside the recommended range 0.1-0.2",
                self.k_gap
            ));
        }

        if self.k_rel == 0.0 && self.k_gap == 0.0 {
            warnings.push(
                "k_rel and k_gap are both zero; AABBs at cell seams may miss pairs".to_string(),
            );
        }

        warnings
    }
}

impl Serializable for IndexConfig {}

impl IndexConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from JSON string
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: IndexConfig = serde_json::from_str(json)?;
        config.validate()?;
        for warning in config.validation_warnings() {
            tracing::warn!("index config: {warning}");
        }
        Ok(config)
    }

    /// Save configuration to JSON string
    pub fn to_json_str(&self) -> Result<String> {
        self.validate()?;
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = IndexConfig::default();
        assert!(config.validate().is_ok());
        assert!(config.validation_warnings().is_empty());
    }

    #[test]
    fn test_zero_threshold_rejected() {
        let config = IndexConfig {
            max_lines_per_node: 0,
            ..IndexConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_non_positive_cell_size_rejected() {
        let config = IndexConfig {
            min_cell_size: 0.0,
            ..IndexConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_negative_factor_rejected() {
        let config = IndexConfig {
            k_rel: -0.1,
            ..IndexConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_expansion_warns() {
        let config = IndexConfig {
            k_rel: 0.0,
            k_gap: 0.0,
            ..IndexConfig::default()
        };
        // Valid but known to expose the cell-seam failure mode.
        assert!(config.validate().is_ok());
        assert!(!config.validation_warnings().is_empty());
    }

    #[test]
    fn test_config_serialization() {
        let config = IndexConfig::default();
        let json = config.to_json_str().unwrap();
        let deserialized = IndexConfig::from_json_str(&json).unwrap();
        assert_eq!(config.max_depth, deserialized.max_depth);
        assert_eq!(config.min_cell_size, deserialized.min_cell_size);
    }
}
