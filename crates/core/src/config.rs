use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::engine::tolerance::Tolerances;

/// Tuning knobs for the recommendation pipeline. The defaults are the
/// product constants; a bar-fleet operator can override them from a TOML
/// file without touching code.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Relative slack applied to numeric ceilings (hard limits and near-miss
    /// detection share it).
    pub tolerance_ratio: f64,
    /// Absolute slack floor for the ABV ceiling, in percentage points.
    pub abv_tolerance: f64,
    /// Absolute slack floor for the price ceiling, in currency units.
    pub price_tolerance: f64,
    /// Credit a near-miss earns in the quality gate, relative to a strict
    /// match.
    pub near_weight: f64,
    /// Minimum strict-plus-weighted-near ratio an item must reach.
    pub quality_threshold: f64,
    /// How many items a recommendation returns at most.
    pub max_results: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            tolerance_ratio: 0.10,
            abv_tolerance: 0.5,
            price_tolerance: 0.5,
            near_weight: 0.5,
            quality_threshold: 0.9,
            max_results: 3,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("could not parse config file `{path}`: {source}")]
    ParseFile { path: PathBuf, source: toml::de::Error },
    #[error("configuration validation failed: {0}")]
    Validation(String),
}

impl EngineConfig {
    pub fn load_path(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path)
            .map_err(|source| ConfigError::ReadFile { path: path.to_path_buf(), source })?;
        let config: Self = toml::from_str(&raw)
            .map_err(|source| ConfigError::ParseFile { path: path.to_path_buf(), source })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("tolerance_ratio", self.tolerance_ratio),
            ("abv_tolerance", self.abv_tolerance),
            ("price_tolerance", self.price_tolerance),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::Validation(format!(
                    "{name} must be a non-negative number, got {value}"
                )));
            }
        }
        if !self.near_weight.is_finite() || !(0.0..=1.0).contains(&self.near_weight) {
            return Err(ConfigError::Validation(format!(
                "near_weight must be within [0, 1], got {}",
                self.near_weight
            )));
        }
        if !self.quality_threshold.is_finite()
            || self.quality_threshold <= 0.0
            || self.quality_threshold > 1.0
        {
            return Err(ConfigError::Validation(format!(
                "quality_threshold must be within (0, 1], got {}",
                self.quality_threshold
            )));
        }
        if self.max_results == 0 {
            return Err(ConfigError::Validation("max_results must be at least 1".to_owned()));
        }
        Ok(())
    }

    /// Resolved tolerance window shared by the hard-limit filter, the
    /// quality gate and the explainer.
    pub fn tolerances(&self) -> Tolerances {
        Tolerances::from_f64(self.tolerance_ratio, self.abv_tolerance, self.price_tolerance)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use rust_decimal::Decimal;

    use super::*;

    #[test]
    fn defaults_match_the_product_constants() {
        let config = EngineConfig::default();
        assert_eq!(config.quality_threshold, 0.9);
        assert_eq!(config.near_weight, 0.5);
        assert_eq!(config.max_results, 3);
        assert!(config.validate().is_ok());

        let tolerances = config.tolerances();
        assert_eq!(tolerances.ratio, Decimal::new(1, 1));
        assert_eq!(tolerances.abv_abs, Decimal::new(5, 1));
        assert_eq!(tolerances.price_abs, Decimal::new(5, 1));
    }

    #[test]
    fn loads_overrides_from_toml() -> Result<(), String> {
        let mut file = tempfile::NamedTempFile::new().map_err(|err| err.to_string())?;
        writeln!(file, "quality_threshold = 0.8\nmax_results = 5")
            .map_err(|err| err.to_string())?;

        let config =
            EngineConfig::load_path(file.path()).map_err(|err| format!("load failed: {err}"))?;
        assert_eq!(config.quality_threshold, 0.8);
        assert_eq!(config.max_results, 5);
        // Untouched fields keep their defaults.
        assert_eq!(config.tolerance_ratio, 0.10);
        Ok(())
    }

    #[test]
    fn rejects_out_of_range_values() {
        let config = EngineConfig { quality_threshold: 1.5, ..EngineConfig::default() };
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));

        let config = EngineConfig { max_results: 0, ..EngineConfig::default() };
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));

        let config = EngineConfig { abv_tolerance: -0.1, ..EngineConfig::default() };
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn unknown_keys_fail_parsing() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(file, "qualty_threshold = 0.8").expect("write");
        assert!(matches!(
            EngineConfig::load_path(file.path()),
            Err(ConfigError::ParseFile { .. })
        ));
    }
}
