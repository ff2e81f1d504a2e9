//! Configuration for the estimation core.
//!
//! Loaded with figment: defaults, then an optional TOML file, then
//! environment variables prefixed with `CARBON_AGRO_`.

use std::path::PathBuf;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default configuration file name, looked up in the working directory.
const CONFIG_FILE_NAME: &str = "carbon_agro.toml";

/// Environment variable prefix. Nested keys are separated by `__`.
const ENV_PREFIX: &str = "CARBON_AGRO_";

/// Footprint units per kg of fertilizer. Illustrative, not calibrated.
pub const DEFAULT_FERTILIZER_FACTOR: f64 = 0.002;

/// Footprint units per kg of pesticide. Illustrative, not calibrated.
pub const DEFAULT_PESTICIDE_FACTOR: f64 = 0.001;

/// Application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Dataset locations.
    pub datasets: DatasetConfig,
    /// Emission factors used by the estimator.
    pub factors: EmissionFactors,
}

/// Where the two datasets live.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetConfig {
    /// Crop yield table with an optional `carbon_footprint` column.
    pub yield_path: PathBuf,
    /// Crop measures table.
    pub measures_path: PathBuf,
}

/// Per-kg emission factors applied to fertilizer and pesticide.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmissionFactors {
    pub fertilizer_factor: f64,
    pub pesticide_factor: f64,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            yield_path: PathBuf::from("crop_yield_with_carbon_footprint.csv"),
            measures_path: PathBuf::from("crop_measures.csv"),
        }
    }
}

impl Default for EmissionFactors {
    fn default() -> Self {
        Self {
            fertilizer_factor: DEFAULT_FERTILIZER_FACTOR,
            pesticide_factor: DEFAULT_PESTICIDE_FACTOR,
        }
    }
}

impl EmissionFactors {
    /// Factors must be finite and non-negative so the estimate stays monotone.
    ///
    /// # Errors
    ///
    /// Returns `ConfigValidation` naming the first bad factor.
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("fertilizer_factor", self.fertilizer_factor),
            ("pesticide_factor", self.pesticide_factor),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(Error::ConfigValidation {
                    message: format!("{name} must be a finite, non-negative number, got {value}"),
                });
            }
        }
        Ok(())
    }
}

impl Config {
    /// Load configuration from all sources.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration with an optional custom config path.
    ///
    /// A missing TOML file is not an error; defaults apply.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading, parsing or validation fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(|| PathBuf::from(CONFIG_FILE_NAME));

        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_file))
            .merge(Env::prefixed(ENV_PREFIX).split("__"));

        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<()> {
        self.factors.validate()
    }
}
