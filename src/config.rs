//! Runtime settings loaded from TOML and environment overrides.
//!
//! Environment variables use the `QUANTBRIDGE` prefix with `__` between
//! path segments, e.g. `QUANTBRIDGE__LIVE_TRADING__ENABLED=true`.

use crate::task::services::EstimatorSettings;
use camino::Utf8Path;
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Prefix for environment overrides.
pub const ENV_PREFIX: &str = "QUANTBRIDGE";

/// Errors raised while loading settings.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A source could not be read or deserialised.
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    /// A calibration value is negative or not finite.
    #[error("invalid seconds-per-day calibration for '{kind}': {value}")]
    InvalidCalibration {
        /// Task kind, or `fallback`.
        kind: String,
        /// Offending value.
        value: f64,
    },
}

/// Live trading switch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LiveTradingSettings {
    /// Whether live sessions may be registered. Off unless set.
    pub enabled: bool,
}

/// Top-level settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Progress estimator calibration. A `seconds_per_day` table given in
    /// configuration replaces the built-in one entirely.
    pub estimator: EstimatorSettings,
    /// Live trading switch.
    pub live_trading: LiveTradingSettings,
}

impl Settings {
    /// Loads settings from an optional TOML file, then applies environment
    /// overrides.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Load`] when the file is missing or malformed
    /// and [`ConfigError::InvalidCalibration`] for unusable calibration.
    pub fn load(path: Option<&Utf8Path>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();
        if let Some(file) = path {
            builder = builder.add_source(File::from(file.as_std_path()).format(FileFormat::Toml));
        }
        let settings: Self = builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;
        settings.validate()
    }

    /// Parses settings from TOML text without environment overrides.
    ///
    /// # Errors
    ///
    /// As for [`Settings::load`].
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let settings: Self = Config::builder()
            .add_source(File::from_str(text, FileFormat::Toml))
            .build()?
            .try_deserialize()?;
        settings.validate()
    }

    fn validate(self) -> Result<Self, ConfigError> {
        let usable = |value: f64| value.is_finite() && value >= 0.0;
        if !usable(self.estimator.fallback_seconds_per_day) {
            return Err(ConfigError::InvalidCalibration {
                kind: "fallback".to_owned(),
                value: self.estimator.fallback_seconds_per_day,
            });
        }
        if let Some((kind, value)) = self
            .estimator
            .seconds_per_day
            .iter()
            .find(|(_, value)| !usable(**value))
        {
            return Err(ConfigError::InvalidCalibration {
                kind: kind.clone(),
                value: *value,
            });
        }
        Ok(self)
    }
}
