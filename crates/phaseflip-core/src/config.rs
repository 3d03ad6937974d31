//! Gain configuration.
//!
//! Hosts describe the starting gain and the safety ceiling either in code with
//! the const builder or from a JSON document:
//!
//! ```
//! use phaseflip_core::GainConfig;
//!
//! const CONFIG: GainConfig = GainConfig::new()
//!     .with_initial_gain(0.5)
//!     .with_ceiling(0.8);
//!
//! let from_json = GainConfig::from_json(r#"{ "initial_gain": 0.5, "ceiling": 0.8 }"#).unwrap();
//! assert_eq!(CONFIG, from_json);
//!
//! let gain = CONFIG.build().unwrap();
//! assert_eq!(gain.get(), 0.5);
//! ```

use serde::Deserialize;

use crate::error::{ConfigError, Result};
use crate::gain::{GainControl, MAX_GAIN, MIN_GAIN};

/// Starting state of a [`GainControl`].
///
/// Missing JSON fields take their defaults (unity gain, ceiling 1.0).
/// Unknown fields are rejected so that typos do not silently fall back to unity.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GainConfig {
    /// Gain applied from the first render call
    pub initial_gain: f32,
    /// Upper bound for all later writes
    pub ceiling: f32,
}

impl GainConfig {
    /// Unity gain with the full `[0.0, 1.0]` range.
    pub const fn new() -> Self {
        Self {
            initial_gain: MAX_GAIN,
            ceiling: MAX_GAIN,
        }
    }

    /// Set the initial gain.
    pub const fn with_initial_gain(mut self, gain: f32) -> Self {
        self.initial_gain = gain;
        self
    }

    /// Set the ceiling.
    pub const fn with_ceiling(mut self, ceiling: f32) -> Self {
        self.ceiling = ceiling;
        self
    }

    /// Parse a configuration from JSON and validate it.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that both values are finite and inside the safe range.
    pub fn validate(&self) -> Result<()> {
        check_range("ceiling", self.ceiling, MIN_GAIN, MAX_GAIN)?;
        check_range("initial_gain", self.initial_gain, MIN_GAIN, self.ceiling)
    }

    /// Validate and create the gain control.
    pub fn build(&self) -> Result<GainControl> {
        self.validate()?;
        log::info!(
            "Gain control: initial {}, ceiling {}",
            self.initial_gain,
            self.ceiling
        );
        let gain = GainControl::unity().with_ceiling(self.ceiling);
        gain.set(self.initial_gain);
        Ok(gain)
    }
}

impl Default for GainConfig {
    fn default() -> Self {
        Self::new()
    }
}

fn check_range(field: &'static str, value: f32, min: f32, max: f32) -> Result<()> {
    if !value.is_finite() {
        return Err(ConfigError::NonFinite { field });
    }
    if value < min || value > max {
        return Err(ConfigError::OutOfRange {
            field,
            value,
            min,
            max,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = GainConfig::default();
        assert_eq!(config.initial_gain, 1.0);
        assert_eq!(config.ceiling, 1.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_json_partial() {
        let config = GainConfig::from_json(r#"{ "initial_gain": 0.25 }"#).unwrap();
        assert_eq!(config.initial_gain, 0.25);
        assert_eq!(config.ceiling, 1.0);
    }

    #[test]
    fn test_from_json_empty_object() {
        let config = GainConfig::from_json("{}").unwrap();
        assert_eq!(config, GainConfig::new());
    }

    #[test]
    fn test_from_json_rejects_unknown_field() {
        let err = GainConfig::from_json(r#"{ "gain": 0.5 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Json(_)));
    }

    #[test]
    fn test_from_json_rejects_malformed() {
        assert!(matches!(
            GainConfig::from_json("{ initial_gain: "),
            Err(ConfigError::Json(_))
        ));
    }

    #[test]
    fn test_validate_ceiling_above_unity() {
        let err = GainConfig::new().with_ceiling(1.5).validate().unwrap_err();
        assert!(matches!(
            err,
            ConfigError::OutOfRange {
                field: "ceiling",
                ..
            }
        ));
    }

    #[test]
    fn test_validate_initial_above_ceiling() {
        let err = GainConfig::new()
            .with_ceiling(0.5)
            .with_initial_gain(0.6)
            .validate()
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::OutOfRange {
                field: "initial_gain",
                ..
            }
        ));
    }

    #[test]
    fn test_validate_non_finite() {
        let err = GainConfig::new()
            .with_initial_gain(f32::NAN)
            .validate()
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::NonFinite {
                field: "initial_gain"
            }
        ));
    }

    #[test]
    fn test_build() {
        let gain = GainConfig::new()
            .with_initial_gain(0.2)
            .with_ceiling(0.6)
            .build()
            .unwrap();
        assert_eq!(gain.get(), 0.2);
        assert_eq!(gain.ceiling(), 0.6);
        assert_eq!(gain.set(1.0), 0.6);
    }

    #[test]
    fn test_error_display() {
        let err = GainConfig::new().with_ceiling(2.0).validate().unwrap_err();
        assert_eq!(err.to_string(), "ceiling = 2 is outside [0, 1]");
    }
}
