//! Configuration for polyline decimation

use serde::{Deserialize, Serialize};

use crate::error::{DecimateError, DecimateResult};

/// Default fraction of vertices to remove
pub const DEFAULT_TARGET_REDUCTION: f64 = 0.90;

/// Storage precision of output point coordinates
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "uniffi", derive(uniffi::Enum))]
#[serde(rename_all = "lowercase")]
pub enum OutputPrecision {
    /// Same as the input points
    #[default]
    Native,
    /// 32-bit floats
    Single,
    /// 64-bit floats
    Double,
}

/// Decimation parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "uniffi", derive(uniffi::Record))]
#[serde(default)]
pub struct DecimatorConfig {
    /// Fraction of each polyline's vertices to try to remove, in [0, 1]
    pub target_reduction: f64,
    /// Vertices whose error exceeds this bound are never removed
    pub maximum_error: f64,
    /// Precision of the output points
    pub output_precision: OutputPrecision,
}

impl Default for DecimatorConfig {
    fn default() -> Self {
        Self {
            target_reduction: DEFAULT_TARGET_REDUCTION,
            maximum_error: f64::MAX,
            output_precision: OutputPrecision::Native,
        }
    }
}

impl DecimatorConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the target reduction
    pub fn with_target_reduction(mut self, target_reduction: f64) -> Self {
        self.target_reduction = target_reduction;
        self
    }

    /// Set the maximum error
    pub fn with_maximum_error(mut self, maximum_error: f64) -> Self {
        self.maximum_error = maximum_error;
        self
    }

    /// Set the output precision
    pub fn with_output_precision(mut self, output_precision: OutputPrecision) -> Self {
        self.output_precision = output_precision;
        self
    }

    /// Load and validate configuration from a TOML string
    pub fn from_toml(toml_str: &str) -> DecimateResult<Self> {
        let config: Self = toml::from_str(toml_str)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize configuration to TOML
    pub fn to_toml(&self) -> DecimateResult<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Load and validate configuration from a JSON string
    pub fn from_json(json_str: &str) -> DecimateResult<Self> {
        let config: Self = serde_json::from_str(json_str)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize configuration to JSON
    pub fn to_json(&self) -> DecimateResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Validate configuration values
    pub fn validate(&self) -> DecimateResult<()> {
        if !(0.0..=1.0).contains(&self.target_reduction) {
            return Err(DecimateError::InvalidConfig(format!(
                "target_reduction must be between 0.0 and 1.0, got {}",
                self.target_reduction
            )));
        }

        if self.maximum_error.is_nan() || self.maximum_error < 0.0 {
            return Err(DecimateError::InvalidConfig(format!(
                "maximum_error must be non-negative, got {}",
                self.maximum_error
            )));
        }

        Ok(())
    }
}
