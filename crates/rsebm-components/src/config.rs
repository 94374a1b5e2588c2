//! TOML configuration
//!
//! Every table is optional and every key falls back to its default, so a config file only needs
//! to name what it changes:
//!
//! ```toml
//! [static_model]
//! albedo = 0.3
//!
//! [sweep]
//! response_rates = [2.0, 20.0]
//! ```

use crate::feedback::ForcingDirection;
use crate::parameters::{validate_albedo, Co2Range, ModelParameters, TemperatureRange};
use crate::sweep::{SweepRequest, FALLING_HORIZON, RISING_HORIZON};
use log::debug;
use rsebm_core::constants::PhysicalConstants;
use rsebm_core::errors::{EBMError, EBMResult};
use rsebm_core::ivp::SolverOptions;
use rsebm_core::timeseries::{FloatValue, Time};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Settings for the fixed-albedo model
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StaticModelConfig {
    pub albedo: FloatValue,
    /// unit: ppm
    pub co2_low: FloatValue,
    /// unit: ppm
    pub co2_high: FloatValue,
    pub n_points: usize,
}

impl Default for StaticModelConfig {
    fn default() -> Self {
        Self {
            albedo: 0.31,
            co2_low: 280.0,
            co2_high: 430.0,
            n_points: 100,
        }
    }
}

impl StaticModelConfig {
    pub fn co2_range(&self) -> EBMResult<Co2Range> {
        Co2Range::new(self.co2_low, self.co2_high)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SweepConfig {
    pub response_rates: Vec<FloatValue>,
    /// unit: K
    pub initial_temperature: FloatValue,
    pub n_points: usize,
    pub rising_horizon: Time,
    pub falling_horizon: Time,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            response_rates: vec![1.0, 10.0, 500.0],
            initial_temperature: 237.0,
            n_points: 200,
            rising_horizon: RISING_HORIZON,
            falling_horizon: FALLING_HORIZON,
        }
    }
}

/// Complete model configuration
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    pub constants: PhysicalConstants,
    pub solver: SolverOptions,
    pub static_model: StaticModelConfig,
    pub tipping_line: TemperatureRange,
    pub sweep: SweepConfig,
}

impl ModelConfig {
    /// Parse and validate a TOML document
    pub fn from_toml_str(content: &str) -> EBMResult<Self> {
        let config: Self = toml::from_str(content)
            .map_err(|e| EBMError::Config(format!("could not parse TOML: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file
    pub fn from_path(path: impl AsRef<Path>) -> EBMResult<Self> {
        let path = path.as_ref();
        debug!("Loading model configuration from {}", path.display());
        let content = std::fs::read_to_string(path).map_err(|e| {
            EBMError::Config(format!("could not read {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&content)
    }

    pub fn to_toml_string(&self) -> EBMResult<String> {
        toml::to_string(self)
            .map_err(|e| EBMError::Config(format!("could not serialise to TOML: {}", e)))
    }

    pub fn validate(&self) -> EBMResult<()> {
        self.constants.validate()?;
        self.solver.validate()?;
        validate_albedo(self.static_model.albedo)?;
        self.static_model.co2_range()?;
        self.tipping_line.validate()?;
        self.sweep_request(ForcingDirection::Rising).validate()?;
        self.sweep_request(ForcingDirection::Falling).validate()
    }

    /// Sweep request for `direction` using this configuration's sweep and tipping line settings
    pub fn sweep_request(&self, direction: ForcingDirection) -> SweepRequest {
        let horizon = match direction {
            ForcingDirection::Rising => self.sweep.rising_horizon,
            ForcingDirection::Falling => self.sweep.falling_horizon,
        };
        SweepRequest {
            response_rates: self.sweep.response_rates.clone(),
            direction,
            horizon,
            n_points: self.sweep.n_points,
            initial_temperature: self.sweep.initial_temperature,
            tipping_range: self.tipping_line,
        }
    }

    /// Parameters for a single invocation, taking albedo and CO2 bounds from `[static_model]`
    pub fn model_parameters(
        &self,
        response_rate: FloatValue,
        direction: ForcingDirection,
    ) -> EBMResult<ModelParameters> {
        let parameters = ModelParameters {
            albedo: self.static_model.albedo,
            co2_range: self.static_model.co2_range()?,
            response_rate,
            direction,
        };
        parameters.validate()?;
        Ok(parameters)
    }
}
