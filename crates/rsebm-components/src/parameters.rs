//! User-adjustable model parameters and their recognised ranges.

use crate::feedback::ForcingDirection;
use log::warn;
use ndarray::Array1;
use rsebm_core::errors::{EBMError, EBMResult};
use rsebm_core::timeseries::{linspace, FloatValue};
use serde::{Deserialize, Serialize};

/// Lowest CO2 concentration accepted for the static model
/// unit: ppm
pub const CO2_MIN: FloatValue = 200.0;
/// Highest CO2 concentration accepted for the static model
/// unit: ppm
pub const CO2_MAX: FloatValue = 1000.0;
/// Recognised range of response rates
pub const RESPONSE_RATE_RANGE: (FloatValue, FloatValue) = (1.0, 500.0);

/// Albedo must be a fraction in [0, 1]
pub fn validate_albedo(albedo: FloatValue) -> EBMResult<()> {
    if !(0.0..=1.0).contains(&albedo) {
        return Err(EBMError::invalid_parameter(
            "albedo",
            format!("must be within [0, 1], got {}", albedo),
        ));
    }
    Ok(())
}

/// Response rates must be finite and strictly positive.
///
/// Rates outside [`RESPONSE_RATE_RANGE`] are accepted but logged.
pub fn validate_response_rate(response_rate: FloatValue) -> EBMResult<()> {
    if !(response_rate.is_finite() && response_rate > 0.0) {
        return Err(EBMError::invalid_parameter(
            "response_rate",
            format!("must be positive, got {}", response_rate),
        ));
    }
    let (low, high) = RESPONSE_RATE_RANGE;
    if response_rate < low || response_rate > high {
        warn!(
            "Response rate {} is outside the recognised range [{}, {}]",
            response_rate, low, high
        );
    }
    Ok(())
}

/// A CO2 concentration interval for the static model
/// unit: ppm
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Co2Range {
    pub low: FloatValue,
    pub high: FloatValue,
}

impl Co2Range {
    pub fn new(low: FloatValue, high: FloatValue) -> EBMResult<Self> {
        let range = Self { low, high };
        range.validate()?;
        Ok(range)
    }

    /// Bounds must lie within [[`CO2_MIN`], [`CO2_MAX`]] with `low < high`
    pub fn validate(&self) -> EBMResult<()> {
        if !(self.low.is_finite() && self.high.is_finite()) || self.low >= self.high {
            return Err(EBMError::invalid_parameter(
                "co2_range",
                format!(
                    "lower bound must be below the upper bound, got [{}, {}]",
                    self.low, self.high
                ),
            ));
        }
        if self.low < CO2_MIN || self.high > CO2_MAX {
            return Err(EBMError::invalid_parameter(
                "co2_range",
                format!(
                    "bounds must lie within [{}, {}] ppm, got [{}, {}]",
                    CO2_MIN, CO2_MAX, self.low, self.high
                ),
            ));
        }
        Ok(())
    }

    /// Ascending, evenly spaced concentrations across the range
    pub fn points(&self, n_points: usize) -> EBMResult<Array1<FloatValue>> {
        self.validate()?;
        linspace(self.low, self.high, n_points)
    }
}

impl Default for Co2Range {
    fn default() -> Self {
        Self {
            low: 280.0,
            high: 430.0,
        }
    }
}

/// A temperature interval sampled at `n_points`
/// unit: K
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemperatureRange {
    pub low: FloatValue,
    pub high: FloatValue,
    pub n_points: usize,
}

impl Default for TemperatureRange {
    fn default() -> Self {
        Self {
            low: 220.0,
            high: 350.0,
            n_points: 100,
        }
    }
}

impl TemperatureRange {
    pub fn new(low: FloatValue, high: FloatValue, n_points: usize) -> EBMResult<Self> {
        let range = Self {
            low,
            high,
            n_points,
        };
        range.validate()?;
        Ok(range)
    }

    pub fn validate(&self) -> EBMResult<()> {
        if !(self.low.is_finite() && self.high.is_finite()) || self.low >= self.high {
            return Err(EBMError::invalid_parameter(
                "temperature_range",
                format!(
                    "lower bound must be below the upper bound, got [{}, {}]",
                    self.low, self.high
                ),
            ));
        }
        if self.low <= 0.0 {
            return Err(EBMError::invalid_parameter(
                "temperature_range",
                format!("temperatures must be positive in K, got {}", self.low),
            ));
        }
        if self.n_points < 2 {
            return Err(EBMError::invalid_parameter(
                "n_points",
                format!("at least 2 points are required, got {}", self.n_points),
            ));
        }
        Ok(())
    }

    pub fn points(&self) -> EBMResult<Array1<FloatValue>> {
        self.validate()?;
        linspace(self.low, self.high, self.n_points)
    }
}

/// Parameters supplied with a single model invocation
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ModelParameters {
    /// Albedo used by the static model
    pub albedo: FloatValue,
    /// CO2 interval swept by the static model
    pub co2_range: Co2Range,
    /// Climate response rate $\lambda$ of the dynamic model
    pub response_rate: FloatValue,
    pub direction: ForcingDirection,
}

impl ModelParameters {
    pub fn validate(&self) -> EBMResult<()> {
        validate_albedo(self.albedo)?;
        self.co2_range.validate()?;
        validate_response_rate(self.response_rate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rsebm_core::errors::ErrorKind;

    #[test]
    fn test_inverted_co2_bounds() {
        let err = Co2Range::new(500.0, 300.0).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidParameter);
    }

    #[test]
    fn test_co2_bounds_outside_recognised_range() {
        assert!(Co2Range::new(150.0, 300.0).is_err());
        assert!(Co2Range::new(300.0, 1200.0).is_err());
        assert!(Co2Range::new(200.0, 1000.0).is_ok());
    }

    #[test]
    fn test_co2_points_ascending() {
        let points = Co2Range::default().points(100).unwrap();
        assert_eq!(points.len(), 100);
        assert_eq!(points[0], 280.0);
        assert!((points[99] - 430.0).abs() < 1e-9);
        assert!(points.windows(2).into_iter().all(|w| w[1] > w[0]));
    }

    #[test]
    fn test_albedo_bounds() {
        assert!(validate_albedo(0.0).is_ok());
        assert!(validate_albedo(1.0).is_ok());
        assert!(validate_albedo(-0.1).is_err());
        assert!(validate_albedo(1.1).is_err());
        assert!(validate_albedo(f64::NAN).is_err());
    }

    #[test]
    fn test_response_rate() {
        assert!(validate_response_rate(1.0).is_ok());
        assert!(validate_response_rate(500.0).is_ok());
        // Outside the recognised range only warns
        assert!(validate_response_rate(1000.0).is_ok());
        assert_eq!(
            validate_response_rate(0.0).unwrap_err().kind(),
            ErrorKind::InvalidParameter
        );
        assert!(validate_response_rate(-5.0).is_err());
        assert!(validate_response_rate(f64::INFINITY).is_err());
    }

    #[test]
    fn test_temperature_range() {
        let range = TemperatureRange::default();
        assert_eq!(range.points().unwrap().len(), 100);
        assert!(TemperatureRange::new(350.0, 220.0, 100).is_err());
        assert!(TemperatureRange::new(220.0, 350.0, 1).is_err());
        assert!(TemperatureRange::new(0.0, 350.0, 100).is_err());
    }

    #[test]
    fn test_model_parameters() {
        let mut params = ModelParameters {
            albedo: 0.31,
            co2_range: Co2Range::default(),
            response_rate: 10.0,
            direction: ForcingDirection::Rising,
        };
        assert!(params.validate().is_ok());

        params.co2_range = Co2Range {
            low: 500.0,
            high: 300.0,
        };
        assert!(params.validate().is_err());
    }
}
