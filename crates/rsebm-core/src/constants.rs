//! Physical constants shared by every part of the model.

use crate::errors::{EBMError, EBMResult};
use crate::timeseries::FloatValue;
use serde::{Deserialize, Serialize};

/// Stefan-Boltzmann constant
/// unit: W / m^2 / K^4
pub const STEFAN_BOLTZMANN: FloatValue = 5.67037e-8;

/// Mean incoming solar radiation at the top of the atmosphere
/// unit: W / m^2
pub const MEAN_SOLAR_RADIATION: FloatValue = 342.0;

/// Constants of the energy balance, fixed for a run and passed explicitly to every calculation.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicalConstants {
    /// Stefan-Boltzmann constant $\sigma$
    /// unit: W / m^2 / K^4
    pub stefan_boltzmann: FloatValue,
    /// Mean solar radiation $S$
    /// unit: W / m^2
    pub solar: FloatValue,
}

impl Default for PhysicalConstants {
    fn default() -> Self {
        Self {
            stefan_boltzmann: STEFAN_BOLTZMANN,
            solar: MEAN_SOLAR_RADIATION,
        }
    }
}

impl PhysicalConstants {
    pub fn new(stefan_boltzmann: FloatValue, solar: FloatValue) -> EBMResult<Self> {
        let constants = Self {
            stefan_boltzmann,
            solar,
        };
        constants.validate()?;
        Ok(constants)
    }

    /// Both constants must be finite and strictly positive
    pub fn validate(&self) -> EBMResult<()> {
        if !(self.stefan_boltzmann.is_finite() && self.stefan_boltzmann > 0.0) {
            return Err(EBMError::invalid_parameter(
                "stefan_boltzmann",
                format!("must be positive, got {}", self.stefan_boltzmann),
            ));
        }
        if !(self.solar.is_finite() && self.solar > 0.0) {
            return Err(EBMError::invalid_parameter(
                "solar",
                format!("must be positive, got {}", self.solar),
            ));
        }
        Ok(())
    }

    /// Outgoing long-wave radiation $e \sigma T^4$
    pub fn outgoing_radiation(&self, emissivity: FloatValue, temperature: FloatValue) -> FloatValue {
        emissivity * self.stefan_boltzmann * temperature.powi(4)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_constants() {
        let constants = PhysicalConstants::default();
        assert_eq!(constants.stefan_boltzmann, 5.67037e-8);
        assert_eq!(constants.solar, 342.0);
        assert!(constants.validate().is_ok());
    }

    #[test]
    fn test_invalid_constants() {
        assert!(PhysicalConstants::new(0.0, 342.0).is_err());
        assert!(PhysicalConstants::new(5.67e-8, -1.0).is_err());
        assert!(PhysicalConstants::new(f64::NAN, 342.0).is_err());
    }

    #[test]
    fn test_partial_deserialization() {
        let json = r#"{"solar": 340.0}"#;
        let constants: PhysicalConstants =
            serde_json::from_str(json).expect("Partial deserialization failed");
        assert_eq!(constants.solar, 340.0);
        assert_eq!(constants.stefan_boltzmann, STEFAN_BOLTZMANN);
    }
}
