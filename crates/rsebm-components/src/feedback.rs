//! Feedback functions
//!
//! Pure functions describing how the planet's albedo responds to temperature (ice-melt feedback)
//! and how the atmosphere's emissivity responds to CO2 (greenhouse effect). None of these read
//! any shared state; the physical constants they are combined with are passed in by the caller.

use rsebm_core::errors::{EBMError, EBMResult};
use rsebm_core::timeseries::{FloatValue, Time};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Surface albedo as a function of temperature
///
/// $$ a(T) = 0.495 - 0.205 \tanh(0.133 (T - 275)) $$
///
/// Colder planets are covered in more ice and reflect more sunlight. The result is smooth,
/// strictly decreasing in $T$ and bounded in $(0.29, 0.70)$ for every real temperature.
pub fn albedo(temperature: FloatValue) -> FloatValue {
    0.495 - 0.205 * (0.133 * (temperature - 275.0)).tanh()
}

/// Emissivity of the atmosphere as a function of CO2 concentration (ppm)
///
/// $$ e = 0.633 - 7.1 \times 10^{-5} \cdot CO_2 $$
///
/// Emissivity decreases as CO2 rises: a thicker greenhouse lets less long-wave radiation escape.
/// The fit is valid for 250 to 1000 ppm. Values outside that range are not rejected here; the
/// result reaches zero near 8915 ppm and callers dividing by it must guard against that.
pub fn emissivity_from_co2(co2: FloatValue) -> FloatValue {
    0.633 - 7.1e-5 * co2
}

/// Emissivity ramp for rising CO2 over normalised time
pub fn emissivity_down(t: Time) -> FloatValue {
    0.65 - 0.1 * t
}

/// Emissivity ramp for falling CO2 over normalised time
pub fn emissivity_up(t: Time) -> FloatValue {
    0.1 + 0.1 * t
}

/// Direction in which CO2 is driven during a dynamic run
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ForcingDirection {
    /// CO2 increases, so emissivity ramps down ([`emissivity_down`])
    Rising,
    /// CO2 decreases, so emissivity ramps up ([`emissivity_up`])
    Falling,
}

impl ForcingDirection {
    /// Emissivity at normalised time `t` for this direction
    pub fn emissivity(&self, t: Time) -> FloatValue {
        match self {
            ForcingDirection::Rising => emissivity_down(t),
            ForcingDirection::Falling => emissivity_up(t),
        }
    }
}

impl fmt::Display for ForcingDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ForcingDirection::Rising => write!(f, "rising"),
            ForcingDirection::Falling => write!(f, "falling"),
        }
    }
}

impl FromStr for ForcingDirection {
    type Err = EBMError;

    fn from_str(s: &str) -> EBMResult<Self> {
        match s.trim().to_lowercase().as_str() {
            "rising" | "increasing" | "down" => Ok(ForcingDirection::Rising),
            "falling" | "decreasing" | "up" => Ok(ForcingDirection::Falling),
            other => Err(EBMError::invalid_parameter(
                "direction",
                format!("expected 'rising' or 'falling', got '{}'", other),
            )),
        }
    }
}
