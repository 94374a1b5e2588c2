//! Equilibrium solver
//!
//! Closed-form steady states of the energy balance
//!
//! $$ (1 - a) S = e \sigma T^4 $$
//!
//! solved either for $T$ (the static model, with albedo held fixed) or for $e$ (the tipping line,
//! with albedo following temperature through [`albedo`]).
//!
//! The tipping line is multi-valued over a band of emissivities: inside that band a cold
//! ice-covered state, a warm state and an unstable state between them all satisfy the balance.
//! Nothing here classifies stability; [`equilibrium_temperatures`] only reports where the roots are.

use crate::feedback::{albedo, emissivity_from_co2};
use crate::parameters::{validate_albedo, Co2Range, TemperatureRange};
use log::{debug, warn};
use rsebm_core::constants::PhysicalConstants;
use rsebm_core::errors::{EBMError, EBMResult};
use rsebm_core::timeseries::{CurveKind, EquilibriumCurve, FloatValue};
use rsebm_core::utils::root_finding::{bisect, bracket_roots};

/// Range over which the linear CO2 to emissivity fit holds
/// unit: ppm
const CO2_FIT_RANGE: (FloatValue, FloatValue) = (250.0, 1000.0);

const BISECTION_TOLERANCE: FloatValue = 1e-10;
const BISECTION_MAX_ITERATIONS: usize = 200;

/// Static equilibrium temperature for each CO2 concentration at a fixed albedo
///
/// $$ T = \left( \frac{(1 - a) S}{e(CO_2) \sigma} \right)^{1/4} $$
///
/// Fails with a domain error if the emissivity is not positive for any concentration.
pub fn static_equilibrium(
    co2: &[FloatValue],
    albedo: FloatValue,
    constants: &PhysicalConstants,
) -> EBMResult<EquilibriumCurve> {
    validate_albedo(albedo)?;
    constants.validate()?;
    if co2.is_empty() {
        return Err(EBMError::invalid_parameter(
            "co2",
            "at least one concentration is required",
        ));
    }

    let (fit_low, fit_high) = CO2_FIT_RANGE;
    if co2.iter().any(|c| *c < fit_low || *c > fit_high) {
        warn!(
            "CO2 concentrations outside [{}, {}] ppm are beyond the emissivity fit",
            fit_low, fit_high
        );
    }

    let absorbed = (1.0 - albedo) * constants.solar;
    let temperature = co2
        .iter()
        .map(|&concentration| {
            let e = emissivity_from_co2(concentration);
            if !(e > 0.0) {
                return Err(EBMError::domain(
                    "emissivity",
                    format!(
                        "CO2 of {} ppm gives emissivity {} <= 0",
                        concentration, e
                    ),
                ));
            }
            Ok((absorbed / (e * constants.stefan_boltzmann)).powf(0.25))
        })
        .collect::<EBMResult<Vec<_>>>()?;

    EquilibriumCurve::new(CurveKind::StaticEquilibrium, co2.to_vec(), temperature)
}

/// Emissivity at which each temperature is an equilibrium of the dynamic model
///
/// $$ e(T) = \frac{(1 - a(T)) S}{\sigma T^4} $$
pub fn tipping_line(
    temperature: &[FloatValue],
    constants: &PhysicalConstants,
) -> EBMResult<EquilibriumCurve> {
    constants.validate()?;
    if temperature.is_empty() {
        return Err(EBMError::invalid_parameter(
            "temperature",
            "at least one temperature is required",
        ));
    }

    let emissivity = temperature
        .iter()
        .map(|&t| {
            if !(t.is_finite() && t > 0.0) {
                return Err(EBMError::domain(
                    "temperature",
                    format!("tipping line requires T > 0, got {}", t),
                ));
            }
            Ok((1.0 - albedo(t)) * constants.solar / (constants.stefan_boltzmann * t.powi(4)))
        })
        .collect::<EBMResult<Vec<_>>>()?;

    EquilibriumCurve::new(CurveKind::TippingLine, emissivity, temperature.to_vec())
}

/// Net radiative flux into the surface, $(1 - a(T)) S - e \sigma T^4$
pub fn net_radiation(
    temperature: FloatValue,
    emissivity: FloatValue,
    constants: &PhysicalConstants,
) -> FloatValue {
    (1.0 - albedo(temperature)) * constants.solar
        - constants.outgoing_radiation(emissivity, temperature)
}

/// All equilibrium temperatures within `range` for a fixed emissivity, in ascending order.
///
/// Roots are bracketed on the range's grid and refined by bisection. Inside the bistable band
/// three temperatures are returned, outside it one. Roots closer together than the grid spacing
/// may be missed.
pub fn equilibrium_temperatures(
    emissivity: FloatValue,
    range: &TemperatureRange,
    constants: &PhysicalConstants,
) -> EBMResult<Vec<FloatValue>> {
    constants.validate()?;
    if !(emissivity.is_finite() && emissivity > 0.0) {
        return Err(EBMError::domain(
            "emissivity",
            format!("must be positive, got {}", emissivity),
        ));
    }
    let grid = range.points()?.to_vec();
    let balance = |t: FloatValue| net_radiation(t, emissivity, constants);

    let roots: Vec<FloatValue> = bracket_roots(balance, &grid)
        .into_iter()
        .filter_map(|(lo, hi)| bisect(balance, lo, hi, BISECTION_TOLERANCE, BISECTION_MAX_ITERATIONS))
        .collect();

    debug!(
        "Found {} equilibria for e={} within [{}, {}] K",
        roots.len(),
        emissivity,
        range.low,
        range.high
    );
    Ok(roots)
}

/// Static equilibrium curve across a CO2 range
pub fn compute_equilibrium(
    co2_range: &Co2Range,
    albedo: FloatValue,
    n_points: usize,
    constants: &PhysicalConstants,
) -> EBMResult<EquilibriumCurve> {
    let co2 = co2_range.points(n_points)?;
    debug!(
        "Computing static equilibrium for CO2 in [{}, {}] ppm with albedo {} ({} points)",
        co2_range.low, co2_range.high, albedo, n_points
    );
    static_equilibrium(&co2.to_vec(), albedo, constants)
}

/// Tipping line across a temperature range
pub fn compute_tipping_line(
    range: &TemperatureRange,
    constants: &PhysicalConstants,
) -> EBMResult<EquilibriumCurve> {
    let temperature = range.points()?;
    debug!(
        "Computing tipping line for T in [{}, {}] K ({} points)",
        range.low, range.high, range.n_points
    );
    tipping_line(&temperature.to_vec(), constants)
}
