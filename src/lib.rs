//! A zero-dimensional energy balance climate model with ice-albedo feedback.
//!
//! The planet's global mean surface temperature $T$ evolves as
//!
//! $$ \frac{dT}{dt} = \lambda \left[ (1 - a(T)) S - e \sigma T^4 \right] $$
//!
//! The albedo feedback makes the model bistable over a band of emissivities, so warming and
//! cooling the planet along the same CO2 path leaves it on different branches (hysteresis).
//!
//! This crate re-exports the commonly used parts of [`rsebm_core`] and [`rsebm_components`].

pub use rsebm_components::config::ModelConfig;
pub use rsebm_components::energy_balance::{EnergyBalanceComponent, EnergyBalanceParameters};
pub use rsebm_components::equilibrium::{
    compute_equilibrium, compute_tipping_line, equilibrium_temperatures, static_equilibrium,
    tipping_line,
};
pub use rsebm_components::feedback::{
    albedo, emissivity_down, emissivity_from_co2, emissivity_up, ForcingDirection,
};
pub use rsebm_components::parameters::{Co2Range, ModelParameters, TemperatureRange};
pub use rsebm_components::sweep::{run_sweep, RunOutcome, SweepRequest, SweepResult, SweepRun};
pub use rsebm_core::constants::PhysicalConstants;
pub use rsebm_core::errors::{EBMError, EBMResult, ErrorKind};
pub use rsebm_core::ivp::SolverOptions;
pub use rsebm_core::timeseries::{CurveKind, EquilibriumCurve, TemperatureSeries};

pub use rsebm_components;
pub use rsebm_core;

#[cfg(feature = "python")]
mod python;
