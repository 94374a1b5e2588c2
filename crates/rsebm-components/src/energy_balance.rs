//! Dynamic energy balance component
//!
//! Integrates the surface temperature under a time-varying emissivity ramp.

use crate::feedback::{albedo, ForcingDirection};
use crate::parameters::validate_response_rate;
use log::debug;
use rsebm_core::constants::PhysicalConstants;
use rsebm_core::errors::{EBMError, EBMResult};
use rsebm_core::ivp::{IVPBuilder, ModelState, SolverOptions, IVP};
use rsebm_core::timeseries::{validate_time_grid, FloatValue, TemperatureSeries, Time};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Parameters for the dynamic energy balance
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EnergyBalanceParameters {
    /// Climate response rate $\lambda$
    pub response_rate: FloatValue,
    /// Which emissivity ramp drives the run
    pub direction: ForcingDirection,
}

/// Zero-dimensional energy balance with ice-albedo feedback
///
/// The governing equation is:
/// $$ \frac{dT}{dt} = \lambda \left[ (1 - a(T)) S - e(t) \sigma T^4 \right] $$
///
/// Where:
/// - $T$ is the global mean surface temperature (K)
/// - $a(T)$ is the temperature-dependent albedo
/// - $e(t)$ is the emissivity ramp selected by the forcing direction
/// - $S$ is the mean solar radiation and $\sigma$ the Stefan-Boltzmann constant
/// - $\lambda$ is the response rate
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EnergyBalanceComponent {
    parameters: EnergyBalanceParameters,
    constants: PhysicalConstants,
    solver_options: SolverOptions,
}

impl EnergyBalanceComponent {
    /// Create a new component, checking that the response rate and constants are usable
    pub fn from_parameters(
        parameters: EnergyBalanceParameters,
        constants: PhysicalConstants,
    ) -> EBMResult<Self> {
        validate_response_rate(parameters.response_rate)?;
        constants.validate()?;
        Ok(Self {
            parameters,
            constants,
            solver_options: SolverOptions::default(),
        })
    }

    /// Set custom solver options
    pub fn with_solver_options(self, solver_options: SolverOptions) -> Self {
        Self {
            solver_options,
            ..self
        }
    }

    pub fn parameters(&self) -> &EnergyBalanceParameters {
        &self.parameters
    }

    /// Rate of change of temperature at time `t`
    pub fn tendency(&self, t: Time, temperature: FloatValue) -> FloatValue {
        let absorbed = (1.0 - albedo(temperature)) * self.constants.solar;
        let emitted = self
            .constants
            .outgoing_radiation(self.parameters.direction.emissivity(t), temperature);
        self.parameters.response_rate * (absorbed - emitted)
    }

    /// Integrate from `initial_temperature` at `time[0]` across every point of `time`.
    ///
    /// The returned series has one sample per grid point and starts exactly at
    /// `initial_temperature`. If the temperature stops being finite a divergence error is
    /// returned holding the samples computed so far.
    pub fn integrate(
        &self,
        initial_temperature: FloatValue,
        time: &[Time],
    ) -> EBMResult<TemperatureSeries> {
        validate_time_grid(time)?;
        validate_response_rate(self.parameters.response_rate)?;
        self.constants.validate()?;
        self.solver_options.validate()?;
        if !(initial_temperature.is_finite() && initial_temperature > 0.0) {
            return Err(EBMError::domain(
                "initial_temperature",
                format!("must be a positive temperature in K, got {}", initial_temperature),
            ));
        }

        debug!(
            "Integrating energy balance: lambda={} direction={} T0={} over [{}, {}] ({} points)",
            self.parameters.response_rate,
            self.parameters.direction,
            initial_temperature,
            time[0],
            time[time.len() - 1],
            time.len()
        );

        let mut temperature = Vec::with_capacity(time.len());
        temperature.push(initial_temperature);

        if !self.tendency(time[0], initial_temperature).is_finite() {
            return Err(divergence(
                time,
                &temperature,
                time[0],
                "non-finite tendency at the initial state",
            ));
        }

        let component = Arc::new(self.clone());
        let mut state = ModelState::new(initial_temperature);
        for window in time.windows(2) {
            let solver = IVPBuilder::new(Arc::clone(&component), state);
            state = solver
                .integrate(window[0], window[1], &self.solver_options)
                .map_err(|failure| divergence(time, &temperature, failure.time, failure.reason))?;
            temperature.push(state[0]);
        }

        TemperatureSeries::new(time.to_vec(), temperature)
    }
}

/// Build a divergence error keeping the samples computed before `at`
fn divergence(
    time: &[Time],
    temperature: &[FloatValue],
    at: Time,
    reason: impl Into<String>,
) -> EBMError {
    let reason = reason.into();
    match TemperatureSeries::new(time[..temperature.len()].to_vec(), temperature.to_vec()) {
        Ok(partial) => EBMError::Divergence {
            time: at,
            reason,
            partial: Box::new(partial),
        },
        Err(e) => e,
    }
}

impl IVP<Time, ModelState> for EnergyBalanceComponent {
    fn calculate_dy_dt(&self, t: Time, y: &ModelState, dy_dt: &mut ModelState) {
        dy_dt[0] = self.tendency(t, y[0]);
    }
}
