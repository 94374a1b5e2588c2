//! Initial value problem plumbing on top of `ode_solvers`.
//!
//! Components describe their right-hand side by implementing [`IVP`]. [`IVPBuilder`] feeds a
//! component to `ode_solvers` through the [`System`] trait and integrates it across a single
//! interval with the adaptive Dormand-Prince 5(4) method.

use crate::errors::{EBMError, EBMResult};
use crate::timeseries::{FloatValue, Time};
use log::debug;
use nalgebra::Vector1;
use ode_solvers::dopri5::Dopri5;
use ode_solvers::System;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

/// State vector of a single-variable model
pub type ModelState = Vector1<FloatValue>;

/// A system of ODEs `dy/dt = f(t, y)`
pub trait IVP<T, S> {
    fn calculate_dy_dt(&self, t: T, y: &S, dy_dt: &mut S);
}

/// Tolerances for the adaptive integrator
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverOptions {
    /// Relative tolerance of the local error estimate
    pub rtol: FloatValue,
    /// Absolute tolerance of the local error estimate
    pub atol: FloatValue,
    /// Longest span handled by a single solver instance.
    /// Longer intervals are integrated as several consecutive restarts.
    pub max_interval: FloatValue,
}

impl Default for SolverOptions {
    fn default() -> Self {
        Self {
            rtol: 1e-8,
            atol: 1e-8,
            max_interval: 0.05,
        }
    }
}

impl SolverOptions {
    pub fn validate(&self) -> EBMResult<()> {
        for (name, value) in [
            ("rtol", self.rtol),
            ("atol", self.atol),
            ("max_interval", self.max_interval),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(EBMError::invalid_parameter(
                    name,
                    format!("must be positive, got {}", value),
                ));
            }
        }
        Ok(())
    }
}

/// Why an interval could not be integrated to its end
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{reason} (t={time})")]
pub struct IntegrationFailure {
    pub time: Time,
    pub reason: String,
}

/// Integrates an [`IVP`] implementation from an initial state.
pub struct IVPBuilder<C> {
    component: Arc<C>,
    y0: ModelState,
}

impl<C> IVPBuilder<C>
where
    C: IVP<Time, ModelState>,
{
    pub fn new(component: Arc<C>, y0: ModelState) -> Self {
        Self { component, y0 }
    }

    /// Integrate from `t_start` to `t_end` and return the state at `t_end`.
    ///
    /// The interval is split into pieces no longer than [`SolverOptions::max_interval`].
    /// Integration stops as soon as the state becomes non-finite.
    pub fn integrate(
        self,
        t_start: Time,
        t_end: Time,
        options: &SolverOptions,
    ) -> Result<ModelState, IntegrationFailure> {
        let span = t_end - t_start;
        let n_pieces = (span / options.max_interval).ceil().max(1.0) as usize;

        let mut state = self.y0;
        for i in 0..n_pieces {
            let a = t_start + span * i as FloatValue / n_pieces as FloatValue;
            let b = if i + 1 == n_pieces {
                t_end
            } else {
                t_start + span * (i + 1) as FloatValue / n_pieces as FloatValue
            };
            let piece = Self {
                component: Arc::clone(&self.component),
                y0: state,
            };
            state = piece.integrate_piece(a, b, options)?;
        }
        Ok(state)
    }

    fn integrate_piece(
        self,
        t_start: Time,
        t_end: Time,
        options: &SolverOptions,
    ) -> Result<ModelState, IntegrationFailure> {
        let y0 = self.y0;
        let mut recorder = StepRecorder {
            component: self.component.as_ref(),
            last_step: None,
        };
        // Dense output is not used; the final accepted step is captured by `solout`
        let mut solver = Dopri5::new(
            &mut recorder,
            t_start,
            t_end,
            t_end - t_start,
            y0,
            options.rtol,
            options.atol,
        );
        let outcome = solver.integrate();
        drop(solver);

        if let Err(e) = outcome {
            let time = recorder.last_step.map_or(t_start, |(t, _)| t);
            debug!(
                "Solver stopped on [{}, {}] after t={}: {:?}",
                t_start, t_end, time, e
            );
            return Err(IntegrationFailure {
                time,
                reason: format!("solver failed: {:?}", e),
            });
        }

        get_last_step(recorder.last_step, t_end)
    }
}

/// Feeds an [`IVP`] to the solver and remembers the most recent accepted step.
struct StepRecorder<'a, C> {
    component: &'a C,
    last_step: Option<(Time, ModelState)>,
}

impl<C> System<Time, ModelState> for &mut StepRecorder<'_, C>
where
    C: IVP<Time, ModelState>,
{
    fn system(&self, t: Time, y: &ModelState, dy: &mut ModelState) {
        self.component.calculate_dy_dt(t, y, dy);
    }

    fn solout(&mut self, t: Time, y: &ModelState, _dy: &ModelState) -> bool {
        self.last_step = Some((t, *y));
        !is_finite_state(y)
    }
}

pub fn is_finite_state(y: &ModelState) -> bool {
    y.iter().all(|v| v.is_finite())
}

/// Check that an integration which should have ended at `t_expected` got there with a finite state.
pub fn get_last_step(
    last_step: Option<(Time, ModelState)>,
    t_expected: Time,
) -> Result<ModelState, IntegrationFailure> {
    let (t_last, y_last) = last_step.ok_or_else(|| IntegrationFailure {
        time: t_expected,
        reason: "solver produced no output".to_string(),
    })?;

    if !is_finite_state(&y_last) {
        return Err(IntegrationFailure {
            time: t_last,
            reason: "state became non-finite".to_string(),
        });
    }

    let tolerance = 1e-9 * t_expected.abs().max(1.0);
    if (t_last - t_expected).abs() > tolerance {
        return Err(IntegrationFailure {
            time: t_last,
            reason: format!("integration stopped before reaching t={}", t_expected),
        });
    }

    Ok(y_last)
}
