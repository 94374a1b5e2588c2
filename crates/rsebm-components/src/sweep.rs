//! Response-rate sweeps
//!
//! Runs the energy balance once per response rate on a shared time axis and bundles the runs
//! with the tipping line, ready to be plotted against the emissivity ramp.

use crate::energy_balance::{EnergyBalanceComponent, EnergyBalanceParameters};
use crate::equilibrium::compute_tipping_line;
use crate::feedback::ForcingDirection;
use crate::parameters::{validate_response_rate, TemperatureRange};
use log::{info, warn};
use ndarray::Array1;
use rayon::prelude::*;
use rsebm_core::constants::PhysicalConstants;
use rsebm_core::errors::{EBMError, EBMResult, ErrorKind};
use rsebm_core::ivp::SolverOptions;
use rsebm_core::timeseries::{linspace, EquilibriumCurve, FloatValue, TemperatureSeries, Time};
use serde::{Deserialize, Serialize};

/// Time horizon used for rising-CO2 sweeps when none is given
pub const RISING_HORIZON: Time = 3.5;
/// Time horizon used for falling-CO2 sweeps when none is given
pub const FALLING_HORIZON: Time = 8.0;

/// Default horizon for a forcing direction
pub fn default_horizon(direction: ForcingDirection) -> Time {
    match direction {
        ForcingDirection::Rising => RISING_HORIZON,
        ForcingDirection::Falling => FALLING_HORIZON,
    }
}

/// Everything needed to run a sweep
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SweepRequest {
    pub response_rates: Vec<FloatValue>,
    pub direction: ForcingDirection,
    /// Length of the normalised time axis, which starts at 0
    pub horizon: Time,
    /// Number of points on the time axis
    pub n_points: usize,
    /// Temperature at t = 0 (K)
    pub initial_temperature: FloatValue,
    /// Temperatures over which the tipping line is drawn
    pub tipping_range: TemperatureRange,
}

impl SweepRequest {
    /// A request with the default horizon, grid and starting temperature for `direction`
    pub fn new(response_rates: Vec<FloatValue>, direction: ForcingDirection) -> Self {
        Self {
            response_rates,
            direction,
            horizon: default_horizon(direction),
            n_points: 200,
            initial_temperature: 237.0,
            tipping_range: TemperatureRange::default(),
        }
    }

    pub fn validate(&self) -> EBMResult<()> {
        if self.response_rates.is_empty() {
            return Err(EBMError::invalid_parameter(
                "response_rates",
                "at least one response rate is required",
            ));
        }
        for rate in &self.response_rates {
            validate_response_rate(*rate)?;
        }
        if !(self.horizon.is_finite() && self.horizon > 0.0) {
            return Err(EBMError::invalid_parameter(
                "horizon",
                format!("must be positive, got {}", self.horizon),
            ));
        }
        if self.n_points < 2 {
            return Err(EBMError::invalid_parameter(
                "n_points",
                format!("at least 2 points are required, got {}", self.n_points),
            ));
        }
        if !(self.initial_temperature.is_finite() && self.initial_temperature > 0.0) {
            return Err(EBMError::domain(
                "initial_temperature",
                format!(
                    "must be a positive temperature in K, got {}",
                    self.initial_temperature
                ),
            ));
        }
        self.tipping_range.validate()
    }

    /// The time axis shared by every run
    pub fn time_axis(&self) -> EBMResult<Array1<Time>> {
        linspace(0.0, self.horizon, self.n_points)
    }
}

/// Result of one integration within a sweep
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum RunOutcome {
    Completed {
        series: TemperatureSeries,
    },
    Failed {
        kind: ErrorKind,
        message: String,
        /// Samples computed before the failure, if any
        partial: Option<TemperatureSeries>,
    },
}

impl From<EBMResult<TemperatureSeries>> for RunOutcome {
    fn from(result: EBMResult<TemperatureSeries>) -> Self {
        match result {
            Ok(series) => RunOutcome::Completed { series },
            Err(err) => RunOutcome::Failed {
                kind: err.kind(),
                message: err.to_string(),
                partial: err.partial_series().cloned(),
            },
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SweepRun {
    pub response_rate: FloatValue,
    pub outcome: RunOutcome,
}

impl SweepRun {
    pub fn series(&self) -> Option<&TemperatureSeries> {
        match &self.outcome {
            RunOutcome::Completed { series } => Some(series),
            RunOutcome::Failed { .. } => None,
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self.outcome, RunOutcome::Completed { .. })
    }
}

/// Output of [`run_sweep`]
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SweepResult {
    pub direction: ForcingDirection,
    /// Normalised time shared by every run
    pub time: Array1<Time>,
    /// Emissivity at each point of `time`
    pub forcing: Array1<FloatValue>,
    pub tipping_line: EquilibriumCurve,
    /// One entry per requested response rate, in request order
    pub runs: Vec<SweepRun>,
}

impl SweepResult {
    pub fn completed(&self) -> impl Iterator<Item = &SweepRun> {
        self.runs.iter().filter(|run| run.is_completed())
    }

    pub fn failed(&self) -> impl Iterator<Item = &SweepRun> {
        self.runs.iter().filter(|run| !run.is_completed())
    }

    pub fn is_complete(&self) -> bool {
        self.runs.iter().all(SweepRun::is_completed)
    }
}

/// Run the energy balance for every response rate in `request`.
///
/// The request is validated before anything is integrated. Runs are independent and are executed
/// in parallel; a run that fails is recorded as [`RunOutcome::Failed`] while the other runs are
/// still returned.
pub fn run_sweep(
    request: &SweepRequest,
    constants: &PhysicalConstants,
    solver_options: &SolverOptions,
) -> EBMResult<SweepResult> {
    request.validate()?;
    constants.validate()?;
    solver_options.validate()?;

    let time = request.time_axis()?;
    let forcing = time.mapv(|t| request.direction.emissivity(t));
    let tipping_line = compute_tipping_line(&request.tipping_range, constants)?;
    let grid = time.to_vec();

    let runs: Vec<SweepRun> = request
        .response_rates
        .par_iter()
        .map(|&response_rate| {
            let parameters = EnergyBalanceParameters {
                response_rate,
                direction: request.direction,
            };
            let result = EnergyBalanceComponent::from_parameters(parameters, *constants)
                .map(|component| component.with_solver_options(*solver_options))
                .and_then(|component| component.integrate(request.initial_temperature, &grid));
            if let Err(e) = &result {
                warn!("Sweep run with response rate {} failed: {}", response_rate, e);
            }
            SweepRun {
                response_rate,
                outcome: result.into(),
            }
        })
        .collect();

    let result = SweepResult {
        direction: request.direction,
        time,
        forcing,
        tipping_line,
        runs,
    };
    info!(
        "Sweep ({} CO2) finished: {} of {} runs completed",
        request.direction,
        result.completed().count(),
        result.runs.len()
    );
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rising_request() -> SweepRequest {
        SweepRequest {
            n_points: 50,
            ..SweepRequest::new(vec![1.0, 10.0, 500.0], ForcingDirection::Rising)
        }
    }

    #[test]
    fn test_defaults_follow_direction() {
        let rising = SweepRequest::new(vec![1.0], ForcingDirection::Rising);
        let falling = SweepRequest::new(vec![1.0], ForcingDirection::Falling);
        assert_eq!(rising.horizon, 3.5);
        assert_eq!(falling.horizon, 8.0);
        assert_eq!(rising.n_points, 200);
        assert_eq!(rising.initial_temperature, 237.0);
    }

    #[test]
    fn test_sweep_runs_every_rate() {
        let request = rising_request();
        let result = run_sweep(
            &request,
            &PhysicalConstants::default(),
            &SolverOptions::default(),
        )
        .unwrap();

        assert!(result.is_complete());
        assert_eq!(result.runs.len(), 3);
        assert_eq!(result.time.len(), 50);
        assert_eq!(result.forcing.len(), 50);
        assert_eq!(result.tipping_line.len(), 100);
        assert!((result.forcing[0] - 0.65).abs() < 1e-12);

        let rates: Vec<_> = result.runs.iter().map(|run| run.response_rate).collect();
        assert_eq!(rates, vec![1.0, 10.0, 500.0]);
        for run in &result.runs {
            let series = run.series().unwrap();
            assert_eq!(series.len(), result.time.len());
            assert_eq!(series.first().1, 237.0);
        }
    }

    #[test]
    fn test_invalid_rate_fails_before_integration() {
        let mut request = rising_request();
        request.response_rates = vec![1.0, 0.0];
        let err = run_sweep(
            &request,
            &PhysicalConstants::default(),
            &SolverOptions::default(),
        )
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidParameter);
    }

    #[test]
    fn test_request_validation() {
        let mut request = rising_request();
        request.response_rates.clear();
        assert!(request.validate().is_err());

        let mut request = rising_request();
        request.horizon = 0.0;
        assert!(request.validate().is_err());

        let mut request = rising_request();
        request.n_points = 1;
        assert!(request.validate().is_err());

        let mut request = rising_request();
        request.initial_temperature = -10.0;
        assert_eq!(request.validate().unwrap_err().kind(), ErrorKind::Domain);
    }

    #[test]
    fn test_failed_runs_are_tagged() {
        // An overflowing starting temperature makes every run diverge at t = 0
        let mut request = rising_request();
        request.response_rates = vec![1.0, 10.0];
        request.initial_temperature = 1e100;
        let result = run_sweep(
            &request,
            &PhysicalConstants::default(),
            &SolverOptions::default(),
        )
        .unwrap();

        assert_eq!(result.runs.len(), 2);
        assert_eq!(result.failed().count(), 2);
        for run in result.failed() {
            match &run.outcome {
                RunOutcome::Failed { kind, partial, .. } => {
                    assert_eq!(*kind, ErrorKind::Divergence);
                    assert_eq!(partial.as_ref().unwrap().len(), 1);
                }
                RunOutcome::Completed { .. } => panic!("Expected a failed run"),
            }
        }
    }

    #[test]
    fn test_outcome_from_result() {
        let series = TemperatureSeries::new(vec![0.0], vec![237.0]).unwrap();
        let outcome = RunOutcome::from(Ok(series.clone()));
        assert_eq!(outcome, RunOutcome::Completed { series });

        let outcome = RunOutcome::from(Err(EBMError::domain("temperature", "T <= 0")));
        match outcome {
            RunOutcome::Failed { kind, partial, .. } => {
                assert_eq!(kind, ErrorKind::Domain);
                assert!(partial.is_none());
            }
            RunOutcome::Completed { .. } => panic!("Expected a failed run"),
        }
    }

    #[test]
    fn test_result_serialization() {
        let mut request = rising_request();
        request.response_rates = vec![10.0];
        request.n_points = 5;
        let result = run_sweep(
            &request,
            &PhysicalConstants::default(),
            &SolverOptions::default(),
        )
        .unwrap();

        let json = serde_json::to_string(&result).expect("Serialization failed");
        assert!(json.contains("\"status\":\"completed\""));
        let parsed: SweepResult = serde_json::from_str(&json).expect("Deserialization failed");
        assert_eq!(parsed.runs.len(), 1);
        assert_eq!(parsed.direction, ForcingDirection::Rising);
    }
}
