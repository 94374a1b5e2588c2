use crate::config::ModelConfig;
use crate::equilibrium;
use crate::feedback::ForcingDirection;
use crate::parameters::{Co2Range, TemperatureRange};
use crate::sweep::{self, RunOutcome, SweepResult, SweepRun};
use numpy::{PyArray1, ToPyArray};
use pyo3::prelude::*;
use rsebm_core::errors::EBMResult;
use rsebm_core::python::{PyEquilibriumCurve, PyTemperatureSeries};
use rsebm_core::timeseries::FloatValue;
use std::path::PathBuf;

fn load_config(config_path: Option<PathBuf>) -> EBMResult<ModelConfig> {
    match config_path {
        Some(path) => ModelConfig::from_path(path),
        None => Ok(ModelConfig::default()),
    }
}

/// Static equilibrium temperature across a CO2 range at a fixed albedo
#[pyfunction]
#[pyo3(signature = (co2_low, co2_high, albedo, n_points=100, config_path=None))]
fn compute_equilibrium(
    py: Python<'_>,
    co2_low: FloatValue,
    co2_high: FloatValue,
    albedo: FloatValue,
    n_points: usize,
    config_path: Option<PathBuf>,
) -> PyResult<PyEquilibriumCurve> {
    let config = load_config(config_path)?;
    let co2_range = Co2Range::new(co2_low, co2_high)?;
    let curve = py.allow_threads(|| {
        equilibrium::compute_equilibrium(&co2_range, albedo, n_points, &config.constants)
    })?;
    Ok(PyEquilibriumCurve(curve))
}

/// Emissivity at which each temperature in [t_low, t_high] is in equilibrium
#[pyfunction]
#[pyo3(signature = (t_low=220.0, t_high=350.0, n_points=100, config_path=None))]
fn compute_tipping_line(
    py: Python<'_>,
    t_low: FloatValue,
    t_high: FloatValue,
    n_points: usize,
    config_path: Option<PathBuf>,
) -> PyResult<PyEquilibriumCurve> {
    let config = load_config(config_path)?;
    let range = TemperatureRange::new(t_low, t_high, n_points)?;
    let curve =
        py.allow_threads(|| equilibrium::compute_tipping_line(&range, &config.constants))?;
    Ok(PyEquilibriumCurve(curve))
}

/// Integrate the energy balance for each response rate.
///
/// `direction` is "rising" or "falling". Constants, solver tolerances and the tipping line range
/// come from `config_path` when given.
#[pyfunction]
#[pyo3(signature = (response_rates, direction, horizon=None, initial_temperature=237.0, n_points=200, config_path=None))]
fn run_sweep(
    py: Python<'_>,
    response_rates: Vec<FloatValue>,
    direction: &str,
    horizon: Option<FloatValue>,
    initial_temperature: FloatValue,
    n_points: usize,
    config_path: Option<PathBuf>,
) -> PyResult<PySweepResult> {
    let config = load_config(config_path)?;
    let direction: ForcingDirection = direction.parse()?;

    let mut request = config.sweep_request(direction);
    request.response_rates = response_rates;
    request.initial_temperature = initial_temperature;
    request.n_points = n_points;
    if let Some(horizon) = horizon {
        request.horizon = horizon;
    }

    let result =
        py.allow_threads(|| sweep::run_sweep(&request, &config.constants, &config.solver))?;
    Ok(PySweepResult(result))
}

/// A single run of a sweep
#[pyclass(name = "SweepRun")]
#[derive(Debug, Clone)]
pub struct PySweepRun(pub SweepRun);

#[pymethods]
impl PySweepRun {
    #[getter]
    fn response_rate(&self) -> FloatValue {
        self.0.response_rate
    }

    /// "completed" or "failed"
    #[getter]
    fn status(&self) -> &'static str {
        if self.0.is_completed() {
            "completed"
        } else {
            "failed"
        }
    }

    /// Temperature series of a completed run
    #[getter]
    fn series(&self) -> Option<PyTemperatureSeries> {
        self.0.series().cloned().map(PyTemperatureSeries)
    }

    /// Name of the error that stopped a failed run
    #[getter]
    fn error_kind(&self) -> Option<String> {
        match &self.0.outcome {
            RunOutcome::Failed { kind, .. } => Some(kind.to_string()),
            RunOutcome::Completed { .. } => None,
        }
    }

    #[getter]
    fn message(&self) -> Option<String> {
        match &self.0.outcome {
            RunOutcome::Failed { message, .. } => Some(message.clone()),
            RunOutcome::Completed { .. } => None,
        }
    }

    /// Samples computed before a failed run stopped
    #[getter]
    fn partial(&self) -> Option<PyTemperatureSeries> {
        match &self.0.outcome {
            RunOutcome::Failed { partial, .. } => partial.clone().map(PyTemperatureSeries),
            RunOutcome::Completed { .. } => None,
        }
    }

    fn __repr__(&self) -> String {
        format!(
            "<SweepRun response_rate={} status={}>",
            self.0.response_rate,
            self.status()
        )
    }
}

#[pyclass(name = "SweepResult")]
#[derive(Debug, Clone)]
pub struct PySweepResult(pub SweepResult);

#[pymethods]
impl PySweepResult {
    #[getter]
    fn direction(&self) -> String {
        self.0.direction.to_string()
    }

    #[getter]
    fn time<'py>(&self, py: Python<'py>) -> Bound<'py, PyArray1<FloatValue>> {
        self.0.time.to_pyarray_bound(py)
    }

    /// Emissivity at each time
    #[getter]
    fn forcing<'py>(&self, py: Python<'py>) -> Bound<'py, PyArray1<FloatValue>> {
        self.0.forcing.to_pyarray_bound(py)
    }

    #[getter]
    fn tipping_line(&self) -> PyEquilibriumCurve {
        PyEquilibriumCurve(self.0.tipping_line.clone())
    }

    #[getter]
    fn runs(&self) -> Vec<PySweepRun> {
        self.0.runs.iter().cloned().map(PySweepRun).collect()
    }

    fn is_complete(&self) -> bool {
        self.0.is_complete()
    }

    fn __len__(&self) -> usize {
        self.0.runs.len()
    }

    fn __repr__(&self) -> String {
        format!(
            "<SweepResult direction={} runs={} completed={}>",
            self.0.direction,
            self.0.runs.len(),
            self.0.completed().count()
        )
    }
}

#[pymodule]
#[pyo3(name = "components")]
pub fn components_module(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(compute_equilibrium, m)?)?;
    m.add_function(wrap_pyfunction!(compute_tipping_line, m)?)?;
    m.add_function(wrap_pyfunction!(run_sweep, m)?)?;
    m.add_class::<PySweepResult>()?;
    m.add_class::<PySweepRun>()?;
    Ok(())
}
