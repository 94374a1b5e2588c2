//! Python bindings for the core result types and errors.

use crate::errors::EBMError;
use crate::timeseries::{EquilibriumCurve, FloatValue, TemperatureSeries};
use numpy::{PyArray1, ToPyArray};
use pyo3::create_exception;
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

create_exception!(rsebm, DomainError, PyValueError);
create_exception!(rsebm, DivergenceError, PyValueError);
create_exception!(rsebm, InvalidParameterError, PyValueError);
create_exception!(rsebm, ConfigError, PyValueError);

impl From<EBMError> for PyErr {
    fn from(err: EBMError) -> PyErr {
        let message = err.to_string();
        match err {
            EBMError::Domain { .. } => DomainError::new_err(message),
            EBMError::Divergence { .. } => DivergenceError::new_err(message),
            EBMError::InvalidParameter { .. } => InvalidParameterError::new_err(message),
            EBMError::Config(_) => ConfigError::new_err(message),
        }
    }
}

/// Surface temperature sampled on a time grid
#[pyclass(name = "TemperatureSeries")]
#[derive(Debug, Clone)]
pub struct PyTemperatureSeries(pub TemperatureSeries);

#[pymethods]
impl PyTemperatureSeries {
    #[getter]
    fn time<'py>(&self, py: Python<'py>) -> Bound<'py, PyArray1<FloatValue>> {
        self.0.time().to_pyarray_bound(py)
    }

    #[getter]
    fn temperature<'py>(&self, py: Python<'py>) -> Bound<'py, PyArray1<FloatValue>> {
        self.0.temperature().to_pyarray_bound(py)
    }

    fn __len__(&self) -> usize {
        self.0.len()
    }

    fn __repr__(&self) -> String {
        let (t_start, temperature_start) = self.0.first();
        let (t_end, temperature_end) = self.0.last();
        format!(
            "<TemperatureSeries n={} T({})={:.2} T({})={:.2}>",
            self.0.len(),
            t_start,
            temperature_start,
            t_end,
            temperature_end
        )
    }
}

/// Equilibrium temperatures as a function of a forcing level (CO2 or emissivity)
#[pyclass(name = "EquilibriumCurve")]
#[derive(Debug, Clone)]
pub struct PyEquilibriumCurve(pub EquilibriumCurve);

#[pymethods]
impl PyEquilibriumCurve {
    /// "static_equilibrium" or "tipping_line"
    #[getter]
    fn kind(&self) -> String {
        self.0.kind().to_string().replace(' ', "_")
    }

    #[getter]
    fn forcing<'py>(&self, py: Python<'py>) -> Bound<'py, PyArray1<FloatValue>> {
        self.0.forcing().to_pyarray_bound(py)
    }

    #[getter]
    fn temperature<'py>(&self, py: Python<'py>) -> Bound<'py, PyArray1<FloatValue>> {
        self.0.temperature().to_pyarray_bound(py)
    }

    fn __len__(&self) -> usize {
        self.0.len()
    }

    fn __repr__(&self) -> String {
        format!("<EquilibriumCurve kind={} n={}>", self.0.kind(), self.0.len())
    }
}

#[pymodule]
#[pyo3(name = "core")]
pub fn core_module(m: &Bound<'_, PyModule>) -> PyResult<()> {
    let py = m.py();
    m.add_class::<PyTemperatureSeries>()?;
    m.add_class::<PyEquilibriumCurve>()?;
    m.add("DomainError", py.get_type_bound::<DomainError>())?;
    m.add("DivergenceError", py.get_type_bound::<DivergenceError>())?;
    m.add(
        "InvalidParameterError",
        py.get_type_bound::<InvalidParameterError>(),
    )?;
    m.add("ConfigError", py.get_type_bound::<ConfigError>())?;
    Ok(())
}
