//! Time axes and the result series produced by the model.
//!
//! Both [`TemperatureSeries`] and [`EquilibriumCurve`] are plain value types. They are validated
//! on construction and never mutated afterwards.

use crate::errors::{EBMError, EBMResult};
use ndarray::Array1;
use serde::{Deserialize, Serialize};
use std::fmt;

pub type FloatValue = f64;
pub type Time = f64;

/// Evenly spaced points between `start` and `end` (inclusive).
pub fn linspace(start: FloatValue, end: FloatValue, n_points: usize) -> EBMResult<Array1<FloatValue>> {
    if n_points < 2 {
        return Err(EBMError::invalid_parameter(
            "n_points",
            format!("at least 2 points are required, got {}", n_points),
        ));
    }
    if !start.is_finite() || !end.is_finite() {
        return Err(EBMError::invalid_parameter(
            "range",
            format!("bounds must be finite, got [{}, {}]", start, end),
        ));
    }
    if start == end {
        return Err(EBMError::invalid_parameter(
            "range",
            format!("bounds must differ, got [{}, {}]", start, end),
        ));
    }
    Ok(Array1::linspace(start, end, n_points))
}

/// Check that a time grid is non-empty, finite and strictly increasing.
pub fn validate_time_grid(time: &[Time]) -> EBMResult<()> {
    if time.is_empty() {
        return Err(EBMError::invalid_parameter(
            "time",
            "the time grid must contain at least one point",
        ));
    }
    if let Some(t) = time.iter().find(|t| !t.is_finite()) {
        return Err(EBMError::invalid_parameter(
            "time",
            format!("time points must be finite, got {}", t),
        ));
    }
    if let Some(i) = time.windows(2).position(|w| w[1] <= w[0]) {
        return Err(EBMError::invalid_parameter(
            "time",
            format!(
                "time must be strictly increasing: t[{}]={} is not after t[{}]={}",
                i + 1,
                time[i + 1],
                i,
                time[i]
            ),
        ));
    }
    Ok(())
}

/// Surface temperature sampled on a time grid.
///
/// Invariants: `time` and `temperature` have the same non-zero length, `time` is strictly
/// increasing and every temperature is finite.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawTemperatureSeries")]
pub struct TemperatureSeries {
    time: Array1<Time>,
    temperature: Array1<FloatValue>,
}

/// Unchecked form of [`TemperatureSeries`] used while deserialising
#[derive(Deserialize)]
struct RawTemperatureSeries {
    time: Array1<Time>,
    temperature: Array1<FloatValue>,
}

impl TryFrom<RawTemperatureSeries> for TemperatureSeries {
    type Error = EBMError;

    fn try_from(raw: RawTemperatureSeries) -> EBMResult<Self> {
        Self::new(raw.time, raw.temperature)
    }
}

impl TemperatureSeries {
    pub fn new(
        time: impl Into<Array1<Time>>,
        temperature: impl Into<Array1<FloatValue>>,
    ) -> EBMResult<Self> {
        let time = time.into();
        let temperature = temperature.into();

        if time.len() != temperature.len() {
            return Err(EBMError::invalid_parameter(
                "temperature",
                format!(
                    "expected {} temperatures to match the time grid, got {}",
                    time.len(),
                    temperature.len()
                ),
            ));
        }
        validate_time_grid(time.as_slice().unwrap_or(&time.to_vec()))?;
        if let Some(value) = temperature.iter().find(|v| !v.is_finite()) {
            return Err(EBMError::invalid_parameter(
                "temperature",
                format!("temperatures must be finite, got {}", value),
            ));
        }

        Ok(Self { time, temperature })
    }

    pub fn time(&self) -> &Array1<Time> {
        &self.time
    }

    pub fn temperature(&self) -> &Array1<FloatValue> {
        &self.temperature
    }

    pub fn len(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    /// The initial `(time, temperature)` sample
    pub fn first(&self) -> (Time, FloatValue) {
        (self.time[0], self.temperature[0])
    }

    /// The final `(time, temperature)` sample
    pub fn last(&self) -> (Time, FloatValue) {
        let i = self.len() - 1;
        (self.time[i], self.temperature[i])
    }

    /// Temperature at an exact grid time, if that time is on the grid
    pub fn at(&self, time: Time) -> Option<FloatValue> {
        self.time
            .iter()
            .position(|t| *t == time)
            .map(|i| self.temperature[i])
    }

    pub fn iter(&self) -> impl Iterator<Item = (Time, FloatValue)> + '_ {
        self.time
            .iter()
            .zip(self.temperature.iter())
            .map(|(t, v)| (*t, *v))
    }
}

/// Which relation an [`EquilibriumCurve`] describes.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CurveKind {
    /// Equilibrium temperature as a function of CO2 (ppm) at fixed albedo
    StaticEquilibrium,
    /// Emissivity at which each temperature is in equilibrium, with temperature-dependent albedo
    TippingLine,
}

impl fmt::Display for CurveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CurveKind::StaticEquilibrium => write!(f, "static equilibrium"),
            CurveKind::TippingLine => write!(f, "tipping line"),
        }
    }
}

/// Ordered `(forcing_level, temperature)` pairs.
///
/// For [`CurveKind::StaticEquilibrium`] the forcing level is CO2 in ppm,
/// for [`CurveKind::TippingLine`] it is the emissivity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawEquilibriumCurve")]
pub struct EquilibriumCurve {
    kind: CurveKind,
    forcing: Array1<FloatValue>,
    temperature: Array1<FloatValue>,
}

#[derive(Deserialize)]
struct RawEquilibriumCurve {
    kind: CurveKind,
    forcing: Array1<FloatValue>,
    temperature: Array1<FloatValue>,
}

impl TryFrom<RawEquilibriumCurve> for EquilibriumCurve {
    type Error = EBMError;

    fn try_from(raw: RawEquilibriumCurve) -> EBMResult<Self> {
        Self::new(raw.kind, raw.forcing, raw.temperature)
    }
}

impl EquilibriumCurve {
    pub fn new(
        kind: CurveKind,
        forcing: impl Into<Array1<FloatValue>>,
        temperature: impl Into<Array1<FloatValue>>,
    ) -> EBMResult<Self> {
        let forcing = forcing.into();
        let temperature = temperature.into();

        if forcing.len() != temperature.len() {
            return Err(EBMError::invalid_parameter(
                "forcing",
                format!(
                    "expected {} forcing levels to match the temperatures, got {}",
                    temperature.len(),
                    forcing.len()
                ),
            ));
        }
        if forcing
            .iter()
            .chain(temperature.iter())
            .any(|v| !v.is_finite())
        {
            return Err(EBMError::invalid_parameter(
                "forcing",
                format!("{} values must be finite", kind),
            ));
        }

        Ok(Self {
            kind,
            forcing,
            temperature,
        })
    }

    pub fn kind(&self) -> CurveKind {
        self.kind
    }

    pub fn forcing(&self) -> &Array1<FloatValue> {
        &self.forcing
    }

    pub fn temperature(&self) -> &Array1<FloatValue> {
        &self.temperature
    }

    pub fn len(&self) -> usize {
        self.forcing.len()
    }

    pub fn is_empty(&self) -> bool {
        self.forcing.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (FloatValue, FloatValue)> + '_ {
        self.forcing
            .iter()
            .zip(self.temperature.iter())
            .map(|(f, t)| (*f, *t))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_linspace_includes_both_ends() {
        let t = linspace(0.0, 3.5, 200).unwrap();
        assert_eq!(t.len(), 200);
        assert_eq!(t[0], 0.0);
        assert!((t[199] - 3.5).abs() < 1e-12);
    }

    #[test]
    fn test_linspace_rejects_degenerate_ranges() {
        assert!(linspace(0.0, 1.0, 1).is_err());
        assert!(linspace(1.0, 1.0, 10).is_err());
        assert!(linspace(0.0, f64::NAN, 10).is_err());
    }

    #[test]
    fn test_time_grid_must_increase() {
        assert!(validate_time_grid(&[0.0, 1.0, 2.0]).is_ok());
        assert!(validate_time_grid(&[0.0]).is_ok());
        assert!(validate_time_grid(&[]).is_err());
        assert!(validate_time_grid(&[0.0, 1.0, 1.0]).is_err());
        assert!(validate_time_grid(&[0.0, 2.0, 1.0]).is_err());
    }

    #[test]
    fn test_series_accessors() {
        let series =
            TemperatureSeries::new(array![0.0, 1.0, 2.0], array![237.0, 238.5, 240.0]).unwrap();
        assert_eq!(series.len(), 3);
        assert_eq!(series.first(), (0.0, 237.0));
        assert_eq!(series.last(), (2.0, 240.0));
        assert_eq!(series.at(1.0), Some(238.5));
        assert_eq!(series.at(1.5), None);
        assert_eq!(series.iter().count(), 3);
    }

    #[test]
    fn test_series_rejects_broken_invariants() {
        assert!(TemperatureSeries::new(vec![0.0, 1.0], vec![237.0]).is_err());
        assert!(TemperatureSeries::new(vec![1.0, 0.0], vec![237.0, 238.0]).is_err());
        assert!(TemperatureSeries::new(vec![0.0, 1.0], vec![237.0, f64::NAN]).is_err());
        assert!(TemperatureSeries::new(Vec::<f64>::new(), Vec::<f64>::new()).is_err());
    }

    #[test]
    fn test_curve_rejects_non_finite_values() {
        let err = EquilibriumCurve::new(
            CurveKind::TippingLine,
            vec![0.5, f64::INFINITY],
            vec![250.0, 260.0],
        )
        .unwrap_err();
        assert!(err.to_string().contains("tipping line"));
    }

    #[test]
    fn test_series_serialization() {
        let series = TemperatureSeries::new(vec![0.0, 1.0], vec![237.0, 239.0]).unwrap();
        let json = serde_json::to_string(&series).expect("Serialization failed");
        let parsed: TemperatureSeries =
            serde_json::from_str(&json).expect("Deserialization failed");
        assert_eq!(series, parsed);
    }

    #[test]
    fn test_deserialization_checks_invariants() {
        let valid = TemperatureSeries::new(vec![0.0, 1.0], vec![237.0, 239.0]).unwrap();
        let mut value = serde_json::to_value(&valid).unwrap();
        value["time"] = serde_json::to_value(array![1.0, 0.0]).unwrap();
        let err = serde_json::from_value::<TemperatureSeries>(value).unwrap_err();
        assert!(err.to_string().contains("strictly increasing"), "{}", err);

        let curve =
            EquilibriumCurve::new(CurveKind::StaticEquilibrium, vec![280.0, 300.0], vec![287.0, 288.0])
                .unwrap();
        let mut value = serde_json::to_value(&curve).unwrap();
        value["temperature"] = serde_json::to_value(array![287.0]).unwrap();
        assert!(serde_json::from_value::<EquilibriumCurve>(value).is_err());

        let json = serde_json::to_string(&curve).unwrap();
        let parsed: EquilibriumCurve = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, curve);
    }
}
