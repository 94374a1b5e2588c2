use crate::timeseries::{TemperatureSeries, Time};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Error type for invalid operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EBMError {
    /// A value fell outside the domain of a power or division term.
    #[error("Domain error for {quantity}: {details}")]
    Domain { quantity: String, details: String },
    /// Integration produced a non-finite temperature before reaching the end of the grid.
    ///
    /// `partial` holds the samples up to the last finite point.
    #[error("Integration diverged at t={time}: {reason}")]
    Divergence {
        time: Time,
        reason: String,
        partial: Box<TemperatureSeries>,
    },
    #[error("Invalid parameter `{parameter}`: {details}")]
    InvalidParameter { parameter: String, details: String },
    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl EBMError {
    pub fn domain(quantity: impl Into<String>, details: impl Into<String>) -> Self {
        Self::Domain {
            quantity: quantity.into(),
            details: details.into(),
        }
    }

    pub fn invalid_parameter(parameter: impl Into<String>, details: impl Into<String>) -> Self {
        Self::InvalidParameter {
            parameter: parameter.into(),
            details: details.into(),
        }
    }

    /// Tag describing which class of failure this is
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Domain { .. } => ErrorKind::Domain,
            Self::Divergence { .. } => ErrorKind::Divergence,
            Self::InvalidParameter { .. } => ErrorKind::InvalidParameter,
            Self::Config(_) => ErrorKind::Config,
        }
    }

    /// Samples produced before a divergence, if any
    pub fn partial_series(&self) -> Option<&TemperatureSeries> {
        match self {
            Self::Divergence { partial, .. } => Some(partial),
            _ => None,
        }
    }
}

/// Serializable tag for an [`EBMError`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    Domain,
    Divergence,
    InvalidParameter,
    Config,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::Domain => "DomainError",
            ErrorKind::Divergence => "DivergenceError",
            ErrorKind::InvalidParameter => "InvalidParameterError",
            ErrorKind::Config => "ConfigError",
        };
        write!(f, "{}", name)
    }
}

/// Convenience type for `Result<T, EBMError>`.
pub type EBMResult<T> = Result<T, EBMError>;
