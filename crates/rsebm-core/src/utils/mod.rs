//! Numerical utilities.

pub mod root_finding;
