//! Core types for a zero-dimensional energy balance model.
//!
//! This crate holds the pieces that do not depend on the physics of the model:
//! errors, result series, physical constants and the ODE integration plumbing.

pub mod constants;
pub mod errors;
pub mod ivp;
#[cfg(feature = "python")]
pub mod python;
pub mod timeseries;
pub mod utils;
