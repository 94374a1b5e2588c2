//! Physics of the zero-dimensional energy balance model
//!
//! # Module Organisation
//!
//! - `feedback`: albedo and emissivity as functions of temperature, CO2 and time
//! - `equilibrium`: closed-form steady states (static equilibrium, tipping line)
//! - `energy_balance`: the time-dependent energy balance ODE
//! - `sweep`: runs of the ODE across several response rates
//! - `config`: TOML configuration for all of the above
//!
//! # Example
//!
//! ```
//! use rsebm_components::feedback::ForcingDirection;
//! use rsebm_components::sweep::{run_sweep, SweepRequest};
//! use rsebm_core::constants::PhysicalConstants;
//! use rsebm_core::ivp::SolverOptions;
//!
//! let request = SweepRequest::new(vec![1.0, 10.0], ForcingDirection::Rising);
//! let result = run_sweep(
//!     &request,
//!     &PhysicalConstants::default(),
//!     &SolverOptions::default(),
//! )
//! .unwrap();
//! assert!(result.is_complete());
//! ```

pub mod config;
pub mod energy_balance;
pub mod equilibrium;
pub mod feedback;
pub mod parameters;
#[cfg(feature = "python")]
pub mod python;
pub mod sweep;
