//! # projector_core: Value Types for Price Projection
//!
//! ## Foundation Role
//!
//! projector_core is the bottom layer of the workspace, providing:
//! - The validated parameter set consumed by the engine (`params`)
//! - The invalid-parameter error taxonomy (`error`)
//!
//! ## Minimal Dependency Principle
//!
//! This crate has no dependencies on other projector_* crates:
//! - thiserror: Error derivation
//! - serde: Serialisation support (optional)
//!
//! ## Usage Example
//!
//! ```rust
//! use projector_core::SimulationParameters;
//!
//! let params = SimulationParameters::builder()
//!     .initial_value(100.0)
//!     .annual_volatility(20.0)
//!     .horizon(10)
//!     .path_count(1_000)
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(params.columns(), 11);
//! ```
//!
//! Out-of-range input is rejected with one violation per offending field:
//!
//! ```rust
//! use projector_core::{ParameterError, SimulationParameters};
//!
//! let err = SimulationParameters::builder()
//!     .initial_value(0.0)
//!     .annual_volatility(20.0)
//!     .horizon(10)
//!     .path_count(50)
//!     .build()
//!     .unwrap_err();
//!
//! let ParameterError::Invalid(violations) = err;
//! assert_eq!(violations.len(), 2);
//! ```
//!
//! ## Feature Flags
//!
//! - `serde`: Enable serialisation for `SimulationParameters` and `FieldViolation`

#![warn(missing_docs)]

pub mod error;
pub mod params;

pub use error::{FieldViolation, ParameterError};
pub use params::{
    SimulationParameters, SimulationParametersBuilder, MAX_HORIZON, MAX_PATH_COUNT,
    MAX_VOLATILITY, MIN_HORIZON, MIN_PATH_COUNT, MIN_VOLATILITY, TRADING_DAYS,
};
