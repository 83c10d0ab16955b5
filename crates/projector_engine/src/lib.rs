//! # projector_engine: Monte Carlo Price Projection
//!
//! ## Engine Role
//!
//! projector_engine holds all the numerical work of the workspace:
//! - Per-path random draw streams (`rng`)
//! - The geometric trajectory generator and its price matrix (`paths`)
//! - Column-wise mean and quantile band (`stats`)
//! - Terminal summary and historical tail risk (`risk`)
//! - Orchestration of the above into one run (`engine`)
//!
//! Every stage is a pure function of its inputs. Randomness enters only
//! through an explicit [`rng::StreamFactory`], so a fixed seed reproduces a
//! run bit for bit, sequential or parallel.
//!
//! ## Usage Example
//!
//! ```rust
//! use projector_core::SimulationParameters;
//! use projector_engine::{EngineConfig, ProjectionEngine};
//!
//! let params = SimulationParameters::builder()
//!     .initial_value(100.0)
//!     .annual_volatility(20.0)
//!     .horizon(10)
//!     .path_count(1_000)
//!     .build()
//!     .unwrap();
//!
//! let projection = ProjectionEngine::new(EngineConfig::default()).run(&params, Some(42));
//!
//! assert_eq!(projection.simulated_paths().n_columns(), 11);
//! assert!(projection.tail_risk_absolute() >= 0.0);
//! ```
//!
//! ## Feature Flags
//!
//! - `serde`: Enable serialisation for `Projection` and its parts

#![warn(missing_docs)]

pub mod engine;
pub mod paths;
pub mod risk;
pub mod rng;
pub mod stats;

pub use engine::{EngineConfig, Projection, ProjectionEngine};
pub use paths::PriceMatrix;
pub use risk::{RiskMetric, TerminalSummary};
pub use stats::{QuantileMethod, TimeSeriesStatistics};
