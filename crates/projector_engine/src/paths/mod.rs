//! Trajectory generation.
//!
//! - [`generate_paths`]: fills a [`PriceMatrix`] from validated parameters
//!   and a per-path stream factory
//! - [`PriceMatrix`]: the dense `path_count × (horizon + 1)` result

mod generator;
mod matrix;

pub use generator::{generate_paths, DRIFT_RATE};
pub use matrix::PriceMatrix;
