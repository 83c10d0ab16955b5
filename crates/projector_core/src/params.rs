//! Simulation parameter set.
//!
//! [`SimulationParameters`] is the validated input of a projection run. It can
//! only be obtained through [`SimulationParametersBuilder::build`], which checks
//! every field against its documented range before any path is generated.

use crate::error::{FieldViolation, ParameterError};

/// Trading days per year used to annualise volatility and size the time step.
pub const TRADING_DAYS: f64 = 252.0;

/// Lowest accepted annual volatility, in percent.
pub const MIN_VOLATILITY: f64 = 0.0;

/// Highest accepted annual volatility, in percent.
pub const MAX_VOLATILITY: f64 = 200.0;

/// Shortest accepted horizon, in time steps.
pub const MIN_HORIZON: i64 = 1;

/// Longest accepted horizon, in time steps.
pub const MAX_HORIZON: i64 = 365;

/// Smallest accepted number of simulated paths.
pub const MIN_PATH_COUNT: i64 = 100;

/// Largest accepted number of simulated paths.
pub const MAX_PATH_COUNT: i64 = 10_000;

/// Validated, immutable inputs of a projection run.
///
/// # Invariants
///
/// - `initial_value` is finite and strictly positive
/// - `annual_volatility` is finite and within [0, 200] percent
/// - `horizon` is within [1, 365]
/// - `path_count` is within [100, 10_000]
///
/// # Examples
///
/// ```rust
/// use projector_core::SimulationParameters;
///
/// let params = SimulationParameters::builder()
///     .initial_value(250.0)
///     .annual_volatility(35.0)
///     .horizon(30)
///     .path_count(500)
///     .build()
///     .expect("valid parameters");
///
/// assert_eq!(params.horizon(), 30);
/// assert_eq!(params.path_count(), 500);
/// ```
///
/// Only `Serialize` is offered under the `serde` feature; deserialising would
/// bypass validation.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SimulationParameters {
    initial_value: f64,
    annual_volatility: f64,
    horizon: usize,
    path_count: usize,
}

impl SimulationParameters {
    /// Creates a new parameter builder.
    #[inline]
    pub fn builder() -> SimulationParametersBuilder {
        SimulationParametersBuilder::default()
    }

    /// Initial asset value (S₀).
    #[inline]
    pub fn initial_value(&self) -> f64 {
        self.initial_value
    }

    /// Annual volatility in percent.
    #[inline]
    pub fn annual_volatility(&self) -> f64 {
        self.annual_volatility
    }

    /// Number of time steps to project.
    #[inline]
    pub fn horizon(&self) -> usize {
        self.horizon
    }

    /// Number of simulated paths.
    #[inline]
    pub fn path_count(&self) -> usize {
        self.path_count
    }

    /// Number of columns in the price matrix (`horizon + 1`, step 0 included).
    #[inline]
    pub fn columns(&self) -> usize {
        self.horizon + 1
    }

    /// Daily volatility as a fraction: `annual_volatility / 100 / sqrt(252)`.
    #[inline]
    pub fn daily_volatility(&self) -> f64 {
        self.annual_volatility / 100.0 / TRADING_DAYS.sqrt()
    }
}

/// Builder for [`SimulationParameters`].
///
/// Accepts values exactly as received from the boundary. Horizon and path
/// count are signed so that negative input surfaces as a range violation on
/// the right field instead of a type error.
#[derive(Clone, Debug, Default)]
pub struct SimulationParametersBuilder {
    initial_value: Option<f64>,
    annual_volatility: Option<f64>,
    horizon: Option<i64>,
    path_count: Option<i64>,
}

impl SimulationParametersBuilder {
    /// Sets the initial asset value.
    #[inline]
    pub fn initial_value(mut self, value: f64) -> Self {
        self.initial_value = Some(value);
        self
    }

    /// Sets the annual volatility, in percent.
    #[inline]
    pub fn annual_volatility(mut self, value: f64) -> Self {
        self.annual_volatility = Some(value);
        self
    }

    /// Sets the horizon, in time steps.
    #[inline]
    pub fn horizon(mut self, value: i64) -> Self {
        self.horizon = Some(value);
        self
    }

    /// Sets the number of simulated paths.
    #[inline]
    pub fn path_count(mut self, value: i64) -> Self {
        self.path_count = Some(value);
        self
    }

    /// Validates every field and builds the parameter set.
    ///
    /// # Errors
    ///
    /// Returns [`ParameterError::Invalid`] listing every missing or
    /// out-of-range field.
    pub fn build(self) -> Result<SimulationParameters, ParameterError> {
        let mut violations = Vec::new();

        let initial_value = match self.initial_value {
            None => missing(&mut violations, "initial_value"),
            Some(v) if !v.is_finite() || v <= 0.0 => {
                violations.push(FieldViolation::new(
                    "initial_value",
                    format!("must be a finite number greater than 0, got {}", v),
                ));
                None
            }
            Some(v) => Some(v),
        };

        let annual_volatility = match self.annual_volatility {
            None => missing(&mut violations, "annual_volatility"),
            Some(v) if !v.is_finite() || !(MIN_VOLATILITY..=MAX_VOLATILITY).contains(&v) => {
                violations.push(FieldViolation::new(
                    "annual_volatility",
                    format!(
                        "must be between {} and {} percent, got {}",
                        MIN_VOLATILITY, MAX_VOLATILITY, v
                    ),
                ));
                None
            }
            Some(v) => Some(v),
        };

        let horizon = checked_count(
            &mut violations,
            "horizon",
            self.horizon,
            MIN_HORIZON,
            MAX_HORIZON,
        );
        let path_count = checked_count(
            &mut violations,
            "path_count",
            self.path_count,
            MIN_PATH_COUNT,
            MAX_PATH_COUNT,
        );

        match (initial_value, annual_volatility, horizon, path_count) {
            (Some(initial_value), Some(annual_volatility), Some(horizon), Some(path_count))
                if violations.is_empty() =>
            {
                Ok(SimulationParameters {
                    initial_value,
                    annual_volatility,
                    horizon,
                    path_count,
                })
            }
            _ => Err(ParameterError::Invalid(violations)),
        }
    }
}

fn missing<T>(violations: &mut Vec<FieldViolation>, field: &str) -> Option<T> {
    violations.push(FieldViolation::new(field, "must be specified"));
    None
}

fn checked_count(
    violations: &mut Vec<FieldViolation>,
    field: &str,
    value: Option<i64>,
    min: i64,
    max: i64,
) -> Option<usize> {
    match value {
        None => missing(violations, field),
        Some(v) if !(min..=max).contains(&v) => {
            violations.push(FieldViolation::new(
                field,
                format!("must be between {} and {}, got {}", min, max, v),
            ));
            None
        }
        // In range, so the cast cannot truncate or wrap
        Some(v) => Some(v as usize),
    }
}
