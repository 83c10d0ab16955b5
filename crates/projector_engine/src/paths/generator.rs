//! Geometric path generation.
//!
//! Each path follows the discrete log-space recurrence
//! ```text
//! S[t] = S[t-1] × exp((μ - 0.5σ_d²)Δt + σ_d √Δt × Z)
//! ```
//! with μ = 0, Δt = 1/252 and σ_d the daily volatility. The exponential keeps
//! every price strictly positive whatever the draw, so no clamping is needed.

use projector_core::{SimulationParameters, TRADING_DAYS};
use rayon::prelude::*;

use super::matrix::PriceMatrix;
use crate::rng::{NormalSource, StreamFactory};

/// Drift rate of the projection. Risk-neutral, no drift term.
pub const DRIFT_RATE: f64 = 0.0;

/// Precomputed per-step constants of the recurrence.
#[derive(Clone, Copy, Debug)]
struct StepCoefficients {
    drift_dt: f64,
    vol_sqrt_dt: f64,
}

impl StepCoefficients {
    fn new(params: &SimulationParameters) -> Self {
        let daily_volatility = params.daily_volatility();
        let dt = 1.0 / TRADING_DAYS;

        Self {
            drift_dt: (DRIFT_RATE - 0.5 * daily_volatility * daily_volatility) * dt,
            vol_sqrt_dt: daily_volatility * dt.sqrt(),
        }
    }
}

/// Generates the full price matrix for `params`.
///
/// Path `p` consumes draws only from `streams.stream(p)`, one per step and in
/// step order. The sequential and parallel passes therefore produce
/// bit-identical matrices.
///
/// # Arguments
///
/// * `params` - Validated simulation parameters
/// * `streams` - Per-path random draw streams
/// * `parallel` - Fill rows on the rayon pool instead of the calling thread
///
/// # Panics
///
/// Panics if a stream yields a non-finite draw. That can only happen when the
/// random source itself is broken and is not a recoverable condition.
///
/// # Examples
///
/// ```rust
/// use projector_core::SimulationParameters;
/// use projector_engine::paths::generate_paths;
/// use projector_engine::rng::SeededStreams;
///
/// let params = SimulationParameters::builder()
///     .initial_value(100.0)
///     .annual_volatility(20.0)
///     .horizon(5)
///     .path_count(100)
///     .build()
///     .unwrap();
///
/// let matrix = generate_paths(&params, &SeededStreams::new(42), false);
/// assert_eq!(matrix.n_paths(), 100);
/// assert_eq!(matrix.n_columns(), 6);
/// ```
pub fn generate_paths<F>(params: &SimulationParameters, streams: &F, parallel: bool) -> PriceMatrix
where
    F: StreamFactory,
{
    let coefficients = StepCoefficients::new(params);
    let initial_value = params.initial_value();
    let n_columns = params.columns();

    let mut matrix = PriceMatrix::zeros(params.path_count(), n_columns);
    let rows = matrix.as_mut_slice();

    let fill_row = |(path_idx, row): (usize, &mut [f64])| {
        let mut stream = streams.stream(path_idx);
        evolve_path(row, initial_value, coefficients, &mut stream, path_idx);
    };

    if parallel {
        rows.par_chunks_mut(n_columns).enumerate().for_each(fill_row);
    } else {
        rows.chunks_mut(n_columns).enumerate().for_each(fill_row);
    }

    matrix
}

#[inline]
fn evolve_path<S: NormalSource>(
    row: &mut [f64],
    initial_value: f64,
    coefficients: StepCoefficients,
    stream: &mut S,
    path_idx: usize,
) {
    row[0] = initial_value;

    for step in 1..row.len() {
        let z = stream.next_normal();
        assert!(
            z.is_finite(),
            "random source produced non-finite draw {} at path {}, step {}",
            z,
            path_idx,
            step
        );
        let log_return = coefficients.drift_dt + coefficients.vol_sqrt_dt * z;
        row[step] = row[step - 1] * log_return.exp();
    }
}
