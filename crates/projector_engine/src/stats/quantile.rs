//! Quantile selection over sorted samples.
//!
//! Two conventions are supported:
//!
//! | Method | Rule | Result |
//! |--------|------|--------|
//! | [`QuantileMethod::NearestRank`] | `sorted[clamp(floor(q·(n-1)), 0, n-1)]` | always a member of the sample |
//! | [`QuantileMethod::Linear`] | interpolate between the ranks around `q·(n-1)` | may fall between samples |
//!
//! Nearest rank is the default.

use std::fmt;
use std::str::FromStr;

/// Lower per-step quantile level.
pub const LOW_QUANTILE: f64 = 0.05;

/// Upper per-step quantile level.
pub const HIGH_QUANTILE: f64 = 0.95;

/// Quantile convention used by the aggregator and the risk analyser.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum QuantileMethod {
    /// Discrete selection at rank `floor(q·(n-1))`, no interpolation.
    #[default]
    NearestRank,
    /// Continuous interpolation between the two closest ranks.
    Linear,
}

impl QuantileMethod {
    /// Stable lowercase name of the method.
    pub fn as_str(&self) -> &'static str {
        match self {
            QuantileMethod::NearestRank => "nearest_rank",
            QuantileMethod::Linear => "linear",
        }
    }
}

impl fmt::Display for QuantileMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown quantile method name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnknownQuantileMethod(pub String);

impl fmt::Display for UnknownQuantileMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Unknown quantile method: {}. Must be one of: nearest_rank, linear",
            self.0
        )
    }
}

impl std::error::Error for UnknownQuantileMethod {}

impl FromStr for QuantileMethod {
    type Err = UnknownQuantileMethod;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "nearest_rank" | "nearest" => Ok(QuantileMethod::NearestRank),
            "linear" | "interpolated" => Ok(QuantileMethod::Linear),
            _ => Err(UnknownQuantileMethod(s.to_string())),
        }
    }
}

/// Index selected by the nearest-rank rule for `n` samples.
///
/// Returns `clamp(floor(q·(n-1)), 0, n-1)`; for `n = 0` the result is 0.
///
/// ```rust
/// use projector_engine::stats::nearest_rank_index;
///
/// assert_eq!(nearest_rank_index(0.05, 1000), 49);
/// assert_eq!(nearest_rank_index(0.95, 1000), 949);
/// assert_eq!(nearest_rank_index(0.05, 1), 0);
/// ```
#[inline]
pub fn nearest_rank_index(q: f64, n: usize) -> usize {
    let last = n.saturating_sub(1);
    let rank = (q * last as f64).floor();
    if rank <= 0.0 {
        0
    } else {
        (rank as usize).min(last)
    }
}

/// Quantile of an ascending-sorted, non-empty slice.
///
/// # Panics
///
/// Panics if `sorted` is empty.
pub fn quantile_sorted(sorted: &[f64], q: f64, method: QuantileMethod) -> f64 {
    assert!(!sorted.is_empty(), "quantile of an empty sample");

    match method {
        QuantileMethod::NearestRank => sorted[nearest_rank_index(q, sorted.len())],
        QuantileMethod::Linear => {
            let last = sorted.len() - 1;
            let position = (q * last as f64).clamp(0.0, last as f64);
            let lower = position.floor() as usize;
            let upper = position.ceil() as usize;
            let weight = position - lower as f64;
            sorted[lower] + (sorted[upper] - sorted[lower]) * weight
        }
    }
}

/// Sorts a sample ascending in place using the IEEE total order.
#[inline]
pub fn sort_ascending(values: &mut [f64]) {
    values.sort_unstable_by(f64::total_cmp);
}
