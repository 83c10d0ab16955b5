//! Per-step reduction of the price matrix.

use rayon::prelude::*;

use super::quantile::{
    quantile_sorted, sort_ascending, QuantileMethod, HIGH_QUANTILE, LOW_QUANTILE,
};
use crate::paths::PriceMatrix;

/// Column-wise statistics of a [`PriceMatrix`].
///
/// All three sequences have length `horizon + 1`; entry `t` summarises the
/// distribution of prices at step `t`.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct TimeSeriesStatistics {
    /// Arithmetic mean per step.
    pub mean: Vec<f64>,
    /// [`LOW_QUANTILE`] per step.
    pub low_quantile: Vec<f64>,
    /// [`HIGH_QUANTILE`] per step.
    pub high_quantile: Vec<f64>,
}

/// Statistics of a single column.
#[derive(Clone, Copy, Debug, PartialEq)]
struct ColumnSummary {
    mean: f64,
    low: f64,
    high: f64,
}

impl TimeSeriesStatistics {
    /// Reduces every column of `matrix` independently.
    ///
    /// With `parallel`, columns are reduced on the rayon pool. The result
    /// does not depend on the flag.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use projector_core::SimulationParameters;
    /// use projector_engine::paths::generate_paths;
    /// use projector_engine::rng::SeededStreams;
    /// use projector_engine::stats::{QuantileMethod, TimeSeriesStatistics};
    ///
    /// let params = SimulationParameters::builder()
    ///     .initial_value(100.0)
    ///     .annual_volatility(20.0)
    ///     .horizon(10)
    ///     .path_count(1_000)
    ///     .build()
    ///     .unwrap();
    /// let matrix = generate_paths(&params, &SeededStreams::new(42), true);
    ///
    /// let stats = TimeSeriesStatistics::aggregate(&matrix, QuantileMethod::NearestRank, true);
    /// assert_eq!(stats.len(), 11);
    /// assert_eq!(stats.mean[0], 100.0);
    /// ```
    pub fn aggregate(matrix: &PriceMatrix, method: QuantileMethod, parallel: bool) -> Self {
        let n_columns = matrix.n_columns();

        let summaries: Vec<ColumnSummary> = if parallel {
            (0..n_columns)
                .into_par_iter()
                .map(|step| summarise_column(matrix.column(step), method))
                .collect()
        } else {
            (0..n_columns)
                .map(|step| summarise_column(matrix.column(step), method))
                .collect()
        };

        let mut stats = Self {
            mean: Vec::with_capacity(n_columns),
            low_quantile: Vec::with_capacity(n_columns),
            high_quantile: Vec::with_capacity(n_columns),
        };
        for summary in summaries {
            stats.mean.push(summary.mean);
            stats.low_quantile.push(summary.low);
            stats.high_quantile.push(summary.high);
        }
        stats
    }

    /// Number of steps covered (`horizon + 1`).
    #[inline]
    pub fn len(&self) -> usize {
        self.mean.len()
    }

    /// Returns `true` if no step is covered.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.mean.is_empty()
    }
}

fn summarise_column(mut column: Vec<f64>, method: QuantileMethod) -> ColumnSummary {
    let mean = column.iter().sum::<f64>() / column.len() as f64;
    sort_ascending(&mut column);

    // A flat column must report its own value, whatever the sum rounded to
    let mean = mean.clamp(column[0], column[column.len() - 1]);

    ColumnSummary {
        mean,
        low: quantile_sorted(&column, LOW_QUANTILE, method),
        high: quantile_sorted(&column, HIGH_QUANTILE, method),
    }
}
