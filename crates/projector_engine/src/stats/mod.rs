//! Time-series aggregation.
//!
//! Reduces each column of the price matrix to a mean and a low/high quantile
//! band. Columns are independent units of work.

mod quantile;
mod series;

pub use quantile::{
    nearest_rank_index, quantile_sorted, sort_ascending, QuantileMethod, UnknownQuantileMethod,
    HIGH_QUANTILE, LOW_QUANTILE,
};
pub use series::TimeSeriesStatistics;
