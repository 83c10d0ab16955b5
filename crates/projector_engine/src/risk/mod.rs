//! Terminal distribution summary and tail risk.
//!
//! The risk figure is a historical-simulation Value-at-Risk over the
//! simulated terminal distribution:
//!
//! 1. relative change of each path, `r = (S_T - S_0) / S_0`
//! 2. sort ascending and select the 5% quantile, `r*`, with the same rank
//!    rule as the per-step low quantile
//! 3. absolute risk `S_0 × |r*|`, percentage risk `100 × r*`
//!
//! A negative percentage is an expected loss. A positive one means even the
//! loss tail ends above the initial value, which only happens in degenerate
//! low-volatility or small-sample runs.

use crate::stats::{quantile_sorted, sort_ascending, QuantileMethod, LOW_QUANTILE};

/// Confidence level of the tail risk figure. The tail quantile is
/// [`LOW_QUANTILE`], i.e. `1 - VAR_CONFIDENCE`.
pub const VAR_CONFIDENCE: f64 = 0.95;

/// Plain reductions over the final column.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct TerminalSummary {
    /// Mean terminal value.
    pub mean: f64,
    /// Lowest terminal value.
    pub min: f64,
    /// Highest terminal value.
    pub max: f64,
}

/// Tail risk at [`VAR_CONFIDENCE`].
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct RiskMetric {
    /// Loss amount at the tail, `S_0 × |r*|`; never negative.
    pub absolute: f64,
    /// Signed tail return in percent, `100 × r*`.
    pub percentage: f64,
    /// Selected relative change `r*`.
    pub tail_return: f64,
}

impl TerminalSummary {
    /// Mean, minimum and maximum of `terminal_values`.
    ///
    /// # Panics
    ///
    /// Panics if `terminal_values` is empty.
    pub fn from_values(terminal_values: &[f64]) -> Self {
        assert!(!terminal_values.is_empty(), "no terminal values");

        let (sum, min, max) = terminal_values.iter().fold(
            (0.0, f64::INFINITY, f64::NEG_INFINITY),
            |(sum, min, max), &v| (sum + v, min.min(v), max.max(v)),
        );

        // Rounding in the sum can push the mean of a flat column past its bounds
        let mean = (sum / terminal_values.len() as f64).clamp(min, max);

        Self { mean, min, max }
    }
}

impl RiskMetric {
    /// Tail risk of `terminal_values` relative to `initial_value`.
    ///
    /// `initial_value` is strictly positive for any validated parameter set,
    /// so the relative change is always defined.
    ///
    /// # Panics
    ///
    /// Panics if `terminal_values` is empty.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use projector_engine::risk::RiskMetric;
    /// use projector_engine::stats::QuantileMethod;
    ///
    /// // 100 paths ending at 80, 81, ..., 179
    /// let terminal: Vec<f64> = (80..180).map(f64::from).collect();
    /// let risk = RiskMetric::from_terminal(&terminal, 100.0, QuantileMethod::NearestRank);
    ///
    /// // rank floor(0.05 * 99) = 4 -> terminal 84 -> -16%
    /// assert!((risk.percentage + 16.0).abs() < 1e-9);
    /// assert!((risk.absolute - 16.0).abs() < 1e-9);
    /// ```
    pub fn from_terminal(
        terminal_values: &[f64],
        initial_value: f64,
        method: QuantileMethod,
    ) -> Self {
        let mut returns: Vec<f64> = terminal_values
            .iter()
            .map(|&v| (v - initial_value) / initial_value)
            .collect();
        sort_ascending(&mut returns);

        let tail_return = quantile_sorted(&returns, LOW_QUANTILE, method);

        Self {
            absolute: initial_value * tail_return.abs(),
            percentage: tail_return * 100.0,
            tail_return,
        }
    }
}

/// Summarises the final column and computes its tail risk.
pub fn analyze_terminal(
    terminal_values: &[f64],
    initial_value: f64,
    method: QuantileMethod,
) -> (TerminalSummary, RiskMetric) {
    (
        TerminalSummary::from_values(terminal_values),
        RiskMetric::from_terminal(terminal_values, initial_value, method),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    #[test]
    fn test_summary_reductions() {
        let summary = TerminalSummary::from_values(&[90.0, 110.0, 100.0, 120.0]);
        assert_eq!(summary.mean, 105.0);
        assert_eq!(summary.min, 90.0);
        assert_eq!(summary.max, 120.0);
    }

    #[test]
    #[should_panic(expected = "no terminal values")]
    fn test_summary_empty_panics() {
        TerminalSummary::from_values(&[]);
    }

    #[test]
    fn test_tail_selection_uses_nearest_rank() {
        // Shuffled 1..=100 around an initial value of 50
        let mut terminal: Vec<f64> = (1..=100).map(f64::from).collect();
        terminal.reverse();

        let risk = RiskMetric::from_terminal(&terminal, 50.0, QuantileMethod::NearestRank);

        // rank 4 -> terminal 5 -> (5 - 50) / 50 = -0.9
        assert_relative_eq!(risk.tail_return, -0.9, epsilon = 1e-12);
        assert_relative_eq!(risk.percentage, -90.0, epsilon = 1e-9);
        assert_relative_eq!(risk.absolute, 45.0, epsilon = 1e-9);
    }

    #[test]
    fn test_tail_selection_linear() {
        let terminal: Vec<f64> = (1..=100).map(f64::from).collect();
        let risk = RiskMetric::from_terminal(&terminal, 50.0, QuantileMethod::Linear);

        // position 4.95 -> terminal 5.95
        assert_relative_eq!(risk.tail_return, (5.95 - 50.0) / 50.0, epsilon = 1e-12);
    }

    #[test]
    fn test_flat_distribution_has_zero_risk() {
        let terminal = vec![100.0; 500];
        let (summary, risk) = analyze_terminal(&terminal, 100.0, QuantileMethod::NearestRank);

        assert_eq!(summary.min, 100.0);
        assert_eq!(summary.max, 100.0);
        assert_eq!(risk.absolute, 0.0);
        assert_eq!(risk.percentage, 0.0);
    }

    #[test]
    fn test_flat_mean_stays_within_bounds() {
        // 0.1 has no exact binary form; the naive sum drifts below it
        for value in [0.1, 0.3, 1.1, 123.456_789] {
            let summary = TerminalSummary::from_values(&vec![value; 1_000]);

            assert_eq!(summary.min, value);
            assert_eq!(summary.max, value);
            assert_eq!(summary.mean, value);
        }
    }

    #[test]
    fn test_gain_at_the_tail_is_positive() {
        let terminal: Vec<f64> = (0..100).map(|i| 101.0 + i as f64).collect();
        let risk = RiskMetric::from_terminal(&terminal, 100.0, QuantileMethod::NearestRank);

        assert!(risk.percentage > 0.0);
        assert_relative_eq!(risk.absolute, 100.0 * risk.tail_return.abs(), epsilon = 1e-12);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(300))]

        #[test]
        fn test_sign_convention_and_consistency(
            terminal in prop::collection::vec(1e-3f64..1e4, 1..400),
            initial in 1e-2f64..1e4,
        ) {
            let (summary, risk) = analyze_terminal(&terminal, initial, QuantileMethod::NearestRank);

            prop_assert!(summary.min <= summary.mean);
            prop_assert!(summary.mean <= summary.max);
            prop_assert!(risk.absolute >= 0.0);
            prop_assert_eq!(risk.percentage < 0.0, risk.tail_return < 0.0);
            prop_assert_eq!(risk.absolute, initial * risk.tail_return.abs());

            let selected = initial + risk.tail_return * initial;
            prop_assert!(selected >= summary.min * (1.0 - 1e-9));
            prop_assert!(selected <= summary.max * (1.0 + 1e-9));
        }
    }
}
