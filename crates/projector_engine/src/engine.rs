//! Projection orchestration.
//!
//! [`ProjectionEngine`] wires the stages together:
//!
//! ```text
//! SimulationParameters ─► generate_paths ─► PriceMatrix ─┬─► TimeSeriesStatistics
//!                                                        └─► TerminalSummary + RiskMetric
//! ```
//!
//! The engine holds no state between runs. Every run allocates its own matrix
//! and keeps nothing once the result is returned.

use std::time::Instant;

use projector_core::SimulationParameters;

use crate::paths::{generate_paths, PriceMatrix};
use crate::risk::{analyze_terminal, RiskMetric, TerminalSummary};
use crate::rng::{fresh_seed, SeededStreams, StreamFactory};
use crate::stats::{QuantileMethod, TimeSeriesStatistics};

/// Execution settings of a [`ProjectionEngine`].
///
/// Neither setting changes the shape of the result. `parallel` never changes
/// a single bit of it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EngineConfig {
    /// Spread path generation and column reduction over the rayon pool.
    pub parallel: bool,
    /// Quantile convention for the per-step band and the tail risk.
    pub quantile_method: QuantileMethod,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            parallel: true,
            quantile_method: QuantileMethod::NearestRank,
        }
    }
}

impl EngineConfig {
    /// Sets whether to use the rayon pool.
    #[inline]
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Sets the quantile convention.
    #[inline]
    pub fn with_quantile_method(mut self, method: QuantileMethod) -> Self {
        self.quantile_method = method;
        self
    }
}

/// Result of one projection run.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Projection {
    seed: Option<u64>,
    paths: PriceMatrix,
    time_series: TimeSeriesStatistics,
    terminal: TerminalSummary,
    risk: RiskMetric,
}

impl Projection {
    /// Base seed the per-path streams were derived from, if the run was seeded.
    #[inline]
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// Full price matrix, `path_count × (horizon + 1)`.
    #[inline]
    pub fn simulated_paths(&self) -> &PriceMatrix {
        &self.paths
    }

    /// Per-step statistics.
    #[inline]
    pub fn time_series(&self) -> &TimeSeriesStatistics {
        &self.time_series
    }

    /// Mean price at each step.
    #[inline]
    pub fn mean_per_step(&self) -> &[f64] {
        &self.time_series.mean
    }

    /// Low quantile at each step.
    #[inline]
    pub fn low_quantile_per_step(&self) -> &[f64] {
        &self.time_series.low_quantile
    }

    /// High quantile at each step.
    #[inline]
    pub fn high_quantile_per_step(&self) -> &[f64] {
        &self.time_series.high_quantile
    }

    /// Summary of the final column.
    #[inline]
    pub fn terminal(&self) -> &TerminalSummary {
        &self.terminal
    }

    /// Mean terminal value.
    #[inline]
    pub fn terminal_mean(&self) -> f64 {
        self.terminal.mean
    }

    /// Lowest terminal value.
    #[inline]
    pub fn terminal_min(&self) -> f64 {
        self.terminal.min
    }

    /// Highest terminal value.
    #[inline]
    pub fn terminal_max(&self) -> f64 {
        self.terminal.max
    }

    /// Tail risk of the terminal distribution.
    #[inline]
    pub fn risk(&self) -> &RiskMetric {
        &self.risk
    }

    /// Loss amount at the tail.
    #[inline]
    pub fn tail_risk_absolute(&self) -> f64 {
        self.risk.absolute
    }

    /// Signed tail return in percent.
    #[inline]
    pub fn tail_risk_percentage(&self) -> f64 {
        self.risk.percentage
    }

    /// Consumes the projection, returning the price matrix.
    pub fn into_paths(self) -> PriceMatrix {
        self.paths
    }
}

/// Runs projections for validated parameter sets.
///
/// # Examples
///
/// ```rust
/// use projector_core::SimulationParameters;
/// use projector_engine::engine::{EngineConfig, ProjectionEngine};
///
/// let params = SimulationParameters::builder()
///     .initial_value(100.0)
///     .annual_volatility(20.0)
///     .horizon(10)
///     .path_count(1_000)
///     .build()
///     .unwrap();
///
/// let engine = ProjectionEngine::new(EngineConfig::default());
/// let projection = engine.run(&params, Some(42));
///
/// assert_eq!(projection.seed(), Some(42));
/// assert_eq!(projection.simulated_paths().n_paths(), 1_000);
/// assert_eq!(projection.mean_per_step().len(), 11);
/// assert!(projection.terminal_min() <= projection.terminal_max());
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct ProjectionEngine {
    config: EngineConfig,
}

impl ProjectionEngine {
    /// Creates an engine with the given settings.
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    /// Returns the engine settings.
    #[inline]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Runs a projection with per-path streams derived from `seed`.
    ///
    /// Without a seed, a fresh one is drawn from the thread-local generator.
    /// Either way the seed used is recorded on the result, so any run can be
    /// replayed.
    pub fn run(&self, params: &SimulationParameters, seed: Option<u64>) -> Projection {
        let seed = seed.unwrap_or_else(fresh_seed);
        tracing::debug!(seed, "Seeding per-path streams");
        let mut projection = self.run_with_streams(params, &SeededStreams::new(seed));
        projection.seed = Some(seed);
        projection
    }

    /// Runs a projection drawing from an injected stream factory.
    ///
    /// The result carries no seed.
    pub fn run_with_streams<F>(&self, params: &SimulationParameters, streams: &F) -> Projection
    where
        F: StreamFactory,
    {
        let started = Instant::now();
        tracing::debug!(
            initial_value = params.initial_value(),
            annual_volatility = params.annual_volatility(),
            horizon = params.horizon(),
            path_count = params.path_count(),
            parallel = self.config.parallel,
            quantile_method = %self.config.quantile_method,
            "Starting projection"
        );

        let paths = generate_paths(params, streams, self.config.parallel);
        let generated = started.elapsed();

        let time_series = TimeSeriesStatistics::aggregate(
            &paths,
            self.config.quantile_method,
            self.config.parallel,
        );
        let (terminal, risk) = analyze_terminal(
            &paths.terminal_values(),
            params.initial_value(),
            self.config.quantile_method,
        );

        tracing::debug!(
            generation_ms = generated.as_secs_f64() * 1e3,
            total_ms = started.elapsed().as_secs_f64() * 1e3,
            terminal_mean = terminal.mean,
            tail_risk_percentage = risk.percentage,
            "Projection complete"
        );

        Projection {
            seed: None,
            paths,
            time_series,
            terminal,
            risk,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn params(vol: f64, horizon: i64, paths: i64) -> SimulationParameters {
        SimulationParameters::builder()
            .initial_value(100.0)
            .annual_volatility(vol)
            .horizon(horizon)
            .path_count(paths)
            .build()
            .unwrap()
    }

    #[test]
    fn test_default_config() {
        let config = EngineConfig::default();
        assert!(config.parallel);
        assert_eq!(config.quantile_method, QuantileMethod::NearestRank);

        let config = config
            .with_parallel(false)
            .with_quantile_method(QuantileMethod::Linear);
        assert!(!config.parallel);
        assert_eq!(config.quantile_method, QuantileMethod::Linear);
    }

    #[test]
    fn test_reference_scenario() {
        let engine = ProjectionEngine::default();
        let projection = engine.run(&params(20.0, 10, 1_000), Some(7));

        let paths = projection.simulated_paths();
        assert_eq!(paths.n_paths(), 1_000);
        assert_eq!(paths.n_columns(), 11);
        assert!(paths.column(0).iter().all(|&v| v == 100.0));
        assert!(paths.as_slice().iter().all(|&v| v > 0.0));

        assert!(projection.terminal_min() < projection.terminal_mean());
        assert!(projection.terminal_mean() < projection.terminal_max());
        assert!(projection.tail_risk_percentage() < 0.0);
        assert_relative_eq!(
            projection.tail_risk_absolute(),
            100.0 * projection.risk().tail_return.abs(),
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_zero_volatility_scenario() {
        let engine = ProjectionEngine::default();
        let projection = engine.run(&params(0.0, 20, 100), None);

        assert!(projection
            .simulated_paths()
            .as_slice()
            .iter()
            .all(|&v| v == 100.0));
        assert!(projection.mean_per_step().iter().all(|&v| v == 100.0));
        assert_eq!(projection.terminal_min(), 100.0);
        assert_eq!(projection.terminal_max(), 100.0);
        assert_eq!(projection.tail_risk_absolute(), 0.0);
        assert_eq!(projection.tail_risk_percentage(), 0.0);
    }

    #[test]
    fn test_seed_is_recorded() {
        let engine = ProjectionEngine::default();
        let p = params(20.0, 5, 100);

        assert_eq!(engine.run(&p, Some(99)).seed(), Some(99));
        assert!(engine.run(&p, None).seed().is_some());
        assert_eq!(
            engine.run_with_streams(&p, &SeededStreams::new(99)).seed(),
            None
        );
    }

    #[test]
    fn test_unseeded_run_replays_from_recorded_seed() {
        let engine = ProjectionEngine::default();
        let p = params(35.0, 12, 200);

        let first = engine.run(&p, None);
        let replay = engine.run(&p, first.seed());

        assert_eq!(first, replay);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let p = params(55.0, 30, 600);
        let parallel = ProjectionEngine::new(EngineConfig::default().with_parallel(true));
        let sequential = ProjectionEngine::new(EngineConfig::default().with_parallel(false));

        assert_eq!(parallel.run(&p, Some(5)), sequential.run(&p, Some(5)));
    }

    #[test]
    fn test_quantile_method_changes_only_quantiles() {
        let p = params(40.0, 8, 150);
        let nearest = ProjectionEngine::default().run(&p, Some(11));
        let linear = ProjectionEngine::new(
            EngineConfig::default().with_quantile_method(QuantileMethod::Linear),
        )
        .run(&p, Some(11));

        assert_eq!(nearest.simulated_paths(), linear.simulated_paths());
        assert_eq!(nearest.mean_per_step(), linear.mean_per_step());
        assert_eq!(nearest.terminal(), linear.terminal());
    }

    #[test]
    fn test_time_series_agrees_with_terminal_summary() {
        let projection = ProjectionEngine::default().run(&params(25.0, 15, 300), Some(3));
        let last = projection.mean_per_step().len() - 1;

        assert_relative_eq!(
            projection.mean_per_step()[last],
            projection.terminal_mean(),
            max_relative = 1e-12
        );
        assert!(projection.low_quantile_per_step()[last] >= projection.terminal_min());
        assert!(projection.high_quantile_per_step()[last] <= projection.terminal_max());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_projection_serialises_rows_and_parts() {
        let projection = ProjectionEngine::default().run(&params(20.0, 4, 100), Some(8));
        let json = serde_json::to_value(&projection).unwrap();

        assert_eq!(json["seed"], 8);
        assert_eq!(json["paths"].as_array().unwrap().len(), 100);
        assert_eq!(json["paths"][0].as_array().unwrap().len(), 5);
        assert_eq!(json["time_series"]["mean"].as_array().unwrap().len(), 5);
        assert!(json["terminal"]["max"].is_number());
        assert!(json["risk"]["percentage"].is_number());
    }
}
