//! Block-bootstrap scenario generation from historical returns.
//!
//! A scenario stitches [`SimulationConfig::window_count`] windows of
//! consecutive historical daily returns into one synthetic forward path per
//! symbol. The window start dates are drawn uniformly from the usable
//! history and are *shared across symbols*, so each window replays a real
//! joint market episode and the historical cross-asset correlation survives
//! into the simulated paths.
//!
//! Batches are reproducible: the master seed deterministically yields one
//! child seed per scenario, and each scenario runs on a private generator.
//! Worker count and scheduling therefore never affect the results.

mod config;
mod rng;

pub use config::{
    SimulationConfig, SimulationConfigBuilder, DEFAULT_SIMULATION_COUNT, DEFAULT_WINDOW_COUNT,
    DEFAULT_WINDOW_RETURN_DAYS, MAX_PATH_LENGTH, MAX_SIMULATIONS,
};
pub use rng::ScenarioRng;

use std::collections::HashMap;

use chrono::{Duration, NaiveDate};
use rayon::prelude::*;
use risk_core::TimeSeries;
use tracing::{debug, info, warn};

use crate::error::EngineError;
use crate::returns::compute_returns;

/// One simulated market state: the window starts that were drawn and the
/// resulting price-relative path per symbol.
///
/// Every path starts at the first stitched return (not at 1.0) and has
/// length [`SimulationConfig::path_length`]; `path[i]` is the simulated
/// price level after `i + 1` days as a fraction of today's price.
#[derive(Clone, Debug)]
pub struct Scenario {
    window_starts: Vec<NaiveDate>,
    paths: HashMap<String, Vec<f64>>,
}

impl Scenario {
    /// Returns the drawn window start dates, in draw order.
    #[inline]
    pub fn window_starts(&self) -> &[NaiveDate] {
        &self.window_starts
    }

    /// Returns all simulated paths, keyed by symbol.
    #[inline]
    pub fn paths(&self) -> &HashMap<String, Vec<f64>> {
        &self.paths
    }

    /// Returns the simulated path for one symbol, if present.
    #[inline]
    pub fn path(&self, symbol: &str) -> Option<&[f64]> {
        self.paths.get(symbol).map(Vec::as_slice)
    }
}

/// Block-bootstrap simulator over a set of aligned price histories.
///
/// Construction transforms the aligned prices into daily return ratios,
/// verifies that every symbol sits on one shared return-date axis and that
/// the history is long enough to cut a full window from, and precomputes the
/// window-start draw domain.
///
/// # Examples
///
/// ```rust
/// use chrono::NaiveDate;
/// use risk_core::TimeSeries;
/// use risk_engine::{HistoricalSimulation, SimulationConfig};
///
/// let prices = TimeSeries::from_pairs(
///     "SPY",
///     (0..10)
///         .map(|i| {
///             let date = NaiveDate::from_ymd_opt(2021, 3, 1).unwrap()
///                 + chrono::Duration::days(i);
///             (date, 100.0 + i as f64)
///         })
///         .collect(),
/// );
/// let config = SimulationConfig::builder()
///     .window_return_days(3)
///     .window_count(2)
///     .simulation_count(16)
///     .seed(42)
///     .build()?;
/// let engine = HistoricalSimulation::new(&[prices], config)?;
/// let scenarios = engine.run()?;
/// assert_eq!(scenarios.len(), 16);
/// assert_eq!(scenarios[0].path("SPY").unwrap().len(), 6);
/// # Ok::<(), risk_engine::EngineError>(())
/// ```
#[derive(Clone, Debug)]
pub struct HistoricalSimulation {
    config: SimulationConfig,
    /// Shared return-date axis, ascending.
    dates: Vec<NaiveDate>,
    /// Daily return ratios per symbol, aligned to `dates`.
    returns: HashMap<String, Vec<f64>>,
    min_date: NaiveDate,
    max_date: NaiveDate,
    /// Latest date a window may start on and still complete within history.
    max_usable_date: NaiveDate,
    /// Calendar-day width of the window-start draw domain.
    offset_bound: i64,
}

impl HistoricalSimulation {
    /// Builds a simulator from aligned price series.
    ///
    /// # Errors
    ///
    /// - [`EngineError::EmptyUniverse`] when no series are supplied
    /// - [`EngineError::MismatchedLength`] / [`EngineError::MismatchedRange`]
    ///   when the series do not share one return-date axis
    /// - [`EngineError::InsufficientHistory`] when the shared history cannot
    ///   fit a single window
    /// - [`EngineError::InvalidParameter`] when the configuration is invalid
    pub fn new(aligned: &[TimeSeries], config: SimulationConfig) -> Result<Self, EngineError> {
        config.validate()?;

        let mut iter = aligned.iter();
        let first = iter.next().ok_or(EngineError::EmptyUniverse)?;
        let first_returns = compute_returns(first);
        let dates: Vec<NaiveDate> = first_returns.dates().collect();

        let mut returns = HashMap::with_capacity(aligned.len());
        returns.insert(first.name().to_string(), first_returns.values().collect::<Vec<f64>>());
        for series in iter {
            let series_returns = compute_returns(series);
            if series_returns.len() != dates.len() {
                return Err(EngineError::MismatchedLength {
                    symbol: series.name().to_string(),
                    expected: dates.len(),
                    actual: series_returns.len(),
                });
            }
            if series_returns.dates().zip(dates.iter()).any(|(date, &axis)| date != axis) {
                return Err(EngineError::MismatchedRange {
                    symbol: series.name().to_string(),
                });
            }
            let values: Vec<f64> = series_returns.values().collect();
            if returns.insert(series.name().to_string(), values).is_some() {
                warn!(symbol = series.name(), "duplicate series name, keeping the later one");
            }
        }

        let window = config.window_return_days();
        if dates.len() <= window {
            return Err(EngineError::InsufficientHistory {
                available: dates.len(),
                required: window,
            });
        }

        let min_date = dates[0];
        let max_date = dates[dates.len() - 1];
        let max_usable_date = dates[dates.len() - 1 - window];
        let offset_bound = (max_usable_date - min_date).num_days();
        info!(
            symbols = returns.len(),
            returns = dates.len(),
            from = %min_date,
            to = %max_date,
            usable_to = %max_usable_date,
            "simulation engine initialised"
        );

        Ok(Self {
            config,
            dates,
            returns,
            min_date,
            max_date,
            max_usable_date,
            offset_bound,
        })
    }

    /// Returns the batch configuration.
    #[inline]
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Returns the earliest date on the return axis.
    #[inline]
    pub fn min_date(&self) -> NaiveDate {
        self.min_date
    }

    /// Returns the latest date on the return axis.
    #[inline]
    pub fn max_date(&self) -> NaiveDate {
        self.max_date
    }

    /// Returns the latest date a window may start on.
    #[inline]
    pub fn max_usable_date(&self) -> NaiveDate {
        self.max_usable_date
    }

    /// Iterates over the simulated symbols in arbitrary order.
    pub fn symbols(&self) -> impl Iterator<Item = &str> {
        self.returns.keys().map(String::as_str)
    }

    /// Generates one scenario from the supplied generator.
    ///
    /// Exposed separately from [`HistoricalSimulation::run`] so callers can
    /// replay a single scenario from its child seed.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::StitchedLength`] or [`EngineError::PathLength`]
    /// when a produced sequence fails the post-stitch shape checks.
    pub fn simulate_once(&self, rng: &mut ScenarioRng) -> Result<Scenario, EngineError> {
        let starts = self.draw_window_starts(rng);
        let expected = self.config.path_length();

        let mut paths = HashMap::with_capacity(self.returns.len());
        for (symbol, ratios) in &self.returns {
            let stitched = self.stitch(ratios, &starts);
            if stitched.len() != expected {
                return Err(EngineError::StitchedLength {
                    symbol: symbol.clone(),
                    expected,
                    actual: stitched.len(),
                });
            }
            let path = cumulative_path(&stitched);
            if path.len() != expected {
                return Err(EngineError::PathLength {
                    symbol: symbol.clone(),
                    expected,
                    actual: path.len(),
                });
            }
            paths.insert(symbol.clone(), path);
        }

        Ok(Scenario {
            window_starts: starts,
            paths,
        })
    }

    /// Runs the full batch on a bounded worker pool.
    ///
    /// Child seeds are drawn from the master generator up front, then the
    /// scenarios are generated in parallel and joined before validation, so
    /// results depend only on the master seed, never on the worker count.
    ///
    /// # Errors
    ///
    /// Propagates per-scenario generation errors, and returns
    /// [`EngineError::WorkerPool`] when the pool cannot be built or
    /// [`EngineError::ScenarioCount`] / [`EngineError::PathLength`] when the
    /// joined batch has the wrong shape.
    pub fn run(&self) -> Result<Vec<Scenario>, EngineError> {
        let count = self.config.simulation_count();
        let mut master = match self.config.seed() {
            Some(seed) => ScenarioRng::from_seed(seed),
            None => ScenarioRng::from_entropy(),
        };
        debug!(master_seed = master.seed(), scenarios = count, "drawing child seeds");
        let child_seeds: Vec<u64> = (0..count).map(|_| master.child_seed()).collect();

        let workers = self.config.effective_workers();
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .build()
            .map_err(|err| EngineError::WorkerPool(err.to_string()))?;

        // install() returns only once every scenario task has finished, so
        // the collect below is the join point of the batch.
        let scenarios: Vec<Scenario> = pool.install(|| {
            child_seeds
                .par_iter()
                .map(|&seed| {
                    let mut rng = ScenarioRng::from_seed(seed);
                    self.simulate_once(&mut rng)
                })
                .collect::<Result<_, _>>()
        })?;

        self.validate_batch(&scenarios)?;
        info!(scenarios = scenarios.len(), workers, "simulation batch complete");
        Ok(scenarios)
    }

    /// Draws the shared window start dates for one scenario.
    ///
    /// Offsets are uniform over `[0, offset_bound)` calendar days past the
    /// earliest return date; the latest usable date itself is reached only
    /// when the domain is degenerate. Drawn dates may land on a weekend and
    /// are resolved to the next trading day when indexed into the axis.
    fn draw_window_starts(&self, rng: &mut ScenarioRng) -> Vec<NaiveDate> {
        (0..self.config.window_count())
            .map(|_| self.min_date + Duration::days(rng.pick_offset(self.offset_bound)))
            .collect()
    }

    /// Maps a drawn calendar date to its position on the return axis: the
    /// exact date when it trades, otherwise the next trading day.
    fn start_index(&self, date: NaiveDate) -> usize {
        self.dates.partition_point(|&axis| axis < date)
    }

    /// Concatenates one window of consecutive returns per start date.
    fn stitch(&self, ratios: &[f64], starts: &[NaiveDate]) -> Vec<f64> {
        let window = self.config.window_return_days();
        let mut stitched = Vec::with_capacity(window * starts.len());
        for &start in starts {
            let from = self.start_index(start);
            let to = (from + window).min(ratios.len());
            stitched.extend_from_slice(&ratios[from..to]);
        }
        stitched
    }

    fn validate_batch(&self, scenarios: &[Scenario]) -> Result<(), EngineError> {
        let count = self.config.simulation_count();
        if scenarios.len() != count {
            return Err(EngineError::ScenarioCount {
                expected: count,
                actual: scenarios.len(),
            });
        }
        let expected = self.config.path_length();
        for scenario in scenarios {
            for (symbol, path) in scenario.paths() {
                if path.len() != expected {
                    return Err(EngineError::PathLength {
                        symbol: symbol.clone(),
                        expected,
                        actual: path.len(),
                    });
                }
            }
        }
        Ok(())
    }
}

/// Turns stitched return ratios into a cumulative price-relative path.
///
/// The running product starts at 1, so the first path entry equals the first
/// stitched ratio.
fn cumulative_path(ratios: &[f64]) -> Vec<f64> {
    let mut path = Vec::with_capacity(ratios.len());
    let mut level = 1.0;
    for &ratio in ratios {
        level *= ratio;
        path.push(level);
    }
    path
}
