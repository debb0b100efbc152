//! Simulation batch configuration.

use crate::error::EngineError;

/// Default number of daily returns stitched per historical window.
///
/// Sixty-five trading days is one quarter of a 260-day trading year.
pub const DEFAULT_WINDOW_RETURN_DAYS: usize = 65;

/// Default number of historical windows stitched per scenario.
pub const DEFAULT_WINDOW_COUNT: usize = 4;

/// Default number of scenarios per batch.
pub const DEFAULT_SIMULATION_COUNT: usize = 5_000;

/// Maximum number of scenarios allowed in one batch.
pub const MAX_SIMULATIONS: usize = 1_000_000;

/// Maximum length of a simulated path (window length times window count).
pub const MAX_PATH_LENGTH: usize = 10_000;

/// Configuration for a block-bootstrap simulation batch.
///
/// Immutable once built; use [`SimulationConfigBuilder`] to construct
/// instances. All parameters default to the standard quarterly setup: four
/// 65-day windows per scenario and 5,000 scenarios per batch.
///
/// # Examples
///
/// ```rust
/// use risk_engine::SimulationConfig;
///
/// let config = SimulationConfig::builder()
///     .simulation_count(1_000)
///     .seed(42)
///     .build()
///     .expect("valid configuration");
///
/// assert_eq!(config.simulation_count(), 1_000);
/// assert_eq!(config.path_length(), 260);
/// ```
#[derive(Clone, Debug)]
pub struct SimulationConfig {
    /// Daily returns consumed per window.
    window_return_days: usize,
    /// Windows stitched per scenario.
    window_count: usize,
    /// Scenarios per batch.
    simulation_count: usize,
    /// Optional master seed for reproducibility.
    seed: Option<u64>,
    /// Optional worker-thread cap; defaults to the logical CPU count.
    workers: Option<usize>,
}

impl SimulationConfig {
    /// Creates a new configuration builder.
    #[inline]
    pub fn builder() -> SimulationConfigBuilder {
        SimulationConfigBuilder::default()
    }

    /// Returns the number of daily returns consumed per window.
    #[inline]
    pub fn window_return_days(&self) -> usize {
        self.window_return_days
    }

    /// Returns the number of windows stitched per scenario.
    #[inline]
    pub fn window_count(&self) -> usize {
        self.window_count
    }

    /// Returns the number of scenarios per batch.
    #[inline]
    pub fn simulation_count(&self) -> usize {
        self.simulation_count
    }

    /// Returns the master seed, if one was fixed.
    #[inline]
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// Returns the configured worker cap, if any.
    #[inline]
    pub fn workers(&self) -> Option<usize> {
        self.workers
    }

    /// Returns the length of every simulated path.
    #[inline]
    pub fn path_length(&self) -> usize {
        self.window_return_days * self.window_count
    }

    /// Returns the worker count to run with, falling back to the logical
    /// CPU count when no cap was configured.
    #[inline]
    pub fn effective_workers(&self) -> usize {
        self.workers.unwrap_or_else(num_cpus::get)
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidParameter`] if:
    /// - `window_return_days` or `window_count` is 0
    /// - `simulation_count` is 0 or greater than 1,000,000
    /// - the resulting path length exceeds 10,000
    /// - `workers` was set to 0
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.window_return_days == 0 {
            return Err(EngineError::invalid_parameter(
                "window_return_days",
                "must be at least 1",
            ));
        }
        if self.window_count == 0 {
            return Err(EngineError::invalid_parameter(
                "window_count",
                "must be at least 1",
            ));
        }
        if self.simulation_count == 0 || self.simulation_count > MAX_SIMULATIONS {
            return Err(EngineError::invalid_parameter(
                "simulation_count",
                format!("must be in [1, {MAX_SIMULATIONS}], got {}", self.simulation_count),
            ));
        }
        if self.path_length() > MAX_PATH_LENGTH {
            return Err(EngineError::invalid_parameter(
                "window_return_days",
                format!(
                    "path length {} exceeds the maximum of {MAX_PATH_LENGTH}",
                    self.path_length()
                ),
            ));
        }
        if self.workers == Some(0) {
            return Err(EngineError::invalid_parameter(
                "workers",
                "must be at least 1 when set",
            ));
        }
        Ok(())
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            window_return_days: DEFAULT_WINDOW_RETURN_DAYS,
            window_count: DEFAULT_WINDOW_COUNT,
            simulation_count: DEFAULT_SIMULATION_COUNT,
            seed: None,
            workers: None,
        }
    }
}

/// Builder for [`SimulationConfig`].
///
/// Unset parameters keep their defaults, so `builder().build()` yields the
/// standard quarterly setup.
#[derive(Clone, Debug, Default)]
pub struct SimulationConfigBuilder {
    config: SimulationConfig,
}

impl SimulationConfigBuilder {
    /// Sets the number of daily returns consumed per window.
    #[inline]
    pub fn window_return_days(mut self, days: usize) -> Self {
        self.config.window_return_days = days;
        self
    }

    /// Sets the number of windows stitched per scenario.
    #[inline]
    pub fn window_count(mut self, count: usize) -> Self {
        self.config.window_count = count;
        self
    }

    /// Sets the number of scenarios per batch.
    #[inline]
    pub fn simulation_count(mut self, count: usize) -> Self {
        self.config.simulation_count = count;
        self
    }

    /// Fixes the master seed for reproducible batches.
    #[inline]
    pub fn seed(mut self, seed: u64) -> Self {
        self.config.seed = Some(seed);
        self
    }

    /// Caps the worker-thread count.
    #[inline]
    pub fn workers(mut self, workers: usize) -> Self {
        self.config.workers = Some(workers);
        self
    }

    /// Builds and validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidParameter`] when any parameter is
    /// outside its permitted range; see [`SimulationConfig::validate`].
    pub fn build(self) -> Result<SimulationConfig, EngineError> {
        self.config.validate()?;
        Ok(self.config)
    }
}
