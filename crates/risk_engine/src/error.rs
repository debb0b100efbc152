//! Error types for alignment, return computation and simulation.

use chrono::NaiveDate;
use thiserror::Error;

/// Errors produced by the simulation engine.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    /// The engine was handed an empty set of series.
    #[error("no time series supplied to the engine")]
    EmptyUniverse,

    /// The input series share no observation date at all.
    #[error("input series have no common observation date")]
    NoCommonDates,

    /// A calendar day could not be filled from any observation of a series.
    #[error("series '{symbol}' has no observation usable for {date}")]
    UnfillableGap {
        /// Symbol of the offending series.
        symbol: String,
        /// Calendar day that could not be filled.
        date: NaiveDate,
    },

    /// A return series does not sit on the shared date axis.
    #[error("series '{symbol}' does not share the common date axis")]
    MismatchedRange {
        /// Symbol of the offending series.
        symbol: String,
    },

    /// A return series has a different length from the shared axis.
    #[error("series '{symbol}' has {actual} returns, expected {expected}")]
    MismatchedLength {
        /// Symbol of the offending series.
        symbol: String,
        /// Length of the shared axis.
        expected: usize,
        /// Length actually observed.
        actual: usize,
    },

    /// The return history is too short to cut even one full window from.
    #[error("only {available} daily returns available, need more than {required}")]
    InsufficientHistory {
        /// Number of return observations available.
        available: usize,
        /// Returns consumed by a single window.
        required: usize,
    },

    /// A stitched return sequence came out with the wrong length.
    #[error("stitched returns for '{symbol}' have length {actual}, expected {expected}")]
    StitchedLength {
        /// Symbol of the offending path.
        symbol: String,
        /// Expected stitched length (window length times window count).
        expected: usize,
        /// Length actually produced.
        actual: usize,
    },

    /// A simulated path came out with the wrong length.
    #[error("path for '{symbol}' has length {actual}, expected {expected}")]
    PathLength {
        /// Symbol of the offending path.
        symbol: String,
        /// Expected path length.
        expected: usize,
        /// Length actually produced.
        actual: usize,
    },

    /// The joined scenario batch has the wrong cardinality.
    #[error("simulation produced {actual} scenarios, expected {expected}")]
    ScenarioCount {
        /// Configured scenario count.
        expected: usize,
        /// Number of scenarios actually joined.
        actual: usize,
    },

    /// The worker pool could not be constructed.
    #[error("failed to build worker pool: {0}")]
    WorkerPool(String),

    /// A simulation parameter is outside its permitted range.
    #[error("invalid simulation parameter '{name}': {reason}")]
    InvalidParameter {
        /// Name of the offending parameter.
        name: &'static str,
        /// Human-readable description of the violation.
        reason: String,
    },
}

impl EngineError {
    /// Convenience constructor for [`EngineError::InvalidParameter`].
    #[must_use]
    pub fn invalid_parameter(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }

    /// Convenience constructor for [`EngineError::UnfillableGap`].
    #[must_use]
    pub fn unfillable_gap(symbol: impl Into<String>, date: NaiveDate) -> Self {
        Self::UnfillableGap {
            symbol: symbol.into(),
            date,
        }
    }
}
