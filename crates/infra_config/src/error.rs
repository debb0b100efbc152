//! Configuration error types.
//!
//! Configuration problems are reported distinctly from data and runtime
//! errors so a caller can re-prompt for input instead of treating them as a
//! systemic failure.

use chrono::NaiveDate;
use thiserror::Error;

/// Invalid or incomplete portfolio configuration.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum ConfigError {
    /// One or more required fields are unset.
    #[error("missing required configuration fields: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),

    /// The same asset symbol is declared twice.
    #[error("asset '{symbol}' is declared more than once")]
    DuplicateAsset {
        /// The repeated symbol.
        symbol: String,
    },

    /// An asset weight is negative or not a finite number.
    #[error("asset '{symbol}' has invalid weight {weight}")]
    InvalidWeight {
        /// Offending asset symbol.
        symbol: String,
        /// The declared weight.
        weight: f64,
    },

    /// Weights cannot be scaled to sum to one.
    #[error("asset weights sum to {sum}; cannot normalise")]
    UnnormalisableWeights {
        /// Sum of the declared weights.
        sum: f64,
    },

    /// The historical range is empty or inverted.
    #[error("start date {start} is not before end date {end}")]
    InvalidDateRange {
        /// Declared range start.
        start: NaiveDate,
        /// Declared range end.
        end: NaiveDate,
    },

    /// An additional factor symbol has no derivable currency tag.
    #[error("cannot determine currency for factor symbol '{0}'")]
    UnknownFactorCurrency(String),

    /// Configuration file could not be read.
    #[error("failed to read configuration: {0}")]
    Io(String),

    /// Configuration file could not be parsed as TOML.
    #[error("failed to parse configuration: {0}")]
    Parse(String),
}
