//! Error types for quote suppliers.

use thiserror::Error;

/// Failure modes of a quote provider.
///
/// The analytics core treats every variant as fatal for the run; retry or
/// caching policy is the provider's own concern.
#[derive(Debug, Error)]
pub enum QuoteError {
    /// The provider has no series for the requested symbol.
    #[error("unknown symbol: '{0}'")]
    UnknownSymbol(String),

    /// The provider knows the symbol but holds no usable observations.
    #[error("no quotes available for '{symbol}'")]
    Empty {
        /// Symbol the lookup was for.
        symbol: String,
    },

    /// A record could not be interpreted as a daily quote.
    #[error("malformed quote data for '{symbol}': {message}")]
    Malformed {
        /// Symbol whose data is malformed.
        symbol: String,
        /// What was wrong with the record.
        message: String,
    },

    /// Underlying file could not be read.
    #[error("I/O error reading quotes: {0}")]
    Io(#[from] std::io::Error),

    /// CSV layer failure (framing, encoding).
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl QuoteError {
    /// Creates a malformed-data error.
    #[must_use]
    pub fn malformed(symbol: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Malformed {
            symbol: symbol.into(),
            message: message.into(),
        }
    }

    /// Creates an empty-result error.
    #[must_use]
    pub fn empty(symbol: impl Into<String>) -> Self {
        Self::Empty {
            symbol: symbol.into(),
        }
    }
}
