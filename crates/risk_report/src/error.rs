//! Error types for report construction.

use infra_config::ConfigError;
use risk_core::AssetCurrency;
use thiserror::Error;

/// Errors produced while assembling a risk report.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ReportError {
    /// The scenario set has a different cardinality than configured.
    #[error("received {actual} scenarios, expected {expected}")]
    ScenarioCount {
        /// Configured scenario count.
        expected: usize,
        /// Number of scenarios received.
        actual: usize,
    },

    /// A required symbol was not simulated at all.
    #[error("no simulated path for symbol '{symbol}'")]
    MissingPath {
        /// The absent symbol.
        symbol: String,
    },

    /// A simulated path has the wrong number of days.
    #[error("malformed P&L for '{symbol}': path length {actual}, expected {expected}")]
    MalformedPnL {
        /// Symbol whose path is misshapen.
        symbol: String,
        /// Expected path length.
        expected: usize,
        /// Length actually found.
        actual: usize,
    },

    /// No current price available for a required symbol.
    #[error("no current price for symbol '{symbol}'")]
    MissingPrice {
        /// The unpriced symbol.
        symbol: String,
    },

    /// A foreign-currency asset has no simulated converter series.
    #[error("no '{converter}' converter among the simulated factors")]
    MissingConverter {
        /// The cross-rate that would perform the conversion.
        converter: AssetCurrency,
    },

    /// An asset was declared with a cross-rate tag as its currency.
    #[error("asset '{symbol}' is declared in '{currency}', which is a cross-rate, not a currency")]
    InvalidAssetCurrency {
        /// The offending asset.
        symbol: String,
        /// The cross-rate tag it was declared with.
        currency: AssetCurrency,
    },

    /// The portfolio configuration failed validation.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_identify_the_problem() {
        let err = ReportError::MissingConverter {
            converter: AssetCurrency::UsdToCad,
        };
        assert_eq!(
            err.to_string(),
            "no 'USD/CAD' converter among the simulated factors"
        );

        let err = ReportError::InvalidAssetCurrency {
            symbol: "BAD".into(),
            currency: AssetCurrency::UsdToCad,
        };
        assert!(err.to_string().contains("cross-rate"));
    }

    #[test]
    fn test_config_errors_pass_through_transparently() {
        let inner = ConfigError::UnknownFactorCurrency("GBP/CAD".into());
        let wrapped = ReportError::from(inner.clone());
        assert_eq!(wrapped.to_string(), inner.to_string());
    }
}
