//! The session-level error type.

use adapter_quotes::QuoteError;
use infra_config::ConfigError;
use risk_engine::EngineError;
use risk_report::ReportError;
use thiserror::Error;

/// Any failure an analysis session can surface.
///
/// The four taxonomies stay distinguishable so a caller can tell bad input
/// (configuration) apart from supplier failures and internal data or
/// invariant errors.
#[derive(Debug, Error)]
pub enum AnalyzerError {
    /// The portfolio configuration is incomplete or inconsistent.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The price supplier failed to deliver a required series or price.
    #[error("price supply error: {0}")]
    Quotes(#[from] QuoteError),

    /// Alignment or simulation failed.
    #[error("simulation error: {0}")]
    Engine(#[from] EngineError),

    /// Report assembly failed.
    #[error("reporting error: {0}")]
    Report(#[from] ReportError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrapped_errors_preserve_the_source_message() {
        let err = AnalyzerError::from(EngineError::NoCommonDates);
        assert_eq!(
            err.to_string(),
            "simulation error: input series have no common observation date"
        );
        assert!(matches!(err, AnalyzerError::Engine(_)));
    }
}
