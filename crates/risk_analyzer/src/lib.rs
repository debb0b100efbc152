//! Portfolio tail-risk analysis sessions.
//!
//! This crate ties the pipeline together: quote retrieval through a
//! [`adapter_quotes::QuoteProvider`], calendar alignment and historical
//! simulation from `risk_engine`, and report assembly from `risk_report`.
//! [`PortfolioAnalyzer`] is the session object; each analysis constructs one,
//! runs it, and drops it, so nothing leaks between runs.
//!
//! The three stages are available individually (`prepare`, `simulate`,
//! `report`) for callers that want to inspect the simulator or reuse a
//! scenario batch, and bundled as [`PortfolioAnalyzer::run`] for the common
//! path.

pub mod analyzer;
pub mod error;

pub use analyzer::PortfolioAnalyzer;
pub use error::AnalyzerError;
