//! The quote-provider trait consumed by the analytics core.

use chrono::NaiveDate;
use risk_core::{TimePoint, TimeSeries};

use crate::error::QuoteError;

/// A request for one symbol's daily prices over a date range.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SymbolQuery {
    /// Symbol to fetch (asset ticker or cross-rate pair such as `USD/CAD`).
    pub symbol: String,
    /// First requested date, inclusive.
    pub start: NaiveDate,
    /// Last requested date, inclusive.
    pub end: NaiveDate,
}

impl SymbolQuery {
    /// Creates a query for `[start, end]` of `symbol`.
    pub fn new(symbol: impl Into<String>, start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            symbol: symbol.into(),
            start,
            end,
        }
    }
}

/// Supplier of per-symbol, per-date price points.
///
/// Implementations may return fewer dates than requested (sparse coverage is
/// reconciled downstream by the calendar aligner) and may return points in
/// any order. A provider that cannot serve the symbol at all fails with a
/// [`QuoteError`], which aborts the analysis run.
pub trait QuoteProvider {
    /// Returns the daily series for the queried symbol and range.
    fn series(&self, query: &SymbolQuery) -> Result<TimeSeries, QuoteError>;

    /// Returns the most recent observation the provider holds for `symbol`,
    /// used as the as-of price during report normalisation.
    fn latest(&self, symbol: &str) -> Result<TimePoint, QuoteError>;
}
