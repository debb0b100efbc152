//! In-memory quote provider for tests and embedding.

use std::collections::HashMap;

use chrono::NaiveDate;
use risk_core::{TimePoint, TimeSeries};

use crate::error::QuoteError;
use crate::provider::{QuoteProvider, SymbolQuery};

/// A symbol→observations map implementing [`QuoteProvider`].
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use adapter_quotes::{MemoryQuotes, QuoteProvider, SymbolQuery};
///
/// let d = |day| NaiveDate::from_ymd_opt(2021, 3, day).unwrap();
/// let mut quotes = MemoryQuotes::new();
/// quotes.insert("SPY", vec![(d(1), 100.0), (d(2), 101.0), (d(3), 99.0)]);
///
/// let series = quotes
///     .series(&SymbolQuery::new("SPY", d(1), d(2)))
///     .unwrap();
/// assert_eq!(series.len(), 2);
/// assert_eq!(quotes.latest("SPY").unwrap().value, 99.0);
/// ```
#[derive(Clone, Debug, Default)]
pub struct MemoryQuotes {
    series: HashMap<String, Vec<TimePoint>>,
}

impl MemoryQuotes {
    /// Creates an empty provider.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores (or replaces) the observations for a symbol.
    pub fn insert(&mut self, symbol: impl Into<String>, pairs: Vec<(NaiveDate, f64)>) {
        self.series.insert(
            symbol.into(),
            pairs
                .into_iter()
                .map(|(date, value)| TimePoint::new(date, value))
                .collect(),
        );
    }

    /// Returns the number of stored symbols.
    pub fn symbol_count(&self) -> usize {
        self.series.len()
    }
}

impl QuoteProvider for MemoryQuotes {
    fn series(&self, query: &SymbolQuery) -> Result<TimeSeries, QuoteError> {
        let points = self
            .series
            .get(&query.symbol)
            .ok_or_else(|| QuoteError::UnknownSymbol(query.symbol.clone()))?;

        let mut selected: Vec<TimePoint> = points
            .iter()
            .filter(|point| point.date >= query.start && point.date <= query.end)
            .copied()
            .collect();
        selected.sort_by_key(|point| point.date);

        Ok(TimeSeries::new(query.symbol.clone(), selected))
    }

    fn latest(&self, symbol: &str) -> Result<TimePoint, QuoteError> {
        let points = self
            .series
            .get(symbol)
            .ok_or_else(|| QuoteError::UnknownSymbol(symbol.to_string()))?;

        points
            .iter()
            .max_by_key(|point| point.date)
            .copied()
            .ok_or_else(|| QuoteError::empty(symbol))
    }
}
