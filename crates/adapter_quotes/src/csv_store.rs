//! Offline quote store over a directory of daily CSV exports.
//!
//! Files are named `<SYMBOL>.csv`; symbols containing a path separator are
//! remapped (`USD/CAD` → `USD=CAD.csv`). The expected layout is the common
//! daily-quote export format (`Date,Open,High,Low,Close,Adj Close,Volume`);
//! the adjusted close is preferred, plain close accepted. Rows whose price
//! field is absent or not numeric (exports write `null` on data holes) are
//! skipped and left for the calendar aligner to reconcile.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use risk_core::{TimePoint, TimeSeries};
use tracing::debug;

use crate::error::QuoteError;
use crate::provider::{QuoteProvider, SymbolQuery};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Directory-backed [`QuoteProvider`] reading daily-quote CSV files.
pub struct CsvQuoteStore {
    root: PathBuf,
}

impl CsvQuoteStore {
    /// Creates a store rooted at `root`. The directory is not scanned until
    /// a symbol is requested.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Returns the store's root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Maps a symbol to its file name. Path separators are not legal in
    /// file names, so pair symbols substitute `=` (`USD/CAD` → `USD=CAD`).
    fn file_name(symbol: &str) -> String {
        format!("{}.csv", symbol.replace('/', "="))
    }

    fn load(&self, symbol: &str) -> Result<Vec<TimePoint>, QuoteError> {
        let path = self.root.join(Self::file_name(symbol));
        if !path.exists() {
            return Err(QuoteError::UnknownSymbol(symbol.to_string()));
        }
        debug!(symbol, path = %path.display(), "reading quote file");
        let file = File::open(&path)?;
        read_daily_quotes(file, symbol)
    }
}

impl QuoteProvider for CsvQuoteStore {
    fn series(&self, query: &SymbolQuery) -> Result<TimeSeries, QuoteError> {
        let mut points: Vec<TimePoint> = self
            .load(&query.symbol)?
            .into_iter()
            .filter(|point| point.date >= query.start && point.date <= query.end)
            .collect();
        points.sort_by_key(|point| point.date);
        Ok(TimeSeries::new(query.symbol.clone(), points))
    }

    fn latest(&self, symbol: &str) -> Result<TimePoint, QuoteError> {
        self.load(symbol)?
            .into_iter()
            .max_by_key(|point| point.date)
            .ok_or_else(|| QuoteError::empty(symbol))
    }
}

/// Parses daily quotes out of CSV text.
///
/// Requires a `Date` column and one of `Adj Close`/`Close` (case-insensitive
/// header match). A malformed date is an error; a non-numeric price is a
/// skipped row.
fn read_daily_quotes<R: Read>(reader: R, symbol: &str) -> Result<Vec<TimePoint>, QuoteError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    let column = |name: &str| {
        headers
            .iter()
            .position(|header| header.eq_ignore_ascii_case(name))
    };
    let date_column = column("Date")
        .ok_or_else(|| QuoteError::malformed(symbol, "missing 'Date' column"))?;
    let value_column = column("Adj Close")
        .or_else(|| column("Close"))
        .ok_or_else(|| QuoteError::malformed(symbol, "missing 'Adj Close'/'Close' column"))?;

    let mut points = Vec::new();
    for record in csv_reader.records() {
        let record = record?;
        let date_text = record
            .get(date_column)
            .ok_or_else(|| QuoteError::malformed(symbol, "short record"))?;
        let date = NaiveDate::parse_from_str(date_text, DATE_FORMAT)
            .map_err(|e| QuoteError::malformed(symbol, format!("bad date '{date_text}': {e}")))?;

        match record.get(value_column).map(str::parse::<f64>) {
            Some(Ok(value)) if value.is_finite() => points.push(TimePoint::new(date, value)),
            _ => {
                // Data holes are exported as "null"; the aligner fills them.
                debug!(symbol, %date, "skipping quote row without a numeric price");
            }
        }
    }
    Ok(points)
}
