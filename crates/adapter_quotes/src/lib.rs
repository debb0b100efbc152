//! # adapter_quotes: Price-Supplier Boundary
//!
//! The analytics core never talks to a quote source directly; it consumes
//! the [`QuoteProvider`] trait defined here. A provider answers two
//! questions: the daily price series for a symbol over a date range, and
//! the latest (as-of) price for a symbol.
//!
//! Two implementations ship with the workspace:
//! - [`MemoryQuotes`]: a symbol-to-points map for tests and embedding.
//! - [`CsvQuoteStore`]: a directory of daily-quote CSV files in the common
//!   `Date,Open,High,Low,Close,Adj Close,Volume` export format.
//!
//! Live network providers belong to the surrounding application, not here.

pub mod csv_store;
pub mod error;
pub mod memory;
pub mod provider;

pub use csv_store::CsvQuoteStore;
pub use error::QuoteError;
pub use memory::MemoryQuotes;
pub use provider::{QuoteProvider, SymbolQuery};
