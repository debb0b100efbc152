//! Core data types shared across the analytics workspace.

pub mod currency;
pub mod series;

pub use currency::{AssetCurrency, CurrencyError};
pub use series::{TimePoint, TimeSeries};
