//! # risk_core: Foundation Types for Tail-Risk Analytics
//!
//! ## Layer Role
//!
//! risk_core is the bottom layer of the workspace, providing:
//! - Price observation types: `TimePoint`, `TimeSeries` (`types::series`)
//! - Currency and cross-rate tags: `AssetCurrency` (`types::currency`)
//! - Trading-day calendar helpers (`calendar`)
//!
//! It has no dependencies on other workspace crates and minimal external
//! dependencies: chrono for date arithmetic, serde for serialisation and
//! thiserror for the parse error type.
//!
//! ## Usage Examples
//!
//! ```rust
//! use chrono::NaiveDate;
//! use risk_core::calendar::business_days;
//! use risk_core::{AssetCurrency, TimePoint, TimeSeries};
//!
//! // A three-observation price series
//! let series = TimeSeries::from_pairs(
//!     "SPY",
//!     vec![
//!         (NaiveDate::from_ymd_opt(2021, 3, 1).unwrap(), 389.58),
//!         (NaiveDate::from_ymd_opt(2021, 3, 2).unwrap(), 386.54),
//!         (NaiveDate::from_ymd_opt(2021, 3, 3).unwrap(), 381.42),
//!     ],
//! );
//! assert_eq!(series.len(), 3);
//!
//! // Currency tags
//! assert_eq!(AssetCurrency::USD.code(), "USD");
//! assert_eq!(AssetCurrency::USD.converter(), Some(AssetCurrency::UsdToCad));
//!
//! // Trading days in a range (inclusive, weekends excluded)
//! let days = business_days(
//!     NaiveDate::from_ymd_opt(2021, 3, 1).unwrap(),
//!     NaiveDate::from_ymd_opt(2021, 3, 5).unwrap(),
//! );
//! assert_eq!(days.len(), 5);
//! # let _ = TimePoint::new(days[0], 1.0);
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod calendar;
pub mod types;

pub use types::currency::{AssetCurrency, CurrencyError};
pub use types::series::{TimePoint, TimeSeries};
