//! Currency and cross-rate tags for portfolio positions.
//!
//! The portfolio base currency is CAD. Every non-base currency must have a
//! designated cross-rate factor that converts it into the base; the
//! cross-rate is itself a simulated price series (e.g. `USD/CAD`), tagged
//! here so it is never mistaken for a holdable asset currency.
//!
//! # Examples
//!
//! ```
//! use risk_core::AssetCurrency;
//!
//! assert!(AssetCurrency::CAD.is_base());
//! assert_eq!(AssetCurrency::USD.converter(), Some(AssetCurrency::UsdToCad));
//! assert!(AssetCurrency::UsdToCad.is_cross_rate());
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Currency tag for an asset or factor series.
///
/// Two kinds of variant live here: holdable currencies (`CAD`, `USD`) and
/// cross-rate factors (`UsdToCad`). An asset declared with a cross-rate
/// currency is a configuration error caught by the reporting layer.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AssetCurrency {
    /// Canadian Dollar: the portfolio base currency.
    CAD,
    /// United States Dollar.
    USD,
    /// USD→CAD exchange rate series (cross-rate factor, not holdable).
    #[serde(rename = "USD/CAD")]
    UsdToCad,
}

impl AssetCurrency {
    /// The portfolio base currency.
    pub const BASE: AssetCurrency = AssetCurrency::CAD;

    /// Returns the display code for this tag.
    ///
    /// Cross-rates use their pair form (`"USD/CAD"`).
    pub fn code(&self) -> &'static str {
        match self {
            AssetCurrency::CAD => "CAD",
            AssetCurrency::USD => "USD",
            AssetCurrency::UsdToCad => "USD/CAD",
        }
    }

    /// Returns `true` for the portfolio base currency.
    #[inline]
    pub fn is_base(&self) -> bool {
        *self == Self::BASE
    }

    /// Returns `true` when this tag marks an exchange-rate factor rather
    /// than a holdable currency.
    #[inline]
    pub fn is_cross_rate(&self) -> bool {
        matches!(self, AssetCurrency::UsdToCad)
    }

    /// Returns the cross-rate that converts this currency into the base.
    ///
    /// The base currency needs no conversion and cross-rates convert
    /// nothing; both return `None`.
    pub fn converter(&self) -> Option<AssetCurrency> {
        match self {
            AssetCurrency::CAD => None,
            AssetCurrency::USD => Some(AssetCurrency::UsdToCad),
            AssetCurrency::UsdToCad => None,
        }
    }

    /// Recognises a `BASE/QUOTE` pair symbol as a cross-rate tag.
    ///
    /// Returns `None` for symbols that are not a known conversion pair.
    ///
    /// # Examples
    ///
    /// ```
    /// use risk_core::AssetCurrency;
    ///
    /// assert_eq!(
    ///     AssetCurrency::from_pair_symbol("USD/CAD"),
    ///     Some(AssetCurrency::UsdToCad)
    /// );
    /// assert_eq!(AssetCurrency::from_pair_symbol("SPY"), None);
    /// ```
    pub fn from_pair_symbol(symbol: &str) -> Option<AssetCurrency> {
        match symbol.split_once('/') {
            Some(("USD", "CAD")) => Some(AssetCurrency::UsdToCad),
            _ => None,
        }
    }
}

impl fmt::Display for AssetCurrency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for AssetCurrency {
    type Err = CurrencyError;

    /// Parses a currency code (case-insensitive). Cross-rates accept both
    /// the pair form (`USD/CAD`) and the underscore form (`USD_TO_CAD`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "CAD" => Ok(AssetCurrency::CAD),
            "USD" => Ok(AssetCurrency::USD),
            "USD/CAD" | "USD_TO_CAD" => Ok(AssetCurrency::UsdToCad),
            _ => Err(CurrencyError::Unknown(s.to_string())),
        }
    }
}

/// Error parsing a currency tag from text.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum CurrencyError {
    /// The input did not match any known currency or cross-rate code.
    #[error("unknown currency code: '{0}'")]
    Unknown(String),
}
