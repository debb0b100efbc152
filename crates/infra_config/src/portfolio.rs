//! Portfolio configuration: positions, factors, allocation, date range.

use std::collections::HashMap;
use std::path::Path;

use chrono::NaiveDate;
use risk_core::AssetCurrency;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ConfigError;

/// One portfolio position: a symbol, its trading currency and its target
/// weight relative to the other positions.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AssetPosition {
    /// Ticker symbol of the position.
    pub symbol: String,
    /// Currency the asset trades in.
    pub currency: AssetCurrency,
    /// Relative weight; normalised against the sum of all weights.
    pub weight: f64,
}

impl AssetPosition {
    /// Creates a position.
    pub fn new(symbol: impl Into<String>, currency: AssetCurrency, weight: f64) -> Self {
        Self {
            symbol: symbol.into(),
            currency,
            weight,
        }
    }
}

/// Everything a tail-risk analysis run needs to know about the portfolio.
///
/// Scalar fields are optional so a partially filled configuration can be
/// deserialised and then reported against the explicit required-field list
/// ([`PortfolioConfig::missing_fields`]); the analysis layer only accepts a
/// configuration that passed [`PortfolioConfig::normalized`].
///
/// # TOML layout
///
/// ```toml
/// total_allocation = 2000000000.0
/// start_date = "2017-01-01"
/// end_date = "2021-12-31"
/// additional_factors = ["USD/CAD"]
///
/// [[assets]]
/// symbol = "SPY"
/// currency = "USD"
/// weight = 1.0
///
/// [[assets]]
/// symbol = "XIU"
/// currency = "CAD"
/// weight = 1.0
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PortfolioConfig {
    /// Total portfolio allocation in base-currency units.
    pub total_allocation: Option<f64>,
    /// Asset positions.
    #[serde(default)]
    pub assets: Vec<AssetPosition>,
    /// Non-asset factor series required by the analysis (e.g. cross-rates).
    #[serde(default)]
    pub additional_factors: Vec<String>,
    /// First historical date to request, inclusive.
    pub start_date: Option<NaiveDate>,
    /// Last historical date to request, inclusive.
    pub end_date: Option<NaiveDate>,
}

impl PortfolioConfig {
    /// Loads a configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::Io(e.to_string()))?;
        debug!(path = %path.display(), "loaded portfolio configuration");
        Self::from_toml_str(&content)
    }

    /// Parses a configuration from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// The canonical demonstration portfolio: SPY (USD) and XIU (CAD) at
    /// equal weight with the USD/CAD cross-rate as additional factor, two
    /// billion CAD allocated, five years of history.
    pub fn sample() -> Self {
        Self {
            total_allocation: Some(2_000_000_000.0),
            assets: vec![
                AssetPosition::new("SPY", AssetCurrency::USD, 1.0),
                AssetPosition::new("XIU", AssetCurrency::CAD, 1.0),
            ],
            additional_factors: vec!["USD/CAD".to_string()],
            start_date: NaiveDate::from_ymd_opt(2017, 1, 1),
            end_date: NaiveDate::from_ymd_opt(2021, 12, 31),
        }
    }

    /// Returns the names of required fields that are still unset.
    ///
    /// The required set is spelled out here rather than derived, so it is
    /// visible at compile time: `total_allocation`, at least one asset, and
    /// both date bounds. `additional_factors` is legitimately optional.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.total_allocation.is_none() {
            missing.push("total_allocation");
        }
        if self.assets.is_empty() {
            missing.push("assets");
        }
        if self.start_date.is_none() {
            missing.push("start_date");
        }
        if self.end_date.is_none() {
            missing.push("end_date");
        }
        missing
    }

    /// Checks completeness and internal consistency.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let missing = self.missing_fields();
        if !missing.is_empty() {
            return Err(ConfigError::MissingFields(missing));
        }

        for (index, asset) in self.assets.iter().enumerate() {
            if self.assets[..index].iter().any(|a| a.symbol == asset.symbol) {
                return Err(ConfigError::DuplicateAsset {
                    symbol: asset.symbol.clone(),
                });
            }
            if !asset.weight.is_finite() || asset.weight < 0.0 {
                return Err(ConfigError::InvalidWeight {
                    symbol: asset.symbol.clone(),
                    weight: asset.weight,
                });
            }
        }

        let sum: f64 = self.assets.iter().map(|a| a.weight).sum();
        if sum <= 0.0 || !sum.is_finite() {
            return Err(ConfigError::UnnormalisableWeights { sum });
        }

        if let (Some(start), Some(end)) = (self.start_date, self.end_date) {
            if start >= end {
                return Err(ConfigError::InvalidDateRange { start, end });
            }
        }

        self.currency_map().map(|_| ())
    }

    /// Validates and returns a copy whose weights sum to one.
    pub fn normalized(&self) -> Result<Self, ConfigError> {
        self.validate()?;
        let sum: f64 = self.assets.iter().map(|a| a.weight).sum();
        let mut normalized = self.clone();
        for asset in &mut normalized.assets {
            asset.weight /= sum;
        }
        Ok(normalized)
    }

    /// Every symbol the analysis must simulate: asset symbols first, then
    /// the additional factors, duplicates removed preserving first
    /// occurrence.
    pub fn all_factors(&self) -> Vec<String> {
        let mut factors: Vec<String> = Vec::new();
        for symbol in self
            .assets
            .iter()
            .map(|a| a.symbol.as_str())
            .chain(self.additional_factors.iter().map(String::as_str))
        {
            if !factors.iter().any(|existing| existing == symbol) {
                factors.push(symbol.to_string());
            }
        }
        factors
    }

    /// Currency tag for every simulated symbol.
    ///
    /// Assets carry their declared currency; additional factors are
    /// recognised by their `BASE/QUOTE` pair form. A factor that is neither
    /// an asset nor a recognisable pair is a configuration error.
    pub fn currency_map(&self) -> Result<HashMap<String, AssetCurrency>, ConfigError> {
        let mut map: HashMap<String, AssetCurrency> = self
            .assets
            .iter()
            .map(|a| (a.symbol.clone(), a.currency))
            .collect();

        for factor in &self.additional_factors {
            if map.contains_key(factor) {
                continue;
            }
            let currency = AssetCurrency::from_pair_symbol(factor)
                .ok_or_else(|| ConfigError::UnknownFactorCurrency(factor.clone()))?;
            map.insert(factor.clone(), currency);
        }
        Ok(map)
    }
}
