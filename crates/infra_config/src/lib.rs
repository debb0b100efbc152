//! # infra_config: Portfolio Configuration
//!
//! Declares what a tail-risk analysis run operates on: the total allocation,
//! the asset positions (symbol, currency, weight), any additional factor
//! series such as cross-rates, and the historical date range. Configurations
//! load from TOML and are validated against an explicit required-field list
//! before the analysis core ever runs.
//!
//! ```
//! use infra_config::PortfolioConfig;
//!
//! let config = PortfolioConfig::sample().normalized().unwrap();
//! assert_eq!(config.assets.len(), 2);
//! assert!((config.assets.iter().map(|a| a.weight).sum::<f64>() - 1.0).abs() < 1e-12);
//! ```

pub mod error;
pub mod portfolio;

pub use error::ConfigError;
pub use portfolio::{AssetPosition, PortfolioConfig};
