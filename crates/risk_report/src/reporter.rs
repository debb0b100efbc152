//! Report construction from simulated scenarios.
//!
//! The reporter turns dimensionless cumulative-return paths into
//! dollar-denominated tail figures in four steps: price each asset's paths
//! in base currency (applying the cross-rate path from the same scenario for
//! foreign assets), decompose foreign assets into a "self" and an "FX"
//! factor, tail-average the raw priced outcomes, and only then scale by
//! investment size. The scaling order is deliberate and must not be
//! rearranged: averaging after scaling changes the numbers whenever the
//! tail sets differ.

use std::collections::HashMap;

use chrono::NaiveDate;
use infra_config::PortfolioConfig;
use risk_core::AssetCurrency;
use risk_engine::{Scenario, SimulationConfig};
use tracing::{debug, info};

use crate::error::ReportError;
use crate::report::{AssetReport, FactorKind, FxFactor, PnlMatrix, Report, TailRisk};
use crate::stats;

/// One resolved cross-rate: its simulated paths and the bucket-level
/// figures every asset in the currency shares.
struct FxContext<'s> {
    converter: AssetCurrency,
    raw_paths: Vec<&'s [f64]>,
    risk: TailRisk,
    pnl: PnlMatrix,
}

/// Assembles a [`Report`] from one completed simulation batch.
///
/// Expects the portfolio weights to be normalised already (the analysis
/// session normalises before simulating); the configuration is still
/// re-validated here so a standalone caller gets a proper error instead of
/// nonsense figures.
pub struct Reporter<'a> {
    portfolio: &'a PortfolioConfig,
    simulation: &'a SimulationConfig,
    scenarios: &'a [Scenario],
    prices: &'a HashMap<String, f64>,
    price_date: NaiveDate,
}

impl<'a> Reporter<'a> {
    /// Creates a reporter over one batch of scenarios.
    pub fn new(
        portfolio: &'a PortfolioConfig,
        simulation: &'a SimulationConfig,
        scenarios: &'a [Scenario],
        prices: &'a HashMap<String, f64>,
        price_date: NaiveDate,
    ) -> Self {
        Self {
            portfolio,
            simulation,
            scenarios,
            prices,
            price_date,
        }
    }

    /// Builds the report.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError`] when the configuration fails validation, the
    /// scenario set has the wrong shape, a required price or simulated path
    /// is missing, an asset is tagged with a cross-rate currency, or a
    /// foreign asset has no simulated converter.
    pub fn build(&self) -> Result<Report, ReportError> {
        self.portfolio.validate()?;
        let allocation = self.portfolio.total_allocation.unwrap_or_default();

        let expected_scenarios = self.simulation.simulation_count();
        if self.scenarios.len() != expected_scenarios {
            return Err(ReportError::ScenarioCount {
                expected: expected_scenarios,
                actual: self.scenarios.len(),
            });
        }
        let path_length = self.simulation.path_length();
        let currency_map = self.portfolio.currency_map()?;
        let take = stats::etl_take(expected_scenarios);

        // Every simulated symbol needs an as-of price.
        let mut current_prices = HashMap::with_capacity(currency_map.len());
        for symbol in currency_map.keys() {
            current_prices.insert(symbol.clone(), self.price_of(symbol)?);
        }

        let fx_contexts =
            self.resolve_fx_contexts(&currency_map, allocation, path_length, take)?;

        let mut assets = Vec::with_capacity(self.portfolio.assets.len());
        let mut pnl = Vec::with_capacity(self.portfolio.assets.len() + fx_contexts.len());
        let mut exposure_by_currency: HashMap<AssetCurrency, f64> = HashMap::new();
        let mut total = TailRisk {
            etl: 0.0,
            max_etl: 0.0,
        };

        for asset in &self.portfolio.assets {
            let current_price = self.price_of(&asset.symbol)?;
            let raw = self.collect_paths(&asset.symbol, path_length)?;

            // Base-currency assets price directly; foreign assets also ride
            // the cross-rate path of the same scenario.
            let context = match asset.currency.converter() {
                None => None,
                Some(converter) => Some(
                    fx_contexts
                        .iter()
                        .find(|ctx| ctx.converter == converter)
                        .ok_or(ReportError::MissingConverter { converter })?,
                ),
            };
            let priced: Vec<Vec<f64>> = match context {
                Some(ctx) => raw
                    .iter()
                    .zip(&ctx.raw_paths)
                    .map(|(path, fx_path)| {
                        path.iter()
                            .zip(fx_path.iter())
                            .map(|(ratio, fx)| ratio * current_price * fx)
                            .collect()
                    })
                    .collect(),
                None => raw
                    .iter()
                    .map(|path| path.iter().map(|ratio| ratio * current_price).collect())
                    .collect(),
            };

            let terminal_mean = stats::tail_mean(&stats::terminal_values(&priced), take);
            let minimum_mean = stats::tail_mean(&stats::path_minima(&priced), take);
            let tail = TailRisk {
                etl: terminal_mean / current_price * allocation * asset.weight,
                max_etl: minimum_mean / current_price * allocation * asset.weight,
            };

            let fx = match context {
                None => None,
                Some(ctx) => {
                    // Self factor: the asset priced in its own currency,
                    // with the exchange rate held still.
                    let self_priced: Vec<Vec<f64>> = raw
                        .iter()
                        .map(|path| path.iter().map(|ratio| ratio * current_price).collect())
                        .collect();
                    let self_terminal =
                        stats::tail_mean(&stats::terminal_values(&self_priced), take);
                    let self_minimum = stats::tail_mean(&stats::path_minima(&self_priced), take);
                    Some(FxFactor {
                        self_risk: TailRisk {
                            etl: self_terminal / current_price * allocation * asset.weight,
                            max_etl: self_minimum / current_price * allocation * asset.weight,
                        },
                        fx_risk: ctx.risk,
                    })
                }
            };

            let investment = allocation * asset.weight;
            *exposure_by_currency.entry(asset.currency).or_insert(0.0) += investment;
            total.etl += tail.etl;
            total.max_etl += tail.max_etl;
            debug!(
                symbol = asset.symbol.as_str(),
                etl = tail.etl,
                max_etl = tail.max_etl,
                "asset tail risk computed"
            );

            pnl.push(PnlMatrix {
                symbol: asset.symbol.clone(),
                kind: FactorKind::Asset,
                values: priced
                    .iter()
                    .map(|path| {
                        path.iter()
                            .map(|value| value * allocation * asset.weight / current_price)
                            .collect()
                    })
                    .collect(),
            });
            assets.push(AssetReport {
                symbol: asset.symbol.clone(),
                currency: asset.currency,
                weight: asset.weight,
                investment,
                current_price,
                tail,
                fx,
            });
        }

        for ctx in fx_contexts {
            pnl.push(ctx.pnl);
        }

        info!(
            assets = assets.len(),
            etl = total.etl,
            max_etl = total.max_etl,
            "report assembled"
        );
        Ok(Report {
            price_date: self.price_date,
            current_prices,
            assets,
            total,
            exposure_by_currency,
            pnl,
        })
    }

    /// Resolves the cross-rate context for every foreign currency held,
    /// in order of first appearance in the asset list.
    ///
    /// The bucket figures are computed once per currency: the FX factor is
    /// scaled by the *summed* investment of all assets in that currency.
    fn resolve_fx_contexts(
        &self,
        currency_map: &HashMap<String, AssetCurrency>,
        allocation: f64,
        path_length: usize,
        take: usize,
    ) -> Result<Vec<FxContext<'a>>, ReportError> {
        struct Bucket {
            currency: AssetCurrency,
            weight_sum: f64,
        }

        let mut buckets: Vec<Bucket> = Vec::new();
        for asset in &self.portfolio.assets {
            if asset.currency.is_cross_rate() {
                return Err(ReportError::InvalidAssetCurrency {
                    symbol: asset.symbol.clone(),
                    currency: asset.currency,
                });
            }
            if asset.currency.is_base() {
                continue;
            }
            match buckets.iter_mut().find(|b| b.currency == asset.currency) {
                Some(bucket) => bucket.weight_sum += asset.weight,
                None => buckets.push(Bucket {
                    currency: asset.currency,
                    weight_sum: asset.weight,
                }),
            }
        }

        let mut contexts = Vec::with_capacity(buckets.len());
        for bucket in buckets {
            let Some(converter) = bucket.currency.converter() else {
                return Err(ReportError::MissingConverter {
                    converter: bucket.currency,
                });
            };
            let symbol = currency_map
                .iter()
                .find(|(_, &currency)| currency == converter)
                .map(|(symbol, _)| symbol.clone())
                .ok_or(ReportError::MissingConverter { converter })?;
            let price = self.price_of(&symbol)?;
            let raw_paths = self.collect_paths(&symbol, path_length)?;

            let priced: Vec<Vec<f64>> = raw_paths
                .iter()
                .map(|path| path.iter().map(|ratio| ratio * price).collect())
                .collect();
            let terminal_mean = stats::tail_mean(&stats::terminal_values(&priced), take);
            let minimum_mean = stats::tail_mean(&stats::path_minima(&priced), take);
            let risk = TailRisk {
                etl: terminal_mean / price * allocation * bucket.weight_sum,
                max_etl: minimum_mean / price * allocation * bucket.weight_sum,
            };
            debug!(
                converter = %converter,
                symbol = symbol.as_str(),
                bucket_weight = bucket.weight_sum,
                etl = risk.etl,
                "cross-rate factor computed"
            );

            let pnl = PnlMatrix {
                symbol: symbol.clone(),
                kind: FactorKind::ExchangeRate,
                values: priced
                    .iter()
                    .map(|path| {
                        path.iter()
                            .map(|value| value * allocation * bucket.weight_sum / price)
                            .collect()
                    })
                    .collect(),
            };
            contexts.push(FxContext {
                converter,
                raw_paths,
                risk,
                pnl,
            });
        }
        Ok(contexts)
    }

    fn price_of(&self, symbol: &str) -> Result<f64, ReportError> {
        self.prices
            .get(symbol)
            .copied()
            .ok_or_else(|| ReportError::MissingPrice {
                symbol: symbol.to_string(),
            })
    }

    /// Gathers one symbol's path from every scenario, in scenario order,
    /// enforcing the expected path length.
    fn collect_paths(
        &self,
        symbol: &str,
        path_length: usize,
    ) -> Result<Vec<&'a [f64]>, ReportError> {
        self.scenarios
            .iter()
            .map(|scenario| {
                let path = scenario
                    .path(symbol)
                    .ok_or_else(|| ReportError::MissingPath {
                        symbol: symbol.to_string(),
                    })?;
                if path.len() != path_length {
                    return Err(ReportError::MalformedPnL {
                        symbol: symbol.to_string(),
                        expected: path_length,
                        actual: path.len(),
                    });
                }
                Ok(path)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use infra_config::AssetPosition;
    use risk_core::TimeSeries;
    use risk_engine::HistoricalSimulation;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn week_series(name: &str, values: [f64; 5]) -> TimeSeries {
        TimeSeries::from_pairs(
            name,
            (1..=5).map(|d| (ymd(2021, 3, d), values[d as usize - 1])).collect(),
        )
    }

    /// Engine setup whose draw domain collapses to a single start index, so
    /// every path is known in closed form.
    fn pinned_simulation(series: &[TimeSeries], count: usize) -> (SimulationConfig, Vec<Scenario>) {
        let config = SimulationConfig::builder()
            .window_return_days(2)
            .window_count(1)
            .simulation_count(count)
            .seed(11)
            .build()
            .unwrap();
        let scenarios = HistoricalSimulation::new(series, config.clone())
            .unwrap()
            .run()
            .unwrap();
        (config, scenarios)
    }

    fn two_asset_portfolio(allocation: f64) -> PortfolioConfig {
        PortfolioConfig {
            total_allocation: Some(allocation),
            assets: vec![
                AssetPosition::new("SPY", AssetCurrency::USD, 1.0),
                AssetPosition::new("XIU", AssetCurrency::CAD, 1.0),
            ],
            additional_factors: vec!["USD/CAD".to_string()],
            start_date: Some(ymd(2021, 3, 1)),
            end_date: Some(ymd(2021, 3, 5)),
        }
        .normalized()
        .unwrap()
    }

    fn fixture_prices() -> HashMap<String, f64> {
        HashMap::from([
            ("SPY".to_string(), 100.0),
            ("XIU".to_string(), 50.0),
            ("USD/CAD".to_string(), 1.25),
        ])
    }

    fn fixture_series() -> Vec<TimeSeries> {
        vec![
            week_series("SPY", [100.0, 101.0, 99.0, 102.0, 100.0]),
            week_series("XIU", [50.0, 49.0, 51.0, 50.0, 52.0]),
            week_series("USD/CAD", [1.25, 1.25, 1.30, 1.20, 1.25]),
        ]
    }

    // With the pinned window the paths are:
    //   SPY      [1.01, 0.99]
    //   XIU      [0.98, 1.02]
    //   USD/CAD  [1.00, 1.04]
    // and with allocation 2000 at weights 0.5/0.5 every figure below follows
    // by hand.
    #[test]
    fn test_report_figures_on_pinned_scenario() {
        let portfolio = two_asset_portfolio(2_000.0);
        let (sim, scenarios) = pinned_simulation(&fixture_series(), 1);
        let prices = fixture_prices();
        let report = Reporter::new(&portfolio, &sim, &scenarios, &prices, ymd(2021, 3, 5))
            .build()
            .unwrap();

        assert_eq!(report.price_date, ymd(2021, 3, 5));
        assert_eq!(report.assets.len(), 2);

        // SPY is foreign: terminal 0.99 * 100 * 1.04 = 102.96, minimum
        // 1.01 * 100 * 1.00 = 101.
        let spy = report.asset("SPY").unwrap();
        assert_relative_eq!(spy.tail.etl, 1_029.6, max_relative = 1e-9);
        assert_relative_eq!(spy.tail.max_etl, 1_010.0, max_relative = 1e-9);
        assert_relative_eq!(spy.investment, 1_000.0, max_relative = 1e-12);
        let fx = spy.fx.unwrap();
        // Self factor: FX held still, terminal and minimum both 99.
        assert_relative_eq!(fx.self_risk.etl, 990.0, max_relative = 1e-9);
        assert_relative_eq!(fx.self_risk.max_etl, 990.0, max_relative = 1e-9);
        // FX factor over the USD bucket (weight 0.5): terminal 1.04 * 1.25,
        // minimum 1.00 * 1.25, each / 1.25 * 2000 * 0.5.
        assert_relative_eq!(fx.fx_risk.etl, 1_040.0, max_relative = 1e-9);
        assert_relative_eq!(fx.fx_risk.max_etl, 1_000.0, max_relative = 1e-9);

        // XIU is base currency: no decomposition, no FX multiplication.
        let xiu = report.asset("XIU").unwrap();
        assert_relative_eq!(xiu.tail.etl, 1_020.0, max_relative = 1e-9);
        assert_relative_eq!(xiu.tail.max_etl, 980.0, max_relative = 1e-9);
        assert!(xiu.fx.is_none());

        assert_relative_eq!(report.total.etl, 2_049.6, max_relative = 1e-9);
        assert_relative_eq!(report.total.max_etl, 1_990.0, max_relative = 1e-9);
        assert_relative_eq!(
            report.exposure_by_currency[&AssetCurrency::USD],
            1_000.0,
            max_relative = 1e-12
        );
        assert_relative_eq!(
            report.exposure_by_currency[&AssetCurrency::CAD],
            1_000.0,
            max_relative = 1e-12
        );
    }

    #[test]
    fn test_pnl_matrices_are_tagged_and_scaled() {
        let portfolio = two_asset_portfolio(2_000.0);
        let (sim, scenarios) = pinned_simulation(&fixture_series(), 1);
        let prices = fixture_prices();
        let report = Reporter::new(&portfolio, &sim, &scenarios, &prices, ymd(2021, 3, 5))
            .build()
            .unwrap();

        assert_eq!(report.pnl.len(), 3);
        let spy = report.pnl_matrix("SPY", FactorKind::Asset).unwrap();
        assert_eq!(spy.values.len(), 1);
        assert_relative_eq!(spy.values[0][0], 1_010.0, max_relative = 1e-9);
        assert_relative_eq!(spy.values[0][1], 1_029.6, max_relative = 1e-9);

        let xiu = report.pnl_matrix("XIU", FactorKind::Asset).unwrap();
        assert_relative_eq!(xiu.values[0][0], 980.0, max_relative = 1e-9);
        assert_relative_eq!(xiu.values[0][1], 1_020.0, max_relative = 1e-9);

        let fx = report.pnl_matrix("USD/CAD", FactorKind::ExchangeRate).unwrap();
        assert_relative_eq!(fx.values[0][0], 1_000.0, max_relative = 1e-9);
        assert_relative_eq!(fx.values[0][1], 1_040.0, max_relative = 1e-9);
    }

    #[test]
    fn test_max_etl_never_better_than_etl() {
        let portfolio = two_asset_portfolio(2_000.0);
        let (sim, scenarios) = pinned_simulation(&fixture_series(), 25);
        let prices = fixture_prices();
        let report = Reporter::new(&portfolio, &sim, &scenarios, &prices, ymd(2021, 3, 5))
            .build()
            .unwrap();
        for asset in &report.assets {
            assert!(asset.tail.max_etl <= asset.tail.etl);
        }
        assert!(report.total.max_etl <= report.total.etl);
    }

    #[test]
    fn test_fx_factor_is_shared_across_the_currency_bucket() {
        let spy = week_series("SPY", [100.0, 101.0, 99.0, 102.0, 100.0]);
        let doubled = TimeSeries::from_pairs(
            "SPY2",
            spy.points().iter().map(|p| (p.date, p.value * 2.0)).collect(),
        );
        let fx = week_series("USD/CAD", [1.25, 1.25, 1.30, 1.20, 1.25]);
        let portfolio = PortfolioConfig {
            total_allocation: Some(1_000.0),
            assets: vec![
                AssetPosition::new("SPY", AssetCurrency::USD, 1.0),
                AssetPosition::new("SPY2", AssetCurrency::USD, 3.0),
            ],
            additional_factors: vec!["USD/CAD".to_string()],
            start_date: Some(ymd(2021, 3, 1)),
            end_date: Some(ymd(2021, 3, 5)),
        }
        .normalized()
        .unwrap();
        let (sim, scenarios) = pinned_simulation(&[spy, doubled, fx], 1);
        let prices = HashMap::from([
            ("SPY".to_string(), 100.0),
            ("SPY2".to_string(), 200.0),
            ("USD/CAD".to_string(), 1.25),
        ]);
        let report = Reporter::new(&portfolio, &sim, &scenarios, &prices, ymd(2021, 3, 5))
            .build()
            .unwrap();

        let first = report.asset("SPY").unwrap().fx.unwrap();
        let second = report.asset("SPY2").unwrap().fx.unwrap();
        assert_eq!(first.fx_risk, second.fx_risk);
        // Bucket weight is the full portfolio: 1.04 / 1.25 * 1.25 * 1000.
        assert_relative_eq!(first.fx_risk.etl, 1_040.0, max_relative = 1e-9);
        assert_relative_eq!(first.fx_risk.max_etl, 1_000.0, max_relative = 1e-9);
        // Exactly one exchange-rate matrix despite two foreign assets.
        let fx_matrices = report
            .pnl
            .iter()
            .filter(|m| m.kind == FactorKind::ExchangeRate)
            .count();
        assert_eq!(fx_matrices, 1);
    }

    #[test]
    fn test_cross_rate_asset_is_rejected() {
        let fx = week_series("USD/CAD", [1.25, 1.25, 1.30, 1.20, 1.25]);
        let portfolio = PortfolioConfig {
            total_allocation: Some(1_000.0),
            assets: vec![AssetPosition::new("USD/CAD", AssetCurrency::UsdToCad, 1.0)],
            additional_factors: Vec::new(),
            start_date: Some(ymd(2021, 3, 1)),
            end_date: Some(ymd(2021, 3, 5)),
        }
        .normalized()
        .unwrap();
        let (sim, scenarios) = pinned_simulation(&[fx], 1);
        let prices = HashMap::from([("USD/CAD".to_string(), 1.25)]);
        let err = Reporter::new(&portfolio, &sim, &scenarios, &prices, ymd(2021, 3, 5))
            .build()
            .unwrap_err();
        assert!(matches!(
            err,
            ReportError::InvalidAssetCurrency {
                currency: AssetCurrency::UsdToCad,
                ..
            }
        ));
    }

    #[test]
    fn test_missing_converter_is_fatal() {
        let spy = week_series("SPY", [100.0, 101.0, 99.0, 102.0, 100.0]);
        let portfolio = PortfolioConfig {
            total_allocation: Some(1_000.0),
            assets: vec![AssetPosition::new("SPY", AssetCurrency::USD, 1.0)],
            additional_factors: Vec::new(),
            start_date: Some(ymd(2021, 3, 1)),
            end_date: Some(ymd(2021, 3, 5)),
        }
        .normalized()
        .unwrap();
        let (sim, scenarios) = pinned_simulation(&[spy], 1);
        let prices = HashMap::from([("SPY".to_string(), 100.0)]);
        let err = Reporter::new(&portfolio, &sim, &scenarios, &prices, ymd(2021, 3, 5))
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            ReportError::MissingConverter {
                converter: AssetCurrency::UsdToCad
            }
        );
    }

    #[test]
    fn test_missing_price_is_fatal() {
        let portfolio = two_asset_portfolio(2_000.0);
        let (sim, scenarios) = pinned_simulation(&fixture_series(), 1);
        let mut prices = fixture_prices();
        prices.remove("XIU");
        let err = Reporter::new(&portfolio, &sim, &scenarios, &prices, ymd(2021, 3, 5))
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            ReportError::MissingPrice {
                symbol: "XIU".to_string()
            }
        );
    }

    #[test]
    fn test_scenario_count_mismatch_is_fatal() {
        let portfolio = two_asset_portfolio(2_000.0);
        let (sim, scenarios) = pinned_simulation(&fixture_series(), 2);
        let prices = fixture_prices();
        let err = Reporter::new(&portfolio, &sim, &scenarios[..1], &prices, ymd(2021, 3, 5))
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            ReportError::ScenarioCount {
                expected: 2,
                actual: 1
            }
        );
    }

    #[test]
    fn test_path_length_mismatch_is_fatal() {
        let portfolio = two_asset_portfolio(2_000.0);
        let (_, scenarios) = pinned_simulation(&fixture_series(), 1);
        // A configuration expecting three-day paths against two-day output.
        let wrong = SimulationConfig::builder()
            .window_return_days(3)
            .window_count(1)
            .simulation_count(1)
            .build()
            .unwrap();
        let prices = fixture_prices();
        let err = Reporter::new(&portfolio, &wrong, &scenarios, &prices, ymd(2021, 3, 5))
            .build()
            .unwrap_err();
        assert!(matches!(
            err,
            ReportError::MalformedPnL {
                expected: 3,
                actual: 2,
                ..
            }
        ));
    }

    #[test]
    fn test_unsimulated_asset_is_fatal() {
        let portfolio = two_asset_portfolio(2_000.0);
        // XIU never entered the simulation.
        let series = vec![
            week_series("SPY", [100.0, 101.0, 99.0, 102.0, 100.0]),
            week_series("USD/CAD", [1.25, 1.25, 1.30, 1.20, 1.25]),
        ];
        let (sim, scenarios) = pinned_simulation(&series, 1);
        let prices = fixture_prices();
        let err = Reporter::new(&portfolio, &sim, &scenarios, &prices, ymd(2021, 3, 5))
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            ReportError::MissingPath {
                symbol: "XIU".to_string()
            }
        );
    }
}
