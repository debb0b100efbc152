//! End-to-end analysis sessions over an in-memory quote supply.
//!
//! The week-long fixture keeps the window-start draw domain a single day
//! wide, so every scenario replays the same historical episode and the
//! report figures can be checked against hand-computed values.

use adapter_quotes::MemoryQuotes;
use approx::assert_relative_eq;
use chrono::NaiveDate;
use infra_config::{AssetPosition, PortfolioConfig};
use risk_analyzer::PortfolioAnalyzer;
use risk_core::calendar::business_days;
use risk_core::AssetCurrency;
use risk_engine::SimulationConfig;
use risk_report::{FactorKind, Report, ReportConsumer, TailRisk};

fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Mon 2021-03-01 through Fri 2021-03-05 for both assets and the cross-rate.
fn week_quotes() -> MemoryQuotes {
    let days: Vec<NaiveDate> = (1..=5).map(|d| ymd(2021, 3, d)).collect();
    let mut quotes = MemoryQuotes::new();
    quotes.insert(
        "SPY",
        days.iter().copied().zip([100.0, 101.0, 99.0, 102.0, 100.0]).collect(),
    );
    quotes.insert(
        "XIU",
        days.iter().copied().zip([50.0, 49.0, 51.0, 50.0, 52.0]).collect(),
    );
    quotes.insert(
        "USD/CAD",
        days.iter().copied().zip([1.25, 1.25, 1.30, 1.20, 1.25]).collect(),
    );
    quotes
}

fn week_portfolio() -> PortfolioConfig {
    PortfolioConfig {
        total_allocation: Some(2_000.0),
        assets: vec![
            AssetPosition::new("SPY", AssetCurrency::USD, 1.0),
            AssetPosition::new("XIU", AssetCurrency::CAD, 1.0),
        ],
        additional_factors: vec!["USD/CAD".to_string()],
        start_date: Some(ymd(2021, 3, 1)),
        end_date: Some(ymd(2021, 3, 5)),
    }
}

fn week_portfolio_over(start: NaiveDate, end: NaiveDate) -> PortfolioConfig {
    PortfolioConfig {
        start_date: Some(start),
        end_date: Some(end),
        ..week_portfolio()
    }
}

/// One two-day window per scenario; the week fixture leaves only one start.
fn pinned_config() -> SimulationConfig {
    SimulationConfig::builder()
        .window_return_days(2)
        .window_count(1)
        .simulation_count(2)
        .seed(11)
        .build()
        .unwrap()
}

/// Deterministic wobbly quotes on every business day of the range.
fn wobble_quotes(start: NaiveDate, end: NaiveDate) -> MemoryQuotes {
    let days = business_days(start, end);
    let mut quotes = MemoryQuotes::new();
    quotes.insert(
        "SPY",
        days.iter()
            .enumerate()
            .map(|(i, &day)| (day, 380.0 + ((i * 17 + 3) % 41) as f64 * 0.25))
            .collect(),
    );
    quotes.insert(
        "XIU",
        days.iter()
            .enumerate()
            .map(|(i, &day)| (day, 26.0 + ((i * 13 + 7) % 29) as f64 * 0.05))
            .collect(),
    );
    quotes.insert(
        "USD/CAD",
        days.iter()
            .enumerate()
            .map(|(i, &day)| (day, 1.25 + ((i * 11 + 1) % 23) as f64 * 0.002))
            .collect(),
    );
    quotes
}

#[test]
fn test_week_fixture_matches_hand_computed_figures() {
    let quotes = week_quotes();
    let analyzer = PortfolioAnalyzer::new(&quotes, week_portfolio(), pinned_config()).unwrap();
    let report = analyzer.run().unwrap();

    assert_eq!(report.price_date, ymd(2021, 3, 5));
    assert_eq!(report.current_prices["SPY"], 100.0);
    assert_eq!(report.current_prices["XIU"], 52.0);
    assert_eq!(report.current_prices["USD/CAD"], 1.25);

    // SPY: terminal relative 0.99 * FX relative 1.04, worst day is day one.
    let spy = report.asset("SPY").unwrap();
    assert_eq!(spy.currency, AssetCurrency::USD);
    assert_eq!(spy.weight, 0.5);
    assert_eq!(spy.investment, 1_000.0);
    assert_eq!(spy.current_price, 100.0);
    assert_relative_eq!(spy.tail.etl, 1_029.6, max_relative = 1e-9);
    assert_relative_eq!(spy.tail.max_etl, 1_010.0, max_relative = 1e-9);
    let fx = spy.fx.unwrap();
    assert_relative_eq!(fx.self_risk.etl, 990.0, max_relative = 1e-9);
    assert_relative_eq!(fx.self_risk.max_etl, 990.0, max_relative = 1e-9);
    assert_relative_eq!(fx.fx_risk.etl, 1_040.0, max_relative = 1e-9);
    assert_relative_eq!(fx.fx_risk.max_etl, 1_000.0, max_relative = 1e-9);

    // XIU trades in the base currency, so it carries no decomposition; its
    // as-of price of 52 cancels out of the allocation-scaled figures.
    let xiu = report.asset("XIU").unwrap();
    assert_eq!(xiu.current_price, 52.0);
    assert!(xiu.fx.is_none());
    assert_relative_eq!(xiu.tail.etl, 1_020.0, max_relative = 1e-9);
    assert_relative_eq!(xiu.tail.max_etl, 980.0, max_relative = 1e-9);

    assert_relative_eq!(report.total.etl, 2_049.6, max_relative = 1e-9);
    assert_relative_eq!(report.total.max_etl, 1_990.0, max_relative = 1e-9);
    assert_eq!(report.exposure_by_currency[&AssetCurrency::USD], 1_000.0);
    assert_eq!(report.exposure_by_currency[&AssetCurrency::CAD], 1_000.0);

    assert_eq!(report.pnl.len(), 3);
    let spy_pnl = report.pnl_matrix("SPY", FactorKind::Asset).unwrap();
    let xiu_pnl = report.pnl_matrix("XIU", FactorKind::Asset).unwrap();
    let fx_pnl = report.pnl_matrix("USD/CAD", FactorKind::ExchangeRate).unwrap();
    for (matrix, expected) in [
        (spy_pnl, [1_010.0, 1_029.6]),
        (xiu_pnl, [980.0, 1_020.0]),
        (fx_pnl, [1_000.0, 1_040.0]),
    ] {
        assert_eq!(matrix.values.len(), 2);
        for row in &matrix.values {
            assert_eq!(row.len(), 2);
            assert_relative_eq!(row[0], expected[0], max_relative = 1e-9);
            assert_relative_eq!(row[1], expected[1], max_relative = 1e-9);
        }
    }
}

#[test]
fn test_stage_methods_compose_like_run() {
    let quotes = week_quotes();
    let analyzer = PortfolioAnalyzer::new(&quotes, week_portfolio(), pinned_config()).unwrap();

    let engine = analyzer.prepare().unwrap();
    assert_eq!(engine.min_date(), ymd(2021, 3, 2));
    assert_eq!(engine.max_usable_date(), ymd(2021, 3, 3));

    let scenarios = analyzer.simulate(&engine).unwrap();
    assert_eq!(scenarios.len(), 2);
    for scenario in &scenarios {
        assert_eq!(scenario.path("SPY").unwrap().len(), 2);
    }

    let staged = analyzer.report(&scenarios).unwrap();
    let bundled = analyzer.run().unwrap();
    assert_eq!(staged, bundled);
}

#[test]
fn test_same_seed_reproduces_the_report() {
    let (start, end) = (ymd(2021, 3, 1), ymd(2021, 6, 30));
    let quotes = wobble_quotes(start, end);
    let config = SimulationConfig::builder()
        .window_return_days(5)
        .window_count(2)
        .simulation_count(16)
        .seed(99)
        .build()
        .unwrap();

    let run = |config: SimulationConfig| {
        PortfolioAnalyzer::new(&quotes, week_portfolio_over(start, end), config)
            .unwrap()
            .run()
            .unwrap()
    };

    assert_eq!(run(config.clone()), run(config));
}

#[test]
fn test_five_year_run_has_the_expected_shape() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();

    let portfolio = PortfolioConfig::sample();
    let quotes = wobble_quotes(
        portfolio.start_date.unwrap(),
        portfolio.end_date.unwrap(),
    );
    let config = SimulationConfig::builder()
        .simulation_count(40)
        .seed(7)
        .workers(2)
        .build()
        .unwrap();
    let allocation = portfolio.total_allocation.unwrap();

    let analyzer = PortfolioAnalyzer::new(&quotes, portfolio, config).unwrap();
    let report = analyzer.run().unwrap();

    assert_eq!(report.price_date, ymd(2021, 12, 31));
    assert_eq!(report.current_prices.len(), 3);
    assert_eq!(report.assets.len(), 2);
    assert_eq!(report.pnl.len(), 3);

    // Quarterly defaults: four 65-day windows give 260-day paths.
    for matrix in &report.pnl {
        assert_eq!(matrix.values.len(), 40);
        for row in &matrix.values {
            assert_eq!(row.len(), 260);
        }
    }

    let mut etl_sum = 0.0;
    for asset in &report.assets {
        assert!(asset.tail.etl.is_finite());
        assert!(asset.tail.max_etl <= asset.tail.etl);
        etl_sum += asset.tail.etl;
    }
    assert_relative_eq!(report.total.etl, etl_sum, max_relative = 1e-12);
    assert!(report.total.max_etl <= report.total.etl);

    let exposure: f64 = report.exposure_by_currency.values().sum();
    assert_relative_eq!(exposure, allocation, max_relative = 1e-12);
}

#[derive(Default)]
struct Captured {
    deliveries: usize,
    last_total: Option<TailRisk>,
}

impl ReportConsumer for Captured {
    fn deliver(&mut self, report: &Report) {
        self.deliveries += 1;
        self.last_total = Some(report.total);
    }
}

#[test]
fn test_run_and_deliver_hands_the_report_to_the_consumer() {
    let quotes = week_quotes();
    let analyzer = PortfolioAnalyzer::new(&quotes, week_portfolio(), pinned_config()).unwrap();

    let mut consumer = Captured::default();
    let report = analyzer.run_and_deliver(&mut consumer).unwrap();

    assert_eq!(consumer.deliveries, 1);
    assert_eq!(consumer.last_total, Some(report.total));
}
