//! The analysis session object.

use std::collections::HashMap;

use adapter_quotes::{QuoteProvider, SymbolQuery};
use chrono::NaiveDate;
use infra_config::{ConfigError, PortfolioConfig};
use risk_engine::{align, HistoricalSimulation, Scenario, SimulationConfig};
use risk_report::{Report, ReportConsumer, Reporter};
use tracing::{debug, info};

use crate::error::AnalyzerError;

/// One end-to-end tail-risk analysis: fetch, align, simulate, report.
///
/// The session borrows a price supplier and owns a validated, normalised
/// copy of the portfolio configuration; all intermediate state (fetched
/// series, the simulator, scenario batches) flows through the stage methods
/// explicitly rather than living in globals.
///
/// # Examples
///
/// ```rust
/// use adapter_quotes::MemoryQuotes;
/// use chrono::NaiveDate;
/// use infra_config::{AssetPosition, PortfolioConfig};
/// use risk_analyzer::PortfolioAnalyzer;
/// use risk_core::AssetCurrency;
/// use risk_engine::SimulationConfig;
///
/// fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
///     NaiveDate::from_ymd_opt(y, m, d).unwrap()
/// }
///
/// let mut quotes = MemoryQuotes::new();
/// quotes.insert(
///     "SPY",
///     vec![
///         (ymd(2021, 3, 1), 100.0),
///         (ymd(2021, 3, 2), 101.0),
///         (ymd(2021, 3, 3), 99.0),
///         (ymd(2021, 3, 4), 102.0),
///         (ymd(2021, 3, 5), 100.0),
///     ],
/// );
/// quotes.insert(
///     "USD/CAD",
///     vec![
///         (ymd(2021, 3, 1), 1.25),
///         (ymd(2021, 3, 2), 1.25),
///         (ymd(2021, 3, 3), 1.30),
///         (ymd(2021, 3, 4), 1.20),
///         (ymd(2021, 3, 5), 1.25),
///     ],
/// );
///
/// let portfolio = PortfolioConfig {
///     total_allocation: Some(1_000.0),
///     assets: vec![AssetPosition::new("SPY", AssetCurrency::USD, 1.0)],
///     additional_factors: vec!["USD/CAD".to_string()],
///     start_date: Some(ymd(2021, 3, 1)),
///     end_date: Some(ymd(2021, 3, 5)),
/// };
/// let simulation = SimulationConfig::builder()
///     .window_return_days(2)
///     .window_count(1)
///     .simulation_count(1)
///     .seed(7)
///     .build()?;
///
/// let analyzer = PortfolioAnalyzer::new(&quotes, portfolio, simulation)?;
/// let report = analyzer.run()?;
/// assert_eq!(report.assets.len(), 1);
/// assert_eq!(report.price_date, ymd(2021, 3, 5));
/// # Ok::<(), anyhow::Error>(())
/// ```
pub struct PortfolioAnalyzer<'p, P: QuoteProvider> {
    provider: &'p P,
    portfolio: PortfolioConfig,
    simulation: SimulationConfig,
}

impl<'p, P: QuoteProvider> PortfolioAnalyzer<'p, P> {
    /// Creates a session over a provider and configurations.
    ///
    /// The portfolio is validated and its weights normalised here, so every
    /// later stage can rely on a well-formed configuration.
    ///
    /// # Errors
    ///
    /// Returns [`AnalyzerError::Config`] when the portfolio is incomplete or
    /// inconsistent.
    pub fn new(
        provider: &'p P,
        portfolio: PortfolioConfig,
        simulation: SimulationConfig,
    ) -> Result<Self, AnalyzerError> {
        let portfolio = portfolio.normalized()?;
        simulation.validate()?;
        Ok(Self {
            provider,
            portfolio,
            simulation,
        })
    }

    /// Returns the normalised portfolio this session analyses.
    #[inline]
    pub fn portfolio(&self) -> &PortfolioConfig {
        &self.portfolio
    }

    /// Returns the simulation configuration.
    #[inline]
    pub fn simulation(&self) -> &SimulationConfig {
        &self.simulation
    }

    /// Stage one: fetch every required symbol, align onto the common
    /// calendar, and construct the simulator.
    ///
    /// # Errors
    ///
    /// Propagates supplier failures and alignment or construction errors.
    pub fn prepare(&self) -> Result<HistoricalSimulation, AnalyzerError> {
        let (Some(start), Some(end)) = (self.portfolio.start_date, self.portfolio.end_date)
        else {
            return Err(ConfigError::MissingFields(vec!["start_date", "end_date"]).into());
        };

        let factors = self.portfolio.all_factors();
        info!(
            factors = factors.len(),
            start = %start,
            end = %end,
            "fetching price history"
        );
        let mut series = Vec::with_capacity(factors.len());
        for symbol in &factors {
            let query = SymbolQuery::new(symbol.clone(), start, end);
            let fetched = self.provider.series(&query)?;
            debug!(symbol = symbol.as_str(), points = fetched.len(), "history fetched");
            series.push(fetched);
        }

        let aligned = align(&series)?;
        info!(series = aligned.len(), "price history aligned");
        Ok(HistoricalSimulation::new(&aligned, self.simulation.clone())?)
    }

    /// Stage two: run the scenario batch on the worker pool.
    ///
    /// # Errors
    ///
    /// Propagates batch generation and shape-validation errors.
    pub fn simulate(&self, engine: &HistoricalSimulation) -> Result<Vec<Scenario>, AnalyzerError> {
        info!(
            scenarios = self.simulation.simulation_count(),
            "running simulation batch"
        );
        Ok(engine.run()?)
    }

    /// Stage three: price the scenarios and assemble the report.
    ///
    /// As-of prices come from the provider's latest observation per symbol;
    /// the report's price date is the newest of those observation dates.
    ///
    /// # Errors
    ///
    /// Propagates supplier failures and report assembly errors.
    pub fn report(&self, scenarios: &[Scenario]) -> Result<Report, AnalyzerError> {
        let (prices, price_date) = self.current_prices()?;
        let report =
            Reporter::new(&self.portfolio, &self.simulation, scenarios, &prices, price_date)
                .build()?;
        info!(price_date = %price_date, "analysis complete");
        Ok(report)
    }

    /// Runs all three stages.
    ///
    /// # Errors
    ///
    /// Propagates the first failure of any stage.
    pub fn run(&self) -> Result<Report, AnalyzerError> {
        let engine = self.prepare()?;
        let scenarios = self.simulate(&engine)?;
        self.report(&scenarios)
    }

    /// Runs all three stages and hands the report to a consumer.
    ///
    /// The report is still returned, so delivery and further use compose.
    ///
    /// # Errors
    ///
    /// Propagates the first failure of any stage.
    pub fn run_and_deliver<C: ReportConsumer>(
        &self,
        consumer: &mut C,
    ) -> Result<Report, AnalyzerError> {
        let report = self.run()?;
        consumer.deliver(&report);
        Ok(report)
    }

    fn current_prices(&self) -> Result<(HashMap<String, f64>, NaiveDate), AnalyzerError> {
        let mut prices = HashMap::new();
        let mut price_date: Option<NaiveDate> = None;
        for symbol in self.portfolio.all_factors() {
            let latest = self.provider.latest(&symbol)?;
            debug!(
                symbol = symbol.as_str(),
                date = %latest.date,
                price = latest.value,
                "latest price"
            );
            price_date = Some(match price_date {
                Some(newest) => newest.max(latest.date),
                None => latest.date,
            });
            prices.insert(symbol, latest.value);
        }
        let price_date = price_date.ok_or(ConfigError::MissingFields(vec!["assets"]))?;
        Ok((prices, price_date))
    }
}
