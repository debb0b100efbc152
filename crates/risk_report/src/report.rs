//! The finished report value and its consumer-facing contract.

use std::collections::HashMap;

use chrono::NaiveDate;
use risk_core::AssetCurrency;
use serde::Serialize;

/// What a P&L matrix measures.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
pub enum FactorKind {
    /// Portfolio-level P&L of one asset, currency conversion included.
    Asset,
    /// Isolated P&L of one cross-rate over its currency bucket.
    ExchangeRate,
}

/// Dollar-denominated P&L matrix for one factor,
/// shape `simulation_count x path_length`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PnlMatrix {
    /// Symbol of the asset or cross-rate this matrix belongs to.
    pub symbol: String,
    /// Whether this is portfolio-level or factor-decomposition P&L.
    pub kind: FactorKind,
    /// `values[scenario][day]`, in scenario order.
    pub values: Vec<Vec<f64>>,
}

/// Tail-loss pair for one exposure.
#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
pub struct TailRisk {
    /// Expected tail loss at the terminal day (mean of the worst decile of
    /// terminal outcomes, in dollars).
    pub etl: f64,
    /// Expected tail loss at the worst day reached within the period; never
    /// a better outcome than `etl`.
    pub max_etl: f64,
}

/// Price-versus-FX decomposition for a foreign-currency asset.
#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
pub struct FxFactor {
    /// Tail risk of the asset's own price movement, FX held still.
    pub self_risk: TailRisk,
    /// Tail risk of the cross-rate movement over the whole currency bucket;
    /// identical for every asset sharing the currency.
    pub fx_risk: TailRisk,
}

/// Per-asset line of the report.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AssetReport {
    /// Asset symbol.
    pub symbol: String,
    /// Declared currency.
    pub currency: AssetCurrency,
    /// Normalised portfolio weight.
    pub weight: f64,
    /// Dollar investment (total allocation times weight).
    pub investment: f64,
    /// Current (as-of) price used for normalisation.
    pub current_price: f64,
    /// Portfolio-level tail risk, currency conversion included.
    pub tail: TailRisk,
    /// Factor decomposition; `None` for base-currency assets.
    pub fx: Option<FxFactor>,
}

/// Complete output of one analysis run.
///
/// Built once by the reporter and read-only thereafter; consumers receive it
/// through [`ReportConsumer`].
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Report {
    /// As-of date of the current prices.
    pub price_date: NaiveDate,
    /// Current price per simulated symbol.
    pub current_prices: HashMap<String, f64>,
    /// Per-asset figures, in configuration order.
    pub assets: Vec<AssetReport>,
    /// Portfolio totals (sums over the asset lines).
    pub total: TailRisk,
    /// Dollar investment per currency bucket.
    pub exposure_by_currency: HashMap<AssetCurrency, f64>,
    /// Tagged P&L matrices for downstream visualisation.
    pub pnl: Vec<PnlMatrix>,
}

impl Report {
    /// Looks up the report line for one asset.
    pub fn asset(&self, symbol: &str) -> Option<&AssetReport> {
        self.assets.iter().find(|asset| asset.symbol == symbol)
    }

    /// Looks up a P&L matrix by symbol and kind.
    pub fn pnl_matrix(&self, symbol: &str, kind: FactorKind) -> Option<&PnlMatrix> {
        self.pnl
            .iter()
            .find(|matrix| matrix.kind == kind && matrix.symbol == symbol)
    }
}

/// Receiver of finished reports.
///
/// The analysis session makes no assumption about what a consumer does with
/// the report; rendering, persistence and transport all live behind this
/// trait.
pub trait ReportConsumer {
    /// Hands over a completed report.
    fn deliver(&mut self, report: &Report);
}

/// A consumer that drops every report, for headless runs.
#[derive(Copy, Clone, Debug, Default)]
pub struct DiscardReport;

impl ReportConsumer for DiscardReport {
    fn deliver(&mut self, _report: &Report) {}
}
