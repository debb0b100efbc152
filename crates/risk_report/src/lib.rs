//! Tail-risk reporting over simulated scenario batches.
//!
//! This crate sits between the simulation engine and any consumer of risk
//! figures. It owns the money arithmetic: pricing dimensionless return paths
//! into the portfolio base currency, decomposing foreign-asset risk into a
//! "self" (price) and an "FX" (exchange-rate) factor without double
//! counting, and condensing the scenario distribution into expected-tail-loss
//! statistics (`ETL` at the terminal day, `MaxETL` at the worst day reached).
//!
//! The entry point is [`Reporter`]; its product is the serialisable
//! [`Report`], handed to collaborators through [`ReportConsumer`].

pub mod error;
pub mod report;
pub mod reporter;
pub mod stats;

pub use error::ReportError;
pub use report::{
    AssetReport, DiscardReport, FactorKind, FxFactor, PnlMatrix, Report, ReportConsumer, TailRisk,
};
pub use reporter::Reporter;
