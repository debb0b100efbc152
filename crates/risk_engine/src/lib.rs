//! Historical-return simulation engine.
//!
//! This crate is the computational core of the workspace. It takes raw daily
//! price histories and turns them into bundles of correlated price-relative
//! scenarios in three stages:
//!
//! 1. **Alignment** ([`align`]): project every series onto a shared weekday
//!    calendar, filling gaps from the nearest available observation.
//! 2. **Return transform** ([`returns`]): convert aligned prices into daily
//!    return ratios stamped with the later date of each pair.
//! 3. **Simulation** ([`simulate`]): resample historical windows of returns
//!    into synthetic forward paths. Window start dates are drawn once per
//!    scenario and shared across every symbol, which preserves the historical
//!    cross-asset correlation structure inside each window.
//!
//! Scenario generation is deterministic for a fixed seed regardless of worker
//! count: the master seed only ever feeds a per-scenario seed sequence, and
//! each scenario owns a private generator.

#![warn(missing_docs)]

pub mod align;
pub mod error;
pub mod returns;
pub mod simulate;

pub use align::{align, common_calendar, fill_to_calendar};
pub use error::EngineError;
pub use returns::compute_returns;
pub use simulate::{
    HistoricalSimulation, Scenario, ScenarioRng, SimulationConfig, SimulationConfigBuilder,
};
