//! Criterion benchmarks for the simulation engine.
//!
//! Benchmarks cover:
//! - Calendar alignment of gappy multi-symbol histories
//! - Return-ratio computation
//! - Single-scenario stitching
//! - Full parallel batch generation at production scale

use chrono::NaiveDate;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use risk_core::calendar::business_days;
use risk_core::TimeSeries;
use risk_engine::{align, compute_returns, HistoricalSimulation, ScenarioRng, SimulationConfig};

/// Generate a synthetic daily price history over `n_days` business days.
///
/// Prices wobble deterministically around 100 so runs are comparable.
fn synthetic_series(symbol: &str, n_days: usize, drop_every: usize) -> TimeSeries {
    let start = NaiveDate::from_ymd_opt(2015, 1, 5).unwrap();
    let end = start + chrono::Duration::days(n_days as i64 * 2);
    let days = business_days(start, end);
    TimeSeries::from_pairs(
        symbol,
        days.into_iter()
            .take(n_days)
            .enumerate()
            .filter(|(i, _)| drop_every == 0 || (i + 1) % drop_every != 0)
            .map(|(i, date)| {
                let wobble = ((i * 17 + symbol.len() * 13) % 100) as f64 - 50.0;
                (date, 100.0 + wobble * 0.1)
            })
            .collect(),
    )
}

fn synthetic_universe(n_symbols: usize, n_days: usize) -> Vec<TimeSeries> {
    (0..n_symbols)
        .map(|i| {
            // Stagger the gap cadence so the series disagree on coverage.
            synthetic_series(&format!("SYM{i:02}"), n_days, 7 + i)
        })
        .collect()
}

fn bench_alignment(c: &mut Criterion) {
    let mut group = c.benchmark_group("alignment");

    for (n_symbols, n_days) in [(2, 260), (5, 1300), (20, 1300)] {
        let universe = synthetic_universe(n_symbols, n_days);
        let label = format!("{n_symbols}symbols_{n_days}days");
        group.bench_with_input(BenchmarkId::new("align", &label), &universe, |b, universe| {
            b.iter(|| align(black_box(universe)));
        });
    }

    group.finish();
}

fn bench_returns(c: &mut Criterion) {
    let mut group = c.benchmark_group("returns");

    for n_days in [260, 1300, 5200] {
        let series = synthetic_series("SPY", n_days, 0);
        group.bench_with_input(BenchmarkId::new("compute", n_days), &series, |b, series| {
            b.iter(|| compute_returns(black_box(series)));
        });
    }

    group.finish();
}

fn bench_single_scenario(c: &mut Criterion) {
    let mut group = c.benchmark_group("single_scenario");

    let universe = align(&synthetic_universe(3, 1300)).unwrap();
    for window_count in [1, 4, 8] {
        let config = SimulationConfig::builder()
            .window_count(window_count)
            .simulation_count(1)
            .seed(42)
            .build()
            .unwrap();
        let engine = HistoricalSimulation::new(&universe, config).unwrap();
        group.bench_with_input(
            BenchmarkId::new("windows", window_count),
            &engine,
            |b, engine| {
                let mut rng = ScenarioRng::from_seed(42);
                b.iter(|| engine.simulate_once(black_box(&mut rng)));
            },
        );
    }

    group.finish();
}

fn bench_batch(c: &mut Criterion) {
    let mut group = c.benchmark_group("batch");
    group.sample_size(10); // Full batches are expensive

    let universe = align(&synthetic_universe(3, 1300)).unwrap();
    for simulation_count in [500, 5_000] {
        let config = SimulationConfig::builder()
            .simulation_count(simulation_count)
            .seed(42)
            .build()
            .unwrap();
        let engine = HistoricalSimulation::new(&universe, config).unwrap();
        group.bench_with_input(
            BenchmarkId::new("scenarios", simulation_count),
            &engine,
            |b, engine| {
                b.iter(|| engine.run());
            },
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_alignment,
    bench_returns,
    bench_single_scenario,
    bench_batch,
);
criterion_main!(benches);
