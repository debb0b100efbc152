//! Tail-statistic primitives over simulated paths.

/// Number of worst outcomes averaged into a tail statistic: the worst decile
/// of the scenario count, but never fewer than one so tiny batches still
/// produce defined figures.
pub fn etl_take(simulation_count: usize) -> usize {
    (simulation_count / 10).max(1)
}

/// Mean of the `take` smallest values.
///
/// `take` is clamped to the number of values available; an empty input
/// yields 0.
pub fn tail_mean(values: &[f64], take: usize) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_unstable_by(f64::total_cmp);
    let take = take.clamp(1, sorted.len());
    sorted[..take].iter().sum::<f64>() / take as f64
}

/// Terminal value of each path.
pub fn terminal_values(paths: &[Vec<f64>]) -> Vec<f64> {
    paths
        .iter()
        .map(|path| path.last().copied().unwrap_or(0.0))
        .collect()
}

/// Worst value reached within each path.
pub fn path_minima(paths: &[Vec<f64>]) -> Vec<f64> {
    paths
        .iter()
        .map(|path| path.iter().copied().fold(f64::INFINITY, f64::min))
        .collect()
}
