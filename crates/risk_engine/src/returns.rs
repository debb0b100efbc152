//! Conversion of aligned price series into daily return ratios.

use risk_core::{TimePoint, TimeSeries};

/// Converts a price series into daily return ratios.
///
/// Each consecutive pair of observations `(p[i-1], p[i])` yields the ratio
/// `p[i] / p[i-1]`, stamped with the *later* date: the return dated `d` is
/// the move realised by holding from the previous observation into `d`. The
/// output therefore has one point fewer than the input; series with fewer
/// than two observations produce an empty result.
///
/// Observations are sorted by date before differencing, so the function is
/// insensitive to input order.
pub fn compute_returns(series: &TimeSeries) -> TimeSeries {
    let mut points = series.points().to_vec();
    points.sort_by_key(|point| point.date);
    let ratios = points
        .windows(2)
        .map(|pair| TimePoint::new(pair[1].date, pair[1].value / pair[0].value))
        .collect();
    TimeSeries::new(series.name(), ratios)
}
