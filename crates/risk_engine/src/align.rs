//! Calendar alignment of raw price series.
//!
//! Suppliers deliver histories with different holidays, listing dates and the
//! occasional missing day. Before returns can be compared across symbols,
//! every series must sit on one shared weekday calendar. The calendar spans
//! the intersection of observation dates (so no series is extrapolated beyond
//! its own history) and gaps inside it are filled from the nearest available
//! observation, preferring the most recent past value.

use std::collections::{BTreeSet, HashMap};

use chrono::NaiveDate;
use risk_core::calendar::business_days;
use risk_core::{TimePoint, TimeSeries};
use tracing::{debug, warn};

use crate::error::EngineError;

/// Builds the shared weekday calendar for a set of series.
///
/// The calendar runs from the earliest to the latest date observed by *every*
/// series (the intersection of their observation dates), restricted to
/// weekdays. Weekend observations may anchor the span but never appear in the
/// calendar itself.
///
/// # Errors
///
/// Returns [`EngineError::EmptyUniverse`] when `series` is empty, and
/// [`EngineError::NoCommonDates`] when the intersection is empty or spans no
/// weekday.
pub fn common_calendar(series: &[TimeSeries]) -> Result<Vec<NaiveDate>, EngineError> {
    let mut iter = series.iter();
    let first = iter.next().ok_or(EngineError::EmptyUniverse)?;

    let mut shared: BTreeSet<NaiveDate> = first.dates().collect();
    for other in iter {
        let dates: BTreeSet<NaiveDate> = other.dates().collect();
        shared = shared.intersection(&dates).copied().collect();
        if shared.is_empty() {
            break;
        }
    }

    let (Some(&start), Some(&end)) = (shared.iter().next(), shared.iter().next_back()) else {
        return Err(EngineError::NoCommonDates);
    };

    let calendar = business_days(start, end);
    if calendar.is_empty() {
        return Err(EngineError::NoCommonDates);
    }
    debug!(
        start = %start,
        end = %end,
        days = calendar.len(),
        "common calendar resolved"
    );
    Ok(calendar)
}

/// Projects one series onto a calendar, filling gaps from its own history.
///
/// For each calendar day without an observation the most recent earlier
/// observation is substituted; a series that only starts trading mid-calendar
/// is instead seeded from its earliest later observation. The output carries
/// exactly one point per calendar day, in calendar order.
///
/// Duplicate observations for one date are tolerated: the entry appearing
/// last in the input wins and a warning is emitted.
///
/// # Errors
///
/// Returns [`EngineError::UnfillableGap`] when the series has no observation
/// at all to fill a calendar day from (only possible for an empty series).
pub fn fill_to_calendar(
    series: &TimeSeries,
    calendar: &[NaiveDate],
) -> Result<TimeSeries, EngineError> {
    let mut by_date: HashMap<NaiveDate, f64> = HashMap::with_capacity(series.len());
    for point in series.points() {
        if by_date.insert(point.date, point.value).is_some() {
            warn!(
                symbol = series.name(),
                date = %point.date,
                "duplicate observation, keeping the later entry"
            );
        }
    }

    let mut observations: Vec<TimePoint> = by_date
        .iter()
        .map(|(&date, &value)| TimePoint::new(date, value))
        .collect();
    observations.sort_by_key(|point| point.date);

    let mut filled = Vec::with_capacity(calendar.len());
    for &day in calendar {
        if let Some(&value) = by_date.get(&day) {
            filled.push(TimePoint::new(day, value));
            continue;
        }
        let substitute = nearest_observation(&observations, day)
            .ok_or_else(|| EngineError::unfillable_gap(series.name(), day))?;
        debug!(
            symbol = series.name(),
            missing = %day,
            substitute = %substitute.date,
            value = substitute.value,
            "gap filled from nearest observation"
        );
        filled.push(TimePoint::new(day, substitute.value));
    }
    Ok(TimeSeries::new(series.name(), filled))
}

/// Aligns a whole universe of series onto their common weekday calendar.
///
/// Output series appear in input order, all carrying identical date axes.
///
/// # Errors
///
/// Propagates the calendar and gap-filling errors of [`common_calendar`] and
/// [`fill_to_calendar`].
pub fn align(series: &[TimeSeries]) -> Result<Vec<TimeSeries>, EngineError> {
    let calendar = common_calendar(series)?;
    series
        .iter()
        .map(|s| fill_to_calendar(s, &calendar))
        .collect()
}

/// Picks the fill candidate for `day` from date-sorted observations: the
/// latest observation at or before `day`, else the earliest one after it.
fn nearest_observation(sorted: &[TimePoint], day: NaiveDate) -> Option<TimePoint> {
    let upper = sorted.partition_point(|point| point.date <= day);
    if upper > 0 {
        return Some(sorted[upper - 1]);
    }
    sorted.first().copied()
}
