//! Price observation types.
//!
//! A [`TimeSeries`] is a named sequence of daily [`TimePoint`] observations
//! for one symbol. Upstream suppliers may deliver points in any order and
//! with uneven coverage; the cleaning stage is responsible for producing
//! series whose dates are strictly increasing and gap-free.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One observation of a symbol's price on a calendar day.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use risk_core::TimePoint;
///
/// let point = TimePoint::new(NaiveDate::from_ymd_opt(2021, 6, 1).unwrap(), 420.33);
/// assert_eq!(point.value, 420.33);
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TimePoint {
    /// Observation date.
    pub date: NaiveDate,
    /// Observed price (or rate) on that date.
    pub value: f64,
}

impl TimePoint {
    /// Creates a new observation.
    #[inline]
    pub fn new(date: NaiveDate, value: f64) -> Self {
        Self { date, value }
    }
}

/// A named, ordered sequence of price observations for one symbol.
///
/// The container itself does not enforce date ordering; call
/// [`TimeSeries::sort_by_date`] (or construct via the cleaning stage) before
/// relying on positional access.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use risk_core::TimeSeries;
///
/// let mut series = TimeSeries::from_pairs(
///     "XIU",
///     vec![
///         (NaiveDate::from_ymd_opt(2021, 3, 2).unwrap(), 26.70),
///         (NaiveDate::from_ymd_opt(2021, 3, 1).unwrap(), 26.61),
///     ],
/// );
/// series.sort_by_date();
/// assert_eq!(series.first().unwrap().value, 26.61);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TimeSeries {
    name: String,
    points: Vec<TimePoint>,
}

impl TimeSeries {
    /// Creates a series from pre-built observation points.
    pub fn new(name: impl Into<String>, points: Vec<TimePoint>) -> Self {
        Self {
            name: name.into(),
            points,
        }
    }

    /// Creates a series from `(date, value)` pairs.
    pub fn from_pairs(name: impl Into<String>, pairs: Vec<(NaiveDate, f64)>) -> Self {
        Self::new(
            name,
            pairs
                .into_iter()
                .map(|(date, value)| TimePoint::new(date, value))
                .collect(),
        )
    }

    /// Returns the symbol name this series belongs to.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the observations in their current order.
    #[inline]
    pub fn points(&self) -> &[TimePoint] {
        &self.points
    }

    /// Consumes the series, returning its observations.
    #[inline]
    pub fn into_points(self) -> Vec<TimePoint> {
        self.points
    }

    /// Returns the number of observations.
    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Returns `true` when the series holds no observations.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Returns the earliest-positioned observation, if any.
    #[inline]
    pub fn first(&self) -> Option<&TimePoint> {
        self.points.first()
    }

    /// Returns the latest-positioned observation, if any.
    #[inline]
    pub fn last(&self) -> Option<&TimePoint> {
        self.points.last()
    }

    /// Sorts observations ascending by date (stable).
    pub fn sort_by_date(&mut self) {
        self.points.sort_by_key(|point| point.date);
    }

    /// Iterates over the observation dates in their current order.
    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.points.iter().map(|point| point.date)
    }

    /// Iterates over the observation values in their current order.
    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.iter().map(|point| point.value)
    }
}
