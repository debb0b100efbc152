//! Trading-day calendar helpers.
//!
//! The analytics operate on a plain Monday–Friday trading calendar with no
//! holiday schedule; exchange holidays show up as gaps in the input data and
//! are handled by the gap-filling stage instead.

use chrono::{Datelike, Duration, NaiveDate, Weekday};

/// Returns `true` for Monday through Friday.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use risk_core::calendar::is_business_day;
///
/// // 2021-03-05 is a Friday, 2021-03-06 a Saturday
/// assert!(is_business_day(NaiveDate::from_ymd_opt(2021, 3, 5).unwrap()));
/// assert!(!is_business_day(NaiveDate::from_ymd_opt(2021, 3, 6).unwrap()));
/// ```
#[inline]
pub fn is_business_day(date: NaiveDate) -> bool {
    !matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Returns every business day in `[start, end]`, ascending.
///
/// Both endpoints are included when they fall on business days. An inverted
/// range yields an empty sequence.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use risk_core::calendar::business_days;
///
/// // Thursday 2021-03-04 through Monday 2021-03-08: Thu, Fri, Mon
/// let days = business_days(
///     NaiveDate::from_ymd_opt(2021, 3, 4).unwrap(),
///     NaiveDate::from_ymd_opt(2021, 3, 8).unwrap(),
/// );
/// assert_eq!(days.len(), 3);
/// ```
pub fn business_days(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    if start > end {
        return Vec::new();
    }
    let span = (end - start).num_days();
    (0..=span)
        .map(|offset| start + Duration::days(offset))
        .filter(|day| is_business_day(*day))
        .collect()
}
