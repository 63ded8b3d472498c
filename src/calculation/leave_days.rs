//! Leave day counting.

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;

use crate::error::{EngineError, EngineResult};

/// Counts the days between `start` and `end`, both inclusive.
///
/// Returns a validation error when `end` precedes `start`.
///
/// # Examples
///
/// ```
/// use employee_portal::calculation::inclusive_day_count;
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let start = NaiveDate::from_ymd_opt(2026, 3, 2).unwrap();
/// let end = NaiveDate::from_ymd_opt(2026, 3, 6).unwrap();
/// assert_eq!(inclusive_day_count(start, end).unwrap(), Decimal::new(5, 0));
/// ```
pub fn inclusive_day_count(start: NaiveDate, end: NaiveDate) -> EngineResult<Decimal> {
    if end < start {
        return Err(EngineError::validation(
            "end_date",
            format!("end date {} is before start date {}", end, start),
        ));
    }
    Ok(Decimal::from((end - start).num_days() + 1))
}

/// The leave year a request is charged to: the year of its first day.
pub fn leave_year(start: NaiveDate) -> i32 {
    start.year()
}
