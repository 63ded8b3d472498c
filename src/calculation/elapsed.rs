//! Elapsed time calculations for attendance sessions.
//!
//! The display helpers ([`work_elapsed`], [`break_elapsed`]) feed live timers
//! and carry no authority. [`finalize_hours`] is the only function whose
//! output is persisted as a session's `total_hours`.

use chrono::{DateTime, Duration, Utc};
use rust_decimal::{Decimal, RoundingStrategy};

/// Number of decimal places kept on persisted hour totals.
pub const HOURS_DECIMAL_PLACES: u32 = 4;

const SECONDS_PER_HOUR: i64 = 3600;

/// Returns how long an employee has been clocked in, for display while Active.
///
/// Clamped to zero when `now` precedes `clock_in`.
///
/// # Examples
///
/// ```
/// use employee_portal::calculation::work_elapsed;
/// use chrono::{Duration, TimeZone, Utc};
///
/// let clock_in = Utc.with_ymd_and_hms(2026, 1, 15, 9, 0, 0).unwrap();
/// let now = Utc.with_ymd_and_hms(2026, 1, 15, 10, 30, 0).unwrap();
/// assert_eq!(work_elapsed(now, clock_in), Duration::minutes(90));
/// ```
pub fn work_elapsed(now: DateTime<Utc>, clock_in: DateTime<Utc>) -> Duration {
    non_negative(now - clock_in)
}

/// Returns how long the current break has lasted, for display while on Break.
///
/// Clamped to zero when `now` precedes `break_start`.
pub fn break_elapsed(now: DateTime<Utc>, break_start: DateTime<Utc>) -> Duration {
    non_negative(now - break_start)
}

/// Computes the authoritative worked hours for a completed session.
///
/// `hours = (clock_out - clock_in - total_break_seconds) / 3600`, clamped to
/// zero and truncated to [`HOURS_DECIMAL_PLACES`] so the result never exceeds
/// the raw session length.
///
/// # Examples
///
/// ```
/// use employee_portal::calculation::finalize_hours;
/// use chrono::{TimeZone, Utc};
/// use rust_decimal::Decimal;
///
/// let clock_in = Utc.with_ymd_and_hms(2026, 1, 15, 9, 0, 0).unwrap();
/// let clock_out = Utc.with_ymd_and_hms(2026, 1, 15, 17, 30, 0).unwrap();
///
/// // 8.5 hours on site, 30 minutes of break
/// assert_eq!(finalize_hours(clock_in, clock_out, 1800), Decimal::new(8, 0));
/// ```
pub fn finalize_hours(
    clock_in: DateTime<Utc>,
    clock_out: DateTime<Utc>,
    total_break_seconds: i64,
) -> Decimal {
    let session_seconds = (clock_out - clock_in).num_seconds();
    let worked_seconds = session_seconds
        .saturating_sub(total_break_seconds.max(0))
        .max(0);

    (Decimal::from(worked_seconds) / Decimal::from(SECONDS_PER_HOUR))
        .round_dp_with_strategy(HOURS_DECIMAL_PLACES, RoundingStrategy::ToZero)
        .normalize()
}

fn non_negative(duration: Duration) -> Duration {
    if duration < Duration::zero() {
        Duration::zero()
    } else {
        duration
    }
}
