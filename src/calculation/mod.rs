//! Pure calculation logic for the employee portal core.
//!
//! This module contains the side-effect free functions the stateful services
//! build on: elapsed and worked-hour durations for attendance sessions,
//! inclusive leave day counting, and payroll net pay arithmetic.

mod elapsed;
mod leave_days;
mod net_pay;

pub use elapsed::{HOURS_DECIMAL_PLACES, break_elapsed, finalize_hours, work_elapsed};
pub use leave_days::{inclusive_day_count, leave_year};
pub use net_pay::net_pay;
