//! Core data models for the employee portal.
//!
//! This module contains the domain records persisted by the attendance,
//! leave and payroll services.

mod leave;
mod payroll;
mod time_entry;

pub use leave::{BalanceKey, LeaveBalance, LeaveDecision, LeaveRequest, LeaveStatus, LeaveType};
pub use payroll::{PayrollRecord, PayrollStatus};
pub use time_entry::{BreakPeriod, TimeEntry, TimeEntryStatus};
