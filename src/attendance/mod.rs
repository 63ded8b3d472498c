//! Attendance tracking: the clock-in / break / clock-out state machine.
//!
//! Each employee has at most one open time entry. Actions are validated
//! against an explicit transition table, applied to a copy of the entry and
//! committed to the store in a single step.

mod service;
mod state_machine;
mod store;
mod summary;

pub use service::{AttendanceService, CurrentSession};
pub use state_machine::{AttendanceAction, apply_action, next_status};
pub use store::{TimeEntryFilter, TimeEntryStore};
pub use summary::AttendanceSummary;
