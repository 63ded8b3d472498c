//! Attendance statistics.
//!
//! Summaries are recomputed from the time entry rows on every call; nothing
//! here keeps a running counter, so deleting an entry needs no bookkeeping.

use std::collections::HashSet;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{TimeEntry, TimeEntryStatus};

/// Attendance statistics for one employee over a date range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceSummary {
    /// The employee summarized.
    pub employee_id: String,
    /// Start of the range, if bounded.
    pub from: Option<NaiveDate>,
    /// End of the range, if bounded.
    pub to: Option<NaiveDate>,
    /// Number of completed sessions.
    pub completed_sessions: usize,
    /// Number of distinct days with at least one completed session.
    pub days_worked: usize,
    /// Sum of worked hours across completed sessions.
    pub total_hours: Decimal,
    /// Sum of break time across completed sessions, in hours.
    pub total_break_hours: Decimal,
    /// `total_hours / days_worked`, rounded to two places.
    pub average_daily_hours: Decimal,
    /// Whether a session is open right now.
    pub has_open_session: bool,
}

impl AttendanceSummary {
    /// Summarizes `entries`, which must already be filtered to the employee
    /// and range.
    pub fn from_entries(
        employee_id: impl Into<String>,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
        entries: &[TimeEntry],
    ) -> Self {
        let completed: Vec<&TimeEntry> = entries
            .iter()
            .filter(|e| e.status == TimeEntryStatus::Completed)
            .collect();

        let total_hours: Decimal = completed.iter().filter_map(|e| e.total_hours).sum();
        let break_seconds: i64 = completed.iter().map(|e| e.break_seconds).sum();
        let days_worked = completed.iter().map(|e| e.date).collect::<HashSet<_>>().len();

        let average_daily_hours = if days_worked == 0 {
            Decimal::ZERO
        } else {
            (total_hours / Decimal::from(days_worked)).round_dp(2)
        };

        Self {
            employee_id: employee_id.into(),
            from,
            to,
            completed_sessions: completed.len(),
            days_worked,
            total_hours,
            total_break_hours: (Decimal::from(break_seconds) / Decimal::from(3600)).round_dp(2),
            average_daily_hours,
            has_open_session: entries.iter().any(TimeEntry::is_open),
        }
    }
}
