//! Time entry model and related types.
//!
//! This module defines the [`TimeEntry`] record for one employee's attendance
//! session and the [`BreakPeriod`] history entries recorded against it.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle status of a time entry.
///
/// An employee with no entry in `Active` or `Break` has no open session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeEntryStatus {
    /// Clocked in and working.
    Active,
    /// Clocked in and on a break.
    Break,
    /// Clocked out; `total_hours` is final.
    Completed,
}

impl TimeEntryStatus {
    /// Whether an entry in this status counts as the employee's open session.
    pub fn is_open(self) -> bool {
        matches!(self, TimeEntryStatus::Active | TimeEntryStatus::Break)
    }

    /// Returns the wire name of the status.
    pub fn as_str(self) -> &'static str {
        match self {
            TimeEntryStatus::Active => "active",
            TimeEntryStatus::Break => "break",
            TimeEntryStatus::Completed => "completed",
        }
    }
}

/// A closed break taken during a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreakPeriod {
    /// When the break started.
    pub start: DateTime<Utc>,
    /// When the break ended.
    pub end: DateTime<Utc>,
}

impl BreakPeriod {
    /// Length of the break in whole seconds.
    pub fn seconds(&self) -> i64 {
        (self.end - self.start).num_seconds().max(0)
    }
}

/// One employee's attendance record for a single clock-in session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeEntry {
    /// Unique identifier for the entry.
    pub id: Uuid,
    /// The employee the session belongs to.
    pub employee_id: String,
    /// The UTC calendar date of the clock-in.
    pub date: NaiveDate,
    /// When the session started.
    pub clock_in: DateTime<Utc>,
    /// When the session ended, once completed.
    pub clock_out: Option<DateTime<Utc>>,
    /// Start of the currently open break, if any.
    pub break_start: Option<DateTime<Utc>>,
    /// Breaks already closed during this session.
    #[serde(default)]
    pub breaks: Vec<BreakPeriod>,
    /// Accumulated seconds of closed breaks.
    pub break_seconds: i64,
    /// Current lifecycle status.
    pub status: TimeEntryStatus,
    /// Authoritative worked hours, set only when completed.
    pub total_hours: Option<Decimal>,
    /// Where the employee clocked in from.
    #[serde(default)]
    pub location: Option<String>,
    /// Free-form notes supplied at clock-in.
    #[serde(default)]
    pub notes: Option<String>,
}

impl TimeEntry {
    /// Opens a new active session for an employee.
    pub fn open(
        employee_id: impl Into<String>,
        clock_in: DateTime<Utc>,
        location: Option<String>,
        notes: Option<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            employee_id: employee_id.into(),
            date: clock_in.date_naive(),
            clock_in,
            clock_out: None,
            break_start: None,
            breaks: Vec::new(),
            break_seconds: 0,
            status: TimeEntryStatus::Active,
            total_hours: None,
            location,
            notes,
        }
    }

    /// Whether this entry is the employee's open session.
    pub fn is_open(&self) -> bool {
        self.status.is_open()
    }
}
