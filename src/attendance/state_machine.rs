//! Time entry lifecycle transitions.
//!
//! The legal transitions are listed once, in [`next_status`]. Everything else
//! in this module computes the effect of a legal transition on a copy of the
//! entry, so a rejected action never leaves a half-updated record behind.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::calculation::finalize_hours;
use crate::error::{EngineError, EngineResult};
use crate::models::{BreakPeriod, TimeEntry, TimeEntryStatus};

/// An attendance action an employee can take.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttendanceAction {
    /// Open a new session.
    ClockIn,
    /// Pause work.
    StartBreak,
    /// Resume work.
    EndBreak,
    /// Close the session.
    ClockOut,
}

impl AttendanceAction {
    /// Returns a human-readable name for messages and logs.
    pub fn as_str(self) -> &'static str {
        match self {
            AttendanceAction::ClockIn => "clock in",
            AttendanceAction::StartBreak => "start break",
            AttendanceAction::EndBreak => "end break",
            AttendanceAction::ClockOut => "clock out",
        }
    }
}

/// The transition table.
///
/// `current` is `None` when the employee has no open entry. Returns the
/// status after `action`, or `None` if the action is illegal from `current`.
///
/// | From        | Action      | To        |
/// |-------------|-------------|-----------|
/// | no entry    | clock in    | Active    |
/// | Active      | start break | Break     |
/// | Break       | end break   | Active    |
/// | Active      | clock out   | Completed |
/// | Break       | clock out   | Completed |
///
/// # Examples
///
/// ```
/// use employee_portal::attendance::{AttendanceAction, next_status};
/// use employee_portal::models::TimeEntryStatus;
///
/// assert_eq!(
///     next_status(None, AttendanceAction::ClockIn),
///     Some(TimeEntryStatus::Active)
/// );
/// assert_eq!(
///     next_status(Some(TimeEntryStatus::Active), AttendanceAction::ClockIn),
///     None
/// );
/// ```
pub fn next_status(
    current: Option<TimeEntryStatus>,
    action: AttendanceAction,
) -> Option<TimeEntryStatus> {
    use AttendanceAction::*;
    use TimeEntryStatus::*;

    match (current, action) {
        (None, ClockIn) => Some(Active),
        (Some(Active), StartBreak) => Some(Break),
        (Some(Break), EndBreak) => Some(Active),
        (Some(Active), ClockOut) | (Some(Break), ClockOut) => Some(Completed),
        _ => None,
    }
}

/// Applies `action` to an existing entry at time `now`.
///
/// Returns the updated entry without modifying `entry`. An action whose
/// `now` precedes the entry's clock-in or the open break's start is treated
/// as happening at that instant so recorded durations stay non-negative.
/// A new break never starts before the previous one ended.
pub fn apply_action(
    entry: &TimeEntry,
    action: AttendanceAction,
    now: DateTime<Utc>,
) -> EngineResult<TimeEntry> {
    let Some(status) = next_status(Some(entry.status), action) else {
        return Err(illegal_transition(entry, action));
    };

    let now = now.max(entry.clock_in);
    let mut updated = entry.clone();

    match action {
        AttendanceAction::ClockIn => return Err(illegal_transition(entry, action)),
        AttendanceAction::StartBreak => {
            let last_break_end = entry.breaks.last().map(|period| period.end);
            updated.break_start = Some(last_break_end.map_or(now, |end| now.max(end)));
        }
        AttendanceAction::EndBreak => {
            close_open_break(&mut updated, now);
        }
        AttendanceAction::ClockOut => {
            close_open_break(&mut updated, now);
            updated.clock_out = Some(now);
            updated.total_hours = Some(finalize_hours(
                updated.clock_in,
                now,
                updated.break_seconds,
            ));
        }
    }

    updated.status = status;
    Ok(updated)
}

fn close_open_break(entry: &mut TimeEntry, now: DateTime<Utc>) {
    if let Some(start) = entry.break_start.take() {
        let period = BreakPeriod { start, end: now.max(start) };
        entry.break_seconds += period.seconds();
        entry.breaks.push(period);
    }
}

fn illegal_transition(entry: &TimeEntry, action: AttendanceAction) -> EngineError {
    if action == AttendanceAction::ClockIn {
        return EngineError::conflict(format!(
            "employee '{}' is already clocked in",
            entry.employee_id
        ));
    }
    EngineError::conflict(format!(
        "cannot {} while time entry {} is {}",
        action.as_str(),
        entry.id,
        entry.status.as_str()
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal::Decimal;

    fn at(hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 15, hour, minute, 0).unwrap()
    }

    fn active_entry() -> TimeEntry {
        TimeEntry::open("emp_001", at(9, 0), None, None)
    }

    #[test]
    fn test_table_allows_listed_transitions() {
        use AttendanceAction::*;
        use TimeEntryStatus::*;

        assert_eq!(next_status(None, ClockIn), Some(Active));
        assert_eq!(next_status(Some(Active), StartBreak), Some(Break));
        assert_eq!(next_status(Some(Break), EndBreak), Some(Active));
        assert_eq!(next_status(Some(Active), ClockOut), Some(Completed));
        assert_eq!(next_status(Some(Break), ClockOut), Some(Completed));
    }

    #[test]
    fn test_table_rejects_everything_else() {
        use AttendanceAction::*;
        use TimeEntryStatus::*;

        for action in [StartBreak, EndBreak, ClockOut] {
            assert_eq!(next_status(None, action), None);
        }
        for status in [Active, Break, Completed] {
            assert_eq!(next_status(Some(status), ClockIn), None);
        }
        assert_eq!(next_status(Some(Active), EndBreak), None);
        assert_eq!(next_status(Some(Break), StartBreak), None);
        for action in [StartBreak, EndBreak, ClockOut] {
            assert_eq!(next_status(Some(Completed), action), None);
        }
    }

    #[test]
    fn test_start_break_records_start() {
        let entry = apply_action(&active_entry(), AttendanceAction::StartBreak, at(12, 0)).unwrap();
        assert_eq!(entry.status, TimeEntryStatus::Break);
        assert_eq!(entry.break_start, Some(at(12, 0)));
    }

    #[test]
    fn test_end_break_accumulates_duration() {
        let entry = apply_action(&active_entry(), AttendanceAction::StartBreak, at(12, 0)).unwrap();
        let entry = apply_action(&entry, AttendanceAction::EndBreak, at(12, 30)).unwrap();

        assert_eq!(entry.status, TimeEntryStatus::Active);
        assert_eq!(entry.break_start, None);
        assert_eq!(entry.break_seconds, 1800);
        assert_eq!(entry.breaks.len(), 1);
    }

    #[test]
    fn test_repeated_breaks_accumulate() {
        let mut entry = active_entry();
        for (start, end) in [((10, 0), (10, 15)), ((12, 0), (12, 30)), ((15, 0), (15, 15))] {
            entry = apply_action(&entry, AttendanceAction::StartBreak, at(start.0, start.1)).unwrap();
            entry = apply_action(&entry, AttendanceAction::EndBreak, at(end.0, end.1)).unwrap();
        }

        assert_eq!(entry.break_seconds, 3600);
        assert_eq!(entry.breaks.len(), 3);
    }

    #[test]
    fn test_full_day_round_trip() {
        let entry = apply_action(&active_entry(), AttendanceAction::StartBreak, at(12, 0)).unwrap();
        let entry = apply_action(&entry, AttendanceAction::EndBreak, at(12, 30)).unwrap();
        let entry = apply_action(&entry, AttendanceAction::ClockOut, at(17, 30)).unwrap();

        assert_eq!(entry.status, TimeEntryStatus::Completed);
        assert_eq!(entry.clock_out, Some(at(17, 30)));
        assert_eq!(entry.total_hours, Some(Decimal::new(8, 0)));
    }

    #[test]
    fn test_clock_out_during_break_closes_it_first() {
        let entry = apply_action(&active_entry(), AttendanceAction::StartBreak, at(16, 0)).unwrap();
        let entry = apply_action(&entry, AttendanceAction::ClockOut, at(17, 0)).unwrap();

        assert_eq!(entry.status, TimeEntryStatus::Completed);
        assert_eq!(entry.break_start, None);
        assert_eq!(entry.break_seconds, 3600);
        assert_eq!(entry.total_hours, Some(Decimal::new(7, 0)));
    }

    #[test]
    fn test_double_start_break_is_conflict() {
        let entry = apply_action(&active_entry(), AttendanceAction::StartBreak, at(12, 0)).unwrap();
        let err = apply_action(&entry, AttendanceAction::StartBreak, at(12, 5)).unwrap_err();
        assert!(matches!(err, EngineError::Conflict { .. }));
    }

    #[test]
    fn test_end_break_while_active_is_conflict() {
        let err = apply_action(&active_entry(), AttendanceAction::EndBreak, at(12, 0)).unwrap_err();
        assert!(matches!(err, EngineError::Conflict { .. }));
    }

    #[test]
    fn test_clock_in_on_existing_entry_is_conflict() {
        let err = apply_action(&active_entry(), AttendanceAction::ClockIn, at(10, 0)).unwrap_err();
        match err {
            EngineError::Conflict { message } => assert!(message.contains("already clocked in")),
            other => panic!("Expected Conflict, got {:?}", other),
        }
    }

    #[test]
    fn test_completed_entry_is_immutable() {
        let entry = apply_action(&active_entry(), AttendanceAction::ClockOut, at(17, 0)).unwrap();
        for action in [AttendanceAction::StartBreak, AttendanceAction::EndBreak, AttendanceAction::ClockOut] {
            assert!(apply_action(&entry, action, at(18, 0)).is_err());
        }
    }

    #[test]
    fn test_rejected_action_leaves_entry_untouched() {
        let entry = active_entry();
        let before = entry.clone();
        let _ = apply_action(&entry, AttendanceAction::EndBreak, at(12, 0));
        assert_eq!(entry, before);
    }

    #[test]
    fn test_skewed_clock_out_is_pinned_to_clock_in() {
        let entry = apply_action(&active_entry(), AttendanceAction::ClockOut, at(8, 0)).unwrap();
        assert_eq!(entry.clock_out, Some(at(9, 0)));
        assert_eq!(entry.total_hours, Some(Decimal::ZERO));
    }

    #[test]
    fn test_skewed_break_end_is_pinned_to_break_start() {
        let entry = apply_action(&active_entry(), AttendanceAction::StartBreak, at(12, 0)).unwrap();
        let entry = apply_action(&entry, AttendanceAction::EndBreak, at(11, 0)).unwrap();
        assert_eq!(entry.break_seconds, 0);
        assert_eq!(entry.breaks[0].end, at(12, 0));
    }

    #[test]
    fn test_skewed_break_start_is_pinned_to_previous_break_end() {
        let entry = apply_action(&active_entry(), AttendanceAction::StartBreak, at(12, 0)).unwrap();
        let entry = apply_action(&entry, AttendanceAction::EndBreak, at(12, 30)).unwrap();
        let entry = apply_action(&entry, AttendanceAction::StartBreak, at(12, 10)).unwrap();
        assert_eq!(entry.break_start, Some(at(12, 30)));

        let entry = apply_action(&entry, AttendanceAction::EndBreak, at(12, 45)).unwrap();
        assert!(entry.breaks[1].start >= entry.breaks[0].end);
        assert_eq!(entry.break_seconds, 1800 + 900);
    }

    #[test]
    fn test_break_seconds_match_recorded_periods() {
        let mut entry = active_entry();
        for (start, end) in [((10, 0), (10, 20)), ((13, 0), (13, 45))] {
            entry = apply_action(&entry, AttendanceAction::StartBreak, at(start.0, start.1)).unwrap();
            entry = apply_action(&entry, AttendanceAction::EndBreak, at(end.0, end.1)).unwrap();
        }

        let recorded: i64 = entry.breaks.iter().map(BreakPeriod::seconds).sum();
        assert_eq!(entry.break_seconds, recorded);
        assert_eq!(recorded, 65 * 60);
    }
}
