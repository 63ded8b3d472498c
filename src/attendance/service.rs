//! Attendance operations.
//!
//! [`AttendanceService`] drives the time entry state machine against the
//! store and announces every committed change on the event bus.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::calculation::{break_elapsed, work_elapsed};
use crate::error::{EngineError, EngineResult};
use crate::events::{EventBus, PortalEvent};
use crate::models::{TimeEntry, TimeEntryStatus};

use super::state_machine::{AttendanceAction, apply_action};
use super::store::{TimeEntryFilter, TimeEntryStore};
use super::summary::AttendanceSummary;

/// An open session with live timers for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentSession {
    /// The open entry.
    pub entry: TimeEntry,
    /// Seconds since clock-in.
    pub work_elapsed_seconds: i64,
    /// Seconds since the current break started, while on break.
    pub break_elapsed_seconds: Option<i64>,
}

/// Clock-in, break and clock-out handling for all employees.
#[derive(Debug)]
pub struct AttendanceService {
    store: TimeEntryStore,
    events: EventBus,
}

impl AttendanceService {
    /// Creates a service with an empty store.
    pub fn new(events: EventBus) -> Self {
        Self {
            store: TimeEntryStore::new(),
            events,
        }
    }

    /// Opens a new session for `employee_id` at `now`.
    ///
    /// Fails with a conflict if the employee is already clocked in.
    pub fn clock_in(
        &self,
        employee_id: &str,
        location: Option<String>,
        notes: Option<String>,
        now: DateTime<Utc>,
    ) -> EngineResult<TimeEntry> {
        require_employee(employee_id)?;

        let entry = TimeEntry::open(employee_id, now, location, notes);
        let entry = self.store.insert_open(entry).inspect_err(|err| {
            warn!(employee_id = %employee_id, error = %err, "Clock in rejected");
        })?;

        info!(employee_id = %employee_id, entry_id = %entry.id, "Clocked in");
        self.announce(&entry);
        Ok(entry)
    }

    /// Starts a break on the employee's open session.
    pub fn start_break(&self, employee_id: &str, now: DateTime<Utc>) -> EngineResult<TimeEntry> {
        self.transition(employee_id, AttendanceAction::StartBreak, now)
    }

    /// Ends the break on the employee's open session.
    pub fn end_break(&self, employee_id: &str, now: DateTime<Utc>) -> EngineResult<TimeEntry> {
        self.transition(employee_id, AttendanceAction::EndBreak, now)
    }

    /// Closes the employee's open session, finalizing its worked hours.
    pub fn clock_out(&self, employee_id: &str, now: DateTime<Utc>) -> EngineResult<TimeEntry> {
        let entry = self.transition(employee_id, AttendanceAction::ClockOut, now)?;
        if let Some(hours) = entry.total_hours {
            info!(
                employee_id = %employee_id,
                entry_id = %entry.id,
                total_hours = %hours,
                break_seconds = entry.break_seconds,
                "Session finalized"
            );
        }
        Ok(entry)
    }

    fn transition(
        &self,
        employee_id: &str,
        action: AttendanceAction,
        now: DateTime<Utc>,
    ) -> EngineResult<TimeEntry> {
        require_employee(employee_id)?;

        let entry = self
            .store
            .update_open(employee_id, |open| apply_action(open, action, now))
            .map_err(|err| match (action, err) {
                // Breaks need a session; only clock-out treats a missing one as NotFound.
                (
                    AttendanceAction::StartBreak | AttendanceAction::EndBreak,
                    EngineError::NotFound { .. },
                ) => EngineError::conflict(format!(
                    "cannot {} while employee '{}' has no open session",
                    action.as_str(),
                    employee_id
                )),
                (_, err) => err,
            })
            .inspect_err(|err| {
                warn!(
                    employee_id = %employee_id,
                    action = action.as_str(),
                    error = %err,
                    "Attendance action rejected"
                );
            })?;

        info!(
            employee_id = %employee_id,
            entry_id = %entry.id,
            action = action.as_str(),
            status = entry.status.as_str(),
            "Attendance action applied"
        );
        self.announce(&entry);
        Ok(entry)
    }

    /// Removes a time entry. Admin-only; has no effect on any other record.
    pub fn delete_entry(&self, id: Uuid) -> EngineResult<TimeEntry> {
        let entry = self.store.remove(id)?;
        info!(entry_id = %id, employee_id = %entry.employee_id, "Time entry deleted");
        self.events.publish(PortalEvent::TimeEntryDeleted {
            entry_id: entry.id,
            employee_id: entry.employee_id.clone(),
        });
        Ok(entry)
    }

    /// Gets a time entry by id.
    pub fn get_entry(&self, id: Uuid) -> EngineResult<TimeEntry> {
        self.store.get(id)
    }

    /// Lists entries matching `filter`, oldest first.
    pub fn list_entries(&self, filter: &TimeEntryFilter) -> EngineResult<Vec<TimeEntry>> {
        filter.validate()?;
        self.store.list(filter)
    }

    /// Returns the employee's open session with live timers, if any.
    pub fn current_session(
        &self,
        employee_id: &str,
        now: DateTime<Utc>,
    ) -> EngineResult<Option<CurrentSession>> {
        Ok(self.store.open_entry(employee_id)?.map(|entry| {
            let break_elapsed_seconds = match (entry.status, entry.break_start) {
                (TimeEntryStatus::Break, Some(start)) => {
                    Some(break_elapsed(now, start).num_seconds())
                }
                _ => None,
            };
            CurrentSession {
                work_elapsed_seconds: work_elapsed(now, entry.clock_in).num_seconds(),
                break_elapsed_seconds,
                entry,
            }
        }))
    }

    /// Summarizes the employee's attendance between `from` and `to`.
    pub fn summarize(
        &self,
        employee_id: &str,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> EngineResult<AttendanceSummary> {
        require_employee(employee_id)?;
        let entries = self.list_entries(&TimeEntryFilter::for_employee(employee_id, from, to))?;
        Ok(AttendanceSummary::from_entries(employee_id, from, to, &entries))
    }

    fn announce(&self, entry: &TimeEntry) {
        self.events.publish(PortalEvent::TimeEntryChanged {
            entry_id: entry.id,
            employee_id: entry.employee_id.clone(),
            status: entry.status,
        });
    }
}

fn require_employee(employee_id: &str) -> EngineResult<()> {
    if employee_id.trim().is_empty() {
        return Err(EngineError::validation("employee_id", "must not be empty"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal::Decimal;

    fn at(hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 15, hour, minute, 0).unwrap()
    }

    fn service() -> AttendanceService {
        AttendanceService::new(EventBus::default())
    }

    #[test]
    fn test_full_session() {
        let service = service();
        service.clock_in("emp_001", Some("HQ".to_string()), None, at(9, 0)).unwrap();
        service.start_break("emp_001", at(12, 0)).unwrap();
        service.end_break("emp_001", at(12, 30)).unwrap();
        let entry = service.clock_out("emp_001", at(17, 30)).unwrap();

        assert_eq!(entry.status, TimeEntryStatus::Completed);
        assert_eq!(entry.total_hours, Some(Decimal::new(8, 0)));
        assert_eq!(entry.location.as_deref(), Some("HQ"));
    }

    #[test]
    fn test_double_clock_in_creates_no_record() {
        let service = service();
        service.clock_in("emp_001", None, None, at(9, 0)).unwrap();

        let err = service.clock_in("emp_001", None, None, at(9, 5)).unwrap_err();
        assert!(matches!(err, EngineError::Conflict { .. }));
        assert_eq!(service.list_entries(&TimeEntryFilter::default()).unwrap().len(), 1);
    }

    #[test]
    fn test_clock_out_without_session_is_not_found() {
        let err = service().clock_out("emp_001", at(17, 0)).unwrap_err();
        assert!(matches!(err, EngineError::NotFound { .. }));
    }

    #[test]
    fn test_break_without_session_is_conflict() {
        let service = service();
        assert!(matches!(
            service.start_break("emp_001", at(12, 0)),
            Err(EngineError::Conflict { .. })
        ));
        assert!(matches!(
            service.end_break("emp_001", at(12, 0)),
            Err(EngineError::Conflict { .. })
        ));
        assert!(service.list_entries(&TimeEntryFilter::default()).unwrap().is_empty());
    }

    #[test]
    fn test_break_after_clock_out_is_conflict() {
        let service = service();
        service.clock_in("emp_001", None, None, at(9, 0)).unwrap();
        service.clock_out("emp_001", at(12, 0)).unwrap();

        assert!(matches!(
            service.start_break("emp_001", at(12, 30)),
            Err(EngineError::Conflict { .. })
        ));
    }

    #[test]
    fn test_end_break_while_working_is_conflict() {
        let service = service();
        service.clock_in("emp_001", None, None, at(9, 0)).unwrap();
        assert!(matches!(
            service.end_break("emp_001", at(12, 0)),
            Err(EngineError::Conflict { .. })
        ));
    }

    #[test]
    fn test_blank_employee_is_rejected() {
        assert!(matches!(
            service().clock_in("  ", None, None, at(9, 0)),
            Err(EngineError::Validation { .. })
        ));
    }

    #[test]
    fn test_clock_in_again_after_clock_out() {
        let service = service();
        service.clock_in("emp_001", None, None, at(6, 0)).unwrap();
        service.clock_out("emp_001", at(10, 0)).unwrap();
        service.clock_in("emp_001", None, None, at(14, 0)).unwrap();

        assert_eq!(service.list_entries(&TimeEntryFilter::default()).unwrap().len(), 2);
    }

    #[test]
    fn test_delete_open_entry_allows_new_clock_in() {
        let service = service();
        let entry = service.clock_in("emp_001", None, None, at(9, 0)).unwrap();
        service.delete_entry(entry.id).unwrap();

        assert!(service.current_session("emp_001", at(9, 30)).unwrap().is_none());
        service.clock_in("emp_001", None, None, at(9, 30)).unwrap();
    }

    #[test]
    fn test_current_session_live_timers() {
        let service = service();
        service.clock_in("emp_001", None, None, at(9, 0)).unwrap();
        service.start_break("emp_001", at(12, 0)).unwrap();

        let session = service.current_session("emp_001", at(12, 10)).unwrap().unwrap();
        assert_eq!(session.work_elapsed_seconds, 3 * 3600 + 600);
        assert_eq!(session.break_elapsed_seconds, Some(600));
    }

    #[test]
    fn test_summary_recomputed_after_delete() {
        let service = service();
        service.clock_in("emp_001", None, None, at(6, 0)).unwrap();
        let first = service.clock_out("emp_001", at(10, 0)).unwrap();
        service.clock_in("emp_001", None, None, at(14, 0)).unwrap();
        service.clock_out("emp_001", at(18, 0)).unwrap();

        assert_eq!(
            service.summarize("emp_001", None, None).unwrap().total_hours,
            Decimal::new(8, 0)
        );

        service.delete_entry(first.id).unwrap();
        assert_eq!(
            service.summarize("emp_001", None, None).unwrap().total_hours,
            Decimal::new(4, 0)
        );
    }

    #[test]
    fn test_events_follow_transitions() {
        let bus = EventBus::default();
        let mut receiver = bus.subscribe();
        let service = AttendanceService::new(bus);

        service.clock_in("emp_001", None, None, at(9, 0)).unwrap();
        service.clock_out("emp_001", at(17, 0)).unwrap();

        let statuses: Vec<TimeEntryStatus> = std::iter::from_fn(|| receiver.try_recv().ok())
            .filter_map(|event| match event {
                PortalEvent::TimeEntryChanged { status, .. } => Some(status),
                _ => None,
            })
            .collect();
        assert_eq!(statuses, vec![TimeEntryStatus::Active, TimeEntryStatus::Completed]);
    }

    #[test]
    fn test_rejected_action_publishes_nothing() {
        let bus = EventBus::default();
        let mut receiver = bus.subscribe();
        let service = AttendanceService::new(bus);

        let _ = service.clock_out("emp_001", at(17, 0));
        assert!(receiver.try_recv().is_err());
    }
}
