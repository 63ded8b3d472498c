//! In-memory time entry table.
//!
//! The table keeps an index of each employee's open entry. Every write that
//! depends on that index checks and updates it under one write guard, which
//! is what makes concurrent clock-ins for the same employee mutually
//! exclusive.

use std::collections::HashMap;
use std::sync::RwLock;

use chrono::NaiveDate;
use serde::Deserialize;
use uuid::Uuid;

use crate::error::{EngineError, EngineResult};
use crate::models::TimeEntry;

const TABLE: &str = "time entries";

/// Selects time entries for listings and summaries.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TimeEntryFilter {
    /// Only entries of this employee.
    #[serde(default)]
    pub employee_id: Option<String>,
    /// Only entries dated on or after this day.
    #[serde(default)]
    pub from: Option<NaiveDate>,
    /// Only entries dated on or before this day.
    #[serde(default)]
    pub to: Option<NaiveDate>,
}

impl TimeEntryFilter {
    /// Filter for one employee over an optional date range.
    pub fn for_employee(
        employee_id: impl Into<String>,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Self {
        Self {
            employee_id: Some(employee_id.into()),
            from,
            to,
        }
    }

    /// Rejects a range whose end precedes its start.
    pub fn validate(&self) -> EngineResult<()> {
        if let (Some(from), Some(to)) = (self.from, self.to) {
            if to < from {
                return Err(EngineError::validation(
                    "to",
                    format!("range end {} is before range start {}", to, from),
                ));
            }
        }
        Ok(())
    }

    fn matches(&self, entry: &TimeEntry) -> bool {
        self.employee_id
            .as_deref()
            .is_none_or(|id| entry.employee_id == id)
            && self.from.is_none_or(|from| entry.date >= from)
            && self.to.is_none_or(|to| entry.date <= to)
    }
}

#[derive(Debug, Default)]
struct TimeEntryTable {
    entries: HashMap<Uuid, TimeEntry>,
    open_by_employee: HashMap<String, Uuid>,
}

/// Thread-safe storage for time entries.
#[derive(Debug, Default)]
pub struct TimeEntryStore {
    table: RwLock<TimeEntryTable>,
}

impl TimeEntryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a freshly opened entry.
    ///
    /// Fails with a conflict, inserting nothing, if the employee already has
    /// an open entry.
    pub fn insert_open(&self, entry: TimeEntry) -> EngineResult<TimeEntry> {
        let mut table = self.table.write().map_err(|_| EngineError::poisoned(TABLE))?;

        if table.open_by_employee.contains_key(&entry.employee_id) {
            return Err(EngineError::conflict(format!(
                "employee '{}' is already clocked in",
                entry.employee_id
            )));
        }

        table
            .open_by_employee
            .insert(entry.employee_id.clone(), entry.id);
        table.entries.insert(entry.id, entry.clone());
        Ok(entry)
    }

    /// Replaces the employee's open entry with `transition(open_entry)`.
    ///
    /// The open entry is read and written under the same write guard. If the
    /// employee has no open entry the result is a not-found error; if
    /// `transition` fails nothing is written. When the new entry is no
    /// longer open the employee's open slot is released.
    pub fn update_open<F>(&self, employee_id: &str, transition: F) -> EngineResult<TimeEntry>
    where
        F: FnOnce(&TimeEntry) -> EngineResult<TimeEntry>,
    {
        let mut table = self.table.write().map_err(|_| EngineError::poisoned(TABLE))?;

        let open_id = *table
            .open_by_employee
            .get(employee_id)
            .ok_or_else(|| EngineError::not_found("Open time entry for employee", employee_id))?;
        let current = table.entries.get(&open_id).ok_or_else(|| EngineError::Internal {
            message: format!("open entry index points at missing entry {}", open_id),
        })?;

        let updated = transition(current)?;
        if updated.id != open_id || updated.employee_id != employee_id {
            return Err(EngineError::Internal {
                message: format!("transition changed the identity of entry {}", open_id),
            });
        }

        if !updated.is_open() {
            table.open_by_employee.remove(employee_id);
        }
        table.entries.insert(open_id, updated.clone());
        Ok(updated)
    }

    /// Removes an entry by id, releasing the employee's open slot if it was
    /// the open entry.
    pub fn remove(&self, id: Uuid) -> EngineResult<TimeEntry> {
        let mut table = self.table.write().map_err(|_| EngineError::poisoned(TABLE))?;

        let entry = table
            .entries
            .remove(&id)
            .ok_or_else(|| EngineError::not_found("Time entry", id))?;
        if table.open_by_employee.get(&entry.employee_id) == Some(&id) {
            table.open_by_employee.remove(&entry.employee_id);
        }
        Ok(entry)
    }

    /// Gets an entry by id.
    pub fn get(&self, id: Uuid) -> EngineResult<TimeEntry> {
        let table = self.table.read().map_err(|_| EngineError::poisoned(TABLE))?;
        table
            .entries
            .get(&id)
            .cloned()
            .ok_or_else(|| EngineError::not_found("Time entry", id))
    }

    /// Gets the employee's open entry, if any.
    pub fn open_entry(&self, employee_id: &str) -> EngineResult<Option<TimeEntry>> {
        let table = self.table.read().map_err(|_| EngineError::poisoned(TABLE))?;
        Ok(table
            .open_by_employee
            .get(employee_id)
            .and_then(|id| table.entries.get(id))
            .cloned())
    }

    /// Lists matching entries ordered by clock-in time.
    pub fn list(&self, filter: &TimeEntryFilter) -> EngineResult<Vec<TimeEntry>> {
        let table = self.table.read().map_err(|_| EngineError::poisoned(TABLE))?;
        let mut entries: Vec<TimeEntry> = table
            .entries
            .values()
            .filter(|entry| filter.matches(entry))
            .cloned()
            .collect();
        entries.sort_by_key(|entry| entry.clock_in);
        Ok(entries)
    }
}
