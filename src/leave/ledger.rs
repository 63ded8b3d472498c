//! Leave entitlement accounting.
//!
//! Only the granted `total_days` is stored per balance. `used_days` is
//! always the sum of approved requests drawing on the balance, so approving,
//! rejecting or deleting a request can never double-count or leak days.

use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use rust_decimal::Decimal;
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::{EngineError, EngineResult};
use crate::events::{EventBus, PortalEvent};
use crate::models::{BalanceKey, LeaveBalance, LeaveRequest, LeaveType};

const TABLE: &str = "leave book";

/// Grants and requests, guarded together by the ledger's lock.
#[derive(Debug, Default)]
pub struct LeaveBook {
    grants: HashMap<BalanceKey, Decimal>,
    pub(crate) requests: HashMap<Uuid, LeaveRequest>,
}

impl LeaveBook {
    /// Days consumed by approved requests against `key`.
    pub fn used_days(&self, key: &BalanceKey) -> Decimal {
        self.requests
            .values()
            .filter(|request| request.is_consuming() && draws_from(request, key))
            .map(|request| request.days_requested)
            .sum()
    }

    /// The balance for `key`, or `None` if nothing was ever granted.
    pub fn balance(&self, key: &BalanceKey) -> Option<LeaveBalance> {
        self.grants
            .get(key)
            .map(|total| LeaveBalance::derive(key, *total, self.used_days(key)))
    }

    /// Days still available under `key`; zero entitlement when never granted.
    pub fn remaining_days(&self, key: &BalanceKey) -> Decimal {
        let total = self.grants.get(key).copied().unwrap_or(Decimal::ZERO);
        total - self.used_days(key)
    }

    /// Whether `days` more can be approved against `key`.
    pub fn can_consume(&self, key: &BalanceKey, days: Decimal) -> bool {
        days <= self.remaining_days(key)
    }

    /// Builds the error returned when `days` exceeds what `key` has left.
    pub fn insufficient(&self, key: &BalanceKey, days: Decimal) -> EngineError {
        EngineError::InsufficientBalance {
            employee_id: key.employee_id.clone(),
            leave_type: key.leave_type.clone(),
            year: key.year,
            requested: days,
            remaining: self.remaining_days(key),
        }
    }
}

fn draws_from(request: &LeaveRequest, key: &BalanceKey) -> bool {
    request.employee_id == key.employee_id
        && request.leave_type == key.leave_type
        && crate::calculation::leave_year(request.start_date) == key.year
}

/// The authoritative leave ledger.
///
/// The same lock guards every balance and every request, so a check of the
/// remaining days and the status write that depends on it always happen
/// inside one critical section.
#[derive(Debug)]
pub struct LeaveLedger {
    book: RwLock<LeaveBook>,
    leave_types: Vec<LeaveType>,
    events: EventBus,
}

impl LeaveLedger {
    /// Creates an empty ledger over the configured leave types.
    pub fn new(leave_types: Vec<LeaveType>, events: EventBus) -> Self {
        Self {
            book: RwLock::new(LeaveBook::default()),
            leave_types,
            events,
        }
    }

    /// The configured leave types.
    pub fn leave_types(&self) -> &[LeaveType] {
        &self.leave_types
    }

    /// Looks up a configured leave type.
    pub fn leave_type(&self, name: &str) -> EngineResult<&LeaveType> {
        self.leave_types
            .iter()
            .find(|lt| lt.name == name)
            .ok_or_else(|| {
                EngineError::validation("leave_type", format!("unknown leave type '{}'", name))
            })
    }

    /// Returns the balance for one employee, leave type and year.
    pub fn get_balance(
        &self,
        employee_id: &str,
        leave_type: &str,
        year: i32,
    ) -> EngineResult<LeaveBalance> {
        let key = BalanceKey::new(employee_id, leave_type, year);
        self.read()?.balance(&key).ok_or_else(|| {
            EngineError::not_found(
                "Leave balance",
                format!("{}/{}/{}", employee_id, leave_type, year),
            )
        })
    }

    /// Whether `days` more can be approved for the employee.
    pub fn can_consume(
        &self,
        employee_id: &str,
        leave_type: &str,
        year: i32,
        days: Decimal,
    ) -> EngineResult<bool> {
        let key = BalanceKey::new(employee_id, leave_type, year);
        Ok(self.read()?.can_consume(&key, days))
    }

    /// Sets the entitlement for one employee, leave type and year.
    ///
    /// Does not touch usage. Rejects negative totals, totals above the leave
    /// type's annual cap (unless the type carries forward), and totals below
    /// the days already approved.
    pub fn grant(
        &self,
        employee_id: &str,
        leave_type: &str,
        year: i32,
        total_days: Decimal,
    ) -> EngineResult<LeaveBalance> {
        if employee_id.trim().is_empty() {
            return Err(EngineError::validation("employee_id", "must not be empty"));
        }
        let kind = self.leave_type(leave_type)?;
        if total_days < Decimal::ZERO {
            return Err(EngineError::validation("total_days", "must not be negative"));
        }
        if !kind.carry_forward && total_days > Decimal::from(kind.max_days_per_year) {
            return Err(EngineError::validation(
                "total_days",
                format!(
                    "{} exceeds the {} day annual cap for {} leave",
                    total_days, kind.max_days_per_year, kind.name
                ),
            ));
        }

        let key = BalanceKey::new(employee_id, leave_type, year);
        let balance = {
            let mut book = self.write()?;
            let used = book.used_days(&key);
            if total_days < used {
                warn!(
                    employee_id = %employee_id,
                    leave_type = %leave_type,
                    year,
                    total_days = %total_days,
                    used_days = %used,
                    "Grant below approved usage rejected"
                );
                return Err(EngineError::validation(
                    "total_days",
                    format!("{} is below the {} days already approved", total_days, used),
                ));
            }
            book.grants.insert(key.clone(), total_days);
            LeaveBalance::derive(&key, total_days, used)
        };

        info!(
            employee_id = %employee_id,
            leave_type = %leave_type,
            year,
            total_days = %total_days,
            "Leave entitlement granted"
        );
        self.events.publish(PortalEvent::LeaveBalanceGranted {
            employee_id: key.employee_id,
            leave_type: key.leave_type,
            year,
            total_days,
        });
        Ok(balance)
    }

    pub(crate) fn read(&self) -> EngineResult<RwLockReadGuard<'_, LeaveBook>> {
        self.book.read().map_err(|_| EngineError::poisoned(TABLE))
    }

    pub(crate) fn write(&self) -> EngineResult<RwLockWriteGuard<'_, LeaveBook>> {
        self.book.write().map_err(|_| EngineError::poisoned(TABLE))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};

    use crate::models::LeaveStatus;

    fn leave_types() -> Vec<LeaveType> {
        vec![
            LeaveType {
                name: "annual".to_string(),
                max_days_per_year: 20,
                carry_forward: true,
            },
            LeaveType {
                name: "sick".to_string(),
                max_days_per_year: 10,
                carry_forward: false,
            },
        ]
    }

    fn ledger() -> LeaveLedger {
        LeaveLedger::new(leave_types(), EventBus::default())
    }

    fn approved(employee_id: &str, start: &str, days: i64) -> LeaveRequest {
        let start_date = NaiveDate::parse_from_str(start, "%Y-%m-%d").unwrap();
        LeaveRequest {
            id: Uuid::new_v4(),
            employee_id: employee_id.to_string(),
            leave_type: "annual".to_string(),
            start_date,
            end_date: start_date + chrono::Duration::days(days - 1),
            days_requested: Decimal::from(days),
            status: LeaveStatus::Approved,
            reason: String::new(),
            approved_by: Some("admin".to_string()),
            approved_at: Some(Utc::now()),
            admin_notes: None,
            created_at: Utc::now(),
        }
    }

    fn insert(ledger: &LeaveLedger, request: LeaveRequest) {
        ledger.write().unwrap().requests.insert(request.id, request);
    }

    #[test]
    fn test_grant_then_balance() {
        let ledger = ledger();
        ledger.grant("emp_001", "annual", 2026, Decimal::new(20, 0)).unwrap();

        let balance = ledger.get_balance("emp_001", "annual", 2026).unwrap();
        assert_eq!(balance.total_days, Decimal::new(20, 0));
        assert_eq!(balance.used_days, Decimal::ZERO);
        assert_eq!(balance.remaining_days, Decimal::new(20, 0));
    }

    #[test]
    fn test_missing_balance_is_not_found() {
        assert!(matches!(
            ledger().get_balance("emp_001", "annual", 2026),
            Err(EngineError::NotFound { .. })
        ));
    }

    #[test]
    fn test_used_days_derive_from_approved_requests() {
        let ledger = ledger();
        ledger.grant("emp_001", "annual", 2026, Decimal::new(20, 0)).unwrap();
        insert(&ledger, approved("emp_001", "2026-03-02", 5));
        insert(&ledger, approved("emp_001", "2026-06-01", 3));

        let mut pending = approved("emp_001", "2026-08-03", 4);
        pending.status = LeaveStatus::Pending;
        insert(&ledger, pending);

        let mut rejected = approved("emp_001", "2026-09-07", 2);
        rejected.status = LeaveStatus::Rejected;
        insert(&ledger, rejected);

        let balance = ledger.get_balance("emp_001", "annual", 2026).unwrap();
        assert_eq!(balance.used_days, Decimal::new(8, 0));
        assert_eq!(balance.remaining_days, Decimal::new(12, 0));
    }

    #[test]
    fn test_usage_is_scoped_to_employee_and_year() {
        let ledger = ledger();
        ledger.grant("emp_001", "annual", 2026, Decimal::new(20, 0)).unwrap();
        insert(&ledger, approved("emp_002", "2026-03-02", 5));
        insert(&ledger, approved("emp_001", "2025-03-02", 5));

        let balance = ledger.get_balance("emp_001", "annual", 2026).unwrap();
        assert_eq!(balance.used_days, Decimal::ZERO);
    }

    #[test]
    fn test_can_consume_boundaries() {
        let ledger = ledger();
        ledger.grant("emp_001", "annual", 2026, Decimal::new(10, 0)).unwrap();

        assert!(ledger.can_consume("emp_001", "annual", 2026, Decimal::new(10, 0)).unwrap());
        assert!(!ledger.can_consume("emp_001", "annual", 2026, Decimal::new(11, 0)).unwrap());
        assert!(!ledger.can_consume("emp_001", "annual", 2027, Decimal::ONE).unwrap());
    }

    #[test]
    fn test_grant_unknown_type_is_validation_error() {
        assert!(matches!(
            ledger().grant("emp_001", "sabbatical", 2026, Decimal::ONE),
            Err(EngineError::Validation { .. })
        ));
    }

    #[test]
    fn test_grant_respects_cap_without_carry_forward() {
        let ledger = ledger();
        assert!(ledger.grant("emp_001", "sick", 2026, Decimal::new(11, 0)).is_err());
        assert!(ledger.grant("emp_001", "sick", 2026, Decimal::new(10, 0)).is_ok());
        // annual carries forward, so the cap does not bind
        assert!(ledger.grant("emp_001", "annual", 2026, Decimal::new(25, 0)).is_ok());
    }

    #[test]
    fn test_grant_rejects_negative_total() {
        assert!(matches!(
            ledger().grant("emp_001", "annual", 2026, Decimal::new(-1, 0)),
            Err(EngineError::Validation { .. })
        ));
    }

    #[test]
    fn test_grant_cannot_drop_below_usage() {
        let ledger = ledger();
        ledger.grant("emp_001", "annual", 2026, Decimal::new(20, 0)).unwrap();
        insert(&ledger, approved("emp_001", "2026-03-02", 8));

        assert!(ledger.grant("emp_001", "annual", 2026, Decimal::new(7, 0)).is_err());
        let balance = ledger.grant("emp_001", "annual", 2026, Decimal::new(8, 0)).unwrap();
        assert_eq!(balance.remaining_days, Decimal::ZERO);
    }

    #[test]
    fn test_regrant_keeps_usage() {
        let ledger = ledger();
        ledger.grant("emp_001", "annual", 2026, Decimal::new(20, 0)).unwrap();
        insert(&ledger, approved("emp_001", "2026-03-02", 5));

        let balance = ledger.grant("emp_001", "annual", 2026, Decimal::new(22, 0)).unwrap();
        assert_eq!(balance.used_days, Decimal::new(5, 0));
        assert_eq!(balance.remaining_days, Decimal::new(17, 0));
    }

    #[test]
    fn test_insufficient_reports_remaining() {
        let ledger = ledger();
        ledger.grant("emp_001", "annual", 2026, Decimal::new(4, 0)).unwrap();
        let key = BalanceKey::new("emp_001", "annual", 2026);

        match ledger.read().unwrap().insufficient(&key, Decimal::new(6, 0)) {
            EngineError::InsufficientBalance { requested, remaining, .. } => {
                assert_eq!(requested, Decimal::new(6, 0));
                assert_eq!(remaining, Decimal::new(4, 0));
            }
            other => panic!("Expected InsufficientBalance, got {:?}", other),
        }
    }
}
