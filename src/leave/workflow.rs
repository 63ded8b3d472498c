//! Leave request submission and finalization.
//!
//! A request is created `Pending` and moves exactly once to `Approved` or
//! `Rejected`. The terminal-state check runs first inside the ledger's write
//! guard, so of two concurrent finalize calls on one request only the first
//! ever reaches the balance check.

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::calculation::inclusive_day_count;
use crate::error::{EngineError, EngineResult};
use crate::events::{EventBus, PortalEvent};
use crate::models::{LeaveDecision, LeaveRequest, LeaveStatus};

use super::ledger::LeaveLedger;

/// Selects leave requests for listings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LeaveRequestFilter {
    /// Only requests of this employee.
    #[serde(default)]
    pub employee_id: Option<String>,
    /// Only requests in this status.
    #[serde(default)]
    pub status: Option<LeaveStatus>,
}

impl LeaveRequestFilter {
    fn matches(&self, request: &LeaveRequest) -> bool {
        self.employee_id
            .as_deref()
            .is_none_or(|id| request.employee_id == id)
            && self.status.is_none_or(|status| request.status == status)
    }
}

/// Creates, finalizes and deletes leave requests against the ledger.
#[derive(Debug)]
pub struct LeaveRequestWorkflow {
    ledger: Arc<LeaveLedger>,
    events: EventBus,
}

impl LeaveRequestWorkflow {
    /// Creates a workflow over `ledger`.
    pub fn new(ledger: Arc<LeaveLedger>, events: EventBus) -> Self {
        Self { ledger, events }
    }

    /// The ledger this workflow draws on.
    pub fn ledger(&self) -> &LeaveLedger {
        &self.ledger
    }

    /// Submits a request for the days from `start_date` to `end_date`
    /// inclusive, charged to the year of `start_date`.
    ///
    /// Fails with a validation error for an unknown leave type or an end
    /// before the start, and with an insufficient balance error when the
    /// days exceed what remains.
    pub fn submit(
        &self,
        employee_id: &str,
        leave_type: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
        reason: &str,
        now: DateTime<Utc>,
    ) -> EngineResult<LeaveRequest> {
        if employee_id.trim().is_empty() {
            return Err(EngineError::validation("employee_id", "must not be empty"));
        }
        self.ledger.leave_type(leave_type)?;
        let days_requested = inclusive_day_count(start_date, end_date)?;

        let request = LeaveRequest {
            id: Uuid::new_v4(),
            employee_id: employee_id.to_string(),
            leave_type: leave_type.to_string(),
            start_date,
            end_date,
            days_requested,
            status: LeaveStatus::Pending,
            reason: reason.to_string(),
            approved_by: None,
            approved_at: None,
            admin_notes: None,
            created_at: now,
        };

        {
            let mut book = self.ledger.write()?;
            let key = request.balance_key();
            if !book.can_consume(&key, days_requested) {
                let err = book.insufficient(&key, days_requested);
                warn!(employee_id = %employee_id, error = %err, "Leave request rejected at submit");
                return Err(err);
            }
            book.requests.insert(request.id, request.clone());
        }

        info!(
            employee_id = %employee_id,
            request_id = %request.id,
            leave_type = %leave_type,
            days_requested = %days_requested,
            "Leave request submitted"
        );
        self.announce(&request);
        Ok(request)
    }

    /// Moves a pending request to `decision`.
    ///
    /// Fails with a conflict if the request was already finalized. Approval
    /// re-checks the balance; if it no longer covers the request the call
    /// fails with an insufficient balance error and the request stays
    /// pending.
    pub fn finalize(
        &self,
        request_id: Uuid,
        decision: LeaveDecision,
        admin_id: &str,
        admin_notes: Option<String>,
        now: DateTime<Utc>,
    ) -> EngineResult<LeaveRequest> {
        if admin_id.trim().is_empty() {
            return Err(EngineError::validation("approved_by", "must not be empty"));
        }

        let finalized = {
            let mut book = self.ledger.write()?;

            let request = book
                .requests
                .get(&request_id)
                .ok_or_else(|| EngineError::not_found("Leave request", request_id))?;
            if request.status != LeaveStatus::Pending {
                let err = EngineError::conflict(format!(
                    "leave request {} is already finalized as {}",
                    request_id,
                    request.status.as_str()
                ));
                warn!(request_id = %request_id, error = %err, "Finalize rejected");
                return Err(err);
            }

            let mut finalized = request.clone();
            if decision == LeaveDecision::Approved {
                let key = finalized.balance_key();
                if !book.can_consume(&key, finalized.days_requested) {
                    let err = book.insufficient(&key, finalized.days_requested);
                    warn!(request_id = %request_id, error = %err, "Approval rejected, request stays pending");
                    return Err(err);
                }
            }

            finalized.status = decision.into();
            finalized.approved_by = Some(admin_id.to_string());
            finalized.approved_at = Some(now);
            finalized.admin_notes = admin_notes;
            book.requests.insert(request_id, finalized.clone());
            finalized
        };

        info!(
            request_id = %request_id,
            employee_id = %finalized.employee_id,
            status = finalized.status.as_str(),
            approved_by = %admin_id,
            "Leave request finalized"
        );
        self.announce(&finalized);
        Ok(finalized)
    }

    /// Removes a request. Deleting an approved request returns its days to
    /// the balance.
    pub fn delete(&self, request_id: Uuid) -> EngineResult<LeaveRequest> {
        let removed = self
            .ledger
            .write()?
            .requests
            .remove(&request_id)
            .ok_or_else(|| EngineError::not_found("Leave request", request_id))?;

        let restored_days = if removed.is_consuming() {
            removed.days_requested
        } else {
            Decimal::ZERO
        };
        info!(
            request_id = %request_id,
            employee_id = %removed.employee_id,
            restored_days = %restored_days,
            "Leave request deleted"
        );
        self.events.publish(PortalEvent::LeaveRequestDeleted {
            request_id,
            employee_id: removed.employee_id.clone(),
            restored_days,
        });
        Ok(removed)
    }

    /// Gets a request by id.
    pub fn get_request(&self, request_id: Uuid) -> EngineResult<LeaveRequest> {
        self.ledger
            .read()?
            .requests
            .get(&request_id)
            .cloned()
            .ok_or_else(|| EngineError::not_found("Leave request", request_id))
    }

    /// Lists requests matching `filter`, oldest submission first.
    pub fn list_requests(&self, filter: &LeaveRequestFilter) -> EngineResult<Vec<LeaveRequest>> {
        let mut requests: Vec<LeaveRequest> = self
            .ledger
            .read()?
            .requests
            .values()
            .filter(|request| filter.matches(request))
            .cloned()
            .collect();
        requests.sort_by_key(|request| (request.created_at, request.start_date));
        Ok(requests)
    }

    fn announce(&self, request: &LeaveRequest) {
        self.events.publish(PortalEvent::LeaveRequestChanged {
            request_id: request.id,
            employee_id: request.employee_id.clone(),
            status: request.status,
        });
    }
}
