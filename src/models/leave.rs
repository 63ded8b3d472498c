//! Leave models: reference leave types, derived balances and requests.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A configured kind of leave.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveType {
    /// Identifier used on balances and requests (e.g. "annual").
    pub name: String,
    /// Maximum entitlement that may be granted in one year.
    pub max_days_per_year: u32,
    /// Whether unused days may be carried into later years, which lifts the
    /// annual grant cap.
    #[serde(default)]
    pub carry_forward: bool,
}

/// Identifies one leave balance.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BalanceKey {
    /// The employee the balance belongs to.
    pub employee_id: String,
    /// The leave type.
    pub leave_type: String,
    /// The leave year.
    pub year: i32,
}

impl BalanceKey {
    /// Creates a new balance key.
    pub fn new(employee_id: impl Into<String>, leave_type: impl Into<String>, year: i32) -> Self {
        Self {
            employee_id: employee_id.into(),
            leave_type: leave_type.into(),
            year,
        }
    }
}

/// A snapshot of entitlement for one (employee, leave type, year).
///
/// `used_days` is derived from approved requests, so
/// `remaining_days == total_days - used_days` by construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveBalance {
    /// The employee the balance belongs to.
    pub employee_id: String,
    /// The leave type.
    pub leave_type: String,
    /// The leave year.
    pub year: i32,
    /// Granted entitlement.
    pub total_days: Decimal,
    /// Days consumed by approved requests.
    pub used_days: Decimal,
    /// Days still available.
    pub remaining_days: Decimal,
}

impl LeaveBalance {
    /// Builds a balance from its stored grant and the derived usage.
    pub fn derive(key: &BalanceKey, total_days: Decimal, used_days: Decimal) -> Self {
        Self {
            employee_id: key.employee_id.clone(),
            leave_type: key.leave_type.clone(),
            year: key.year,
            total_days,
            used_days,
            remaining_days: total_days - used_days,
        }
    }
}

/// Status of a leave request. `Approved` and `Rejected` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeaveStatus {
    /// Awaiting an admin decision.
    Pending,
    /// Approved; counts against the balance.
    Approved,
    /// Rejected; never counts against the balance.
    Rejected,
}

impl LeaveStatus {
    /// Returns the wire name of the status.
    pub fn as_str(self) -> &'static str {
        match self {
            LeaveStatus::Pending => "pending",
            LeaveStatus::Approved => "approved",
            LeaveStatus::Rejected => "rejected",
        }
    }
}

/// An admin decision that finalizes a pending request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeaveDecision {
    /// Approve and consume entitlement.
    Approved,
    /// Reject without touching entitlement.
    Rejected,
}

impl From<LeaveDecision> for LeaveStatus {
    fn from(decision: LeaveDecision) -> Self {
        match decision {
            LeaveDecision::Approved => LeaveStatus::Approved,
            LeaveDecision::Rejected => LeaveStatus::Rejected,
        }
    }
}

/// An employee's request for leave.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveRequest {
    /// Unique identifier for the request.
    pub id: Uuid,
    /// The requesting employee.
    pub employee_id: String,
    /// The leave type requested.
    pub leave_type: String,
    /// First day of leave.
    pub start_date: NaiveDate,
    /// Last day of leave (inclusive).
    pub end_date: NaiveDate,
    /// Inclusive day count between start and end.
    pub days_requested: Decimal,
    /// Current status.
    pub status: LeaveStatus,
    /// Employee-supplied reason.
    pub reason: String,
    /// The admin who finalized the request.
    pub approved_by: Option<String>,
    /// When the request was finalized.
    pub approved_at: Option<DateTime<Utc>>,
    /// Notes the admin attached when finalizing.
    pub admin_notes: Option<String>,
    /// When the request was submitted.
    pub created_at: DateTime<Utc>,
}

impl LeaveRequest {
    /// The balance this request draws from.
    pub fn balance_key(&self) -> BalanceKey {
        BalanceKey::new(
            self.employee_id.clone(),
            self.leave_type.clone(),
            crate::calculation::leave_year(self.start_date),
        )
    }

    /// Whether this request currently consumes entitlement.
    pub fn is_consuming(&self) -> bool {
        self.status == LeaveStatus::Approved
    }
}
