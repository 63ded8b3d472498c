//! Request types for the employee portal API.
//!
//! Caller identity arrives in the body: authentication happens in front of
//! this service.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{LeaveDecision, PayrollStatus};

/// Body of `POST /attendance/clock-in`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClockInRequest {
    /// The employee clocking in.
    pub employee_id: String,
    /// Where the employee is working from.
    #[serde(default)]
    pub location: Option<String>,
    /// Free-form notes.
    #[serde(default)]
    pub notes: Option<String>,
}

/// Body of the break and clock-out endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmployeeActionRequest {
    /// The employee acting.
    pub employee_id: String,
}

/// Query of `GET /attendance/summary/:employee_id`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DateRangeQuery {
    /// First day included.
    #[serde(default)]
    pub from: Option<NaiveDate>,
    /// Last day included.
    #[serde(default)]
    pub to: Option<NaiveDate>,
}

/// Body of `POST /leave/requests`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitLeaveRequest {
    /// The requesting employee.
    pub employee_id: String,
    /// The leave type.
    pub leave_type: String,
    /// First day of leave.
    pub start_date: NaiveDate,
    /// Last day of leave (inclusive).
    pub end_date: NaiveDate,
    /// Why the leave is needed.
    #[serde(default)]
    pub reason: String,
}

/// Body of `POST /leave/requests/:id/finalize`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinalizeLeaveRequest {
    /// Approve or reject.
    pub decision: LeaveDecision,
    /// The admin making the decision.
    pub approved_by: String,
    /// Notes for the employee.
    #[serde(default)]
    pub admin_notes: Option<String>,
}

/// Body of `PUT /leave/balances`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GrantBalanceRequest {
    /// The employee.
    pub employee_id: String,
    /// The leave type.
    pub leave_type: String,
    /// The leave year.
    pub year: i32,
    /// The new entitlement.
    pub total_days: Decimal,
}

/// Body of `POST /payroll/net-pay`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetPayRequest {
    /// Gross pay.
    pub gross_pay: Decimal,
    /// Overtime pay.
    #[serde(default)]
    pub overtime_pay: Decimal,
    /// Bonus.
    #[serde(default)]
    pub bonus: Decimal,
    /// Deductions.
    #[serde(default)]
    pub deductions: Decimal,
}

/// Result of `POST /payroll/net-pay`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetPayResponse {
    /// The computed net pay.
    pub net_pay: Decimal,
}

/// Query of `GET /payroll/records`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PayrollListQuery {
    /// Only records of this employee.
    #[serde(default)]
    pub employee_id: Option<String>,
}

/// Body of `PUT /payroll/records/:id/status`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdatePayrollStatusRequest {
    /// The new status.
    pub status: PayrollStatus,
}
