//! Payroll record model.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Processing status of a payroll record. Admins move records freely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayrollStatus {
    /// Not yet processed.
    Pending,
    /// Being processed.
    Processing,
    /// Paid out.
    Paid,
}

/// Pay for one employee over one pay period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollRecord {
    /// Unique identifier for the record.
    pub id: Uuid,
    /// The employee being paid.
    pub employee_id: String,
    /// First day of the pay period (inclusive).
    pub pay_period_start: NaiveDate,
    /// Last day of the pay period (inclusive).
    pub pay_period_end: NaiveDate,
    /// Gross pay before adjustments.
    pub gross_pay: Decimal,
    /// Total deductions.
    pub deductions: Decimal,
    /// Overtime hours worked in the period.
    pub overtime_hours: Decimal,
    /// Pay for the overtime hours.
    pub overtime_pay: Decimal,
    /// Bonus paid in the period.
    pub bonus: Decimal,
    /// Net pay.
    pub net_pay: Decimal,
    /// Processing status.
    pub status: PayrollStatus,
    /// ISO currency code.
    pub currency: String,
    /// When the record was created.
    pub created_at: DateTime<Utc>,
}
