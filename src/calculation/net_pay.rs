//! Net pay arithmetic for payroll records.

use rust_decimal::Decimal;

use crate::error::{EngineError, EngineResult};

/// Derives net pay from a payroll record's components.
///
/// `net_pay = gross + overtime_pay + bonus - deductions`
///
/// Returns a validation error when the result does not fit in a `Decimal`.
///
/// # Examples
///
/// ```
/// use employee_portal::calculation::net_pay;
/// use rust_decimal::Decimal;
///
/// let net = net_pay(
///     Decimal::new(5000, 0),
///     Decimal::new(200, 0),
///     Decimal::new(100, 0),
///     Decimal::new(300, 0),
/// )
/// .unwrap();
/// assert_eq!(net, Decimal::new(5000, 0));
/// ```
pub fn net_pay(
    gross: Decimal,
    overtime_pay: Decimal,
    bonus: Decimal,
    deductions: Decimal,
) -> EngineResult<Decimal> {
    gross
        .checked_add(overtime_pay)
        .and_then(|total| total.checked_add(bonus))
        .and_then(|total| total.checked_sub(deductions))
        .ok_or_else(|| EngineError::validation("net_pay", "pay components are out of range"))
}
