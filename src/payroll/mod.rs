//! Payroll records.
//!
//! Net pay arithmetic lives in [`crate::calculation::net_pay`]; this module
//! stores records and holds them to it.

mod register;

pub use register::{PayrollRecordInput, PayrollRegister};
