//! HTTP API module for the employee portal.
//!
//! This module provides the REST endpoints for attendance, leave and
//! payroll. Every response uses the `{success, data, error}` envelope.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{
    ClockInRequest, DateRangeQuery, EmployeeActionRequest, FinalizeLeaveRequest,
    GrantBalanceRequest, NetPayRequest, NetPayResponse, PayrollListQuery, SubmitLeaveRequest,
    UpdatePayrollStatusRequest,
};
pub use response::{ApiEnvelope, ApiError};
pub use state::AppState;
