//! HTTP request handlers for the employee portal API.
//!
//! This module contains the handler functions for all API endpoints.

use std::fmt::Display;

use axum::{
    Json, Router,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::StatusCode,
    routing::{get, post, put},
};
use chrono::Utc;
use serde_json::{Value, json};
use tracing::{info, warn};
use uuid::Uuid;

use crate::attendance::{AttendanceSummary, CurrentSession, TimeEntryFilter};
use crate::calculation::net_pay;
use crate::error::EngineResult;
use crate::leave::LeaveRequestFilter;
use crate::models::{LeaveBalance, LeaveRequest, LeaveType, PayrollRecord, TimeEntry};
use crate::payroll::PayrollRecordInput;

use super::request::{
    ClockInRequest, DateRangeQuery, EmployeeActionRequest, FinalizeLeaveRequest,
    GrantBalanceRequest, NetPayRequest, NetPayResponse, PayrollListQuery, SubmitLeaveRequest,
    UpdatePayrollStatusRequest,
};
use super::response::{ApiError, ApiErrorResponse, ApiSuccess};
use super::state::AppState;

type ApiResult<T> = Result<ApiSuccess<T>, ApiErrorResponse>;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/attendance/clock-in", post(clock_in_handler))
        .route("/attendance/start-break", post(start_break_handler))
        .route("/attendance/end-break", post(end_break_handler))
        .route("/attendance/clock-out", post(clock_out_handler))
        .route("/attendance/entries", get(list_entries_handler))
        .route(
            "/attendance/entries/:id",
            get(get_entry_handler).delete(delete_entry_handler),
        )
        .route("/attendance/current/:employee_id", get(current_session_handler))
        .route("/attendance/summary/:employee_id", get(summary_handler))
        .route("/leave/types", get(leave_types_handler))
        .route(
            "/leave/requests",
            post(submit_leave_handler).get(list_leave_handler),
        )
        .route(
            "/leave/requests/:id",
            get(get_leave_handler).delete(delete_leave_handler),
        )
        .route("/leave/requests/:id/finalize", post(finalize_leave_handler))
        .route("/leave/balances", put(grant_balance_handler))
        .route(
            "/leave/balances/:employee_id/:leave_type/:year",
            get(get_balance_handler),
        )
        .route("/payroll/net-pay", post(net_pay_handler))
        .route(
            "/payroll/records",
            post(create_payroll_handler).get(list_payroll_handler),
        )
        .route("/payroll/records/:id", get(get_payroll_handler))
        .route("/payroll/records/:id/status", put(update_payroll_status_handler))
        .with_state(state)
}

/// Unwraps a JSON body, logging why it was rejected.
fn json_body<T>(
    correlation_id: Uuid,
    payload: Result<Json<T>, JsonRejection>,
) -> Result<T, ApiErrorResponse> {
    payload.map(|Json(body)| body).map_err(|rejection| {
        warn!(
            correlation_id = %correlation_id,
            error = %rejection.body_text(),
            "Rejected request body"
        );
        rejection.into()
    })
}

/// Maps a path or query rejection to a validation error.
fn rejected(correlation_id: Uuid, rejection: impl Display) -> ApiErrorResponse {
    warn!(
        correlation_id = %correlation_id,
        error = %rejection,
        "Rejected request parameters"
    );
    ApiErrorResponse::bad_request(ApiError::validation_error(rejection.to_string()))
}

fn path<T>(
    correlation_id: Uuid,
    extracted: Result<Path<T>, PathRejection>,
) -> Result<T, ApiErrorResponse> {
    extracted
        .map(|Path(value)| value)
        .map_err(|rejection| rejected(correlation_id, rejection))
}

fn query<T>(
    correlation_id: Uuid,
    extracted: Result<Query<T>, QueryRejection>,
) -> Result<T, ApiErrorResponse> {
    extracted
        .map(|Query(value)| value)
        .map_err(|rejection| rejected(correlation_id, rejection))
}

/// Wraps an engine result in the response envelope, logging the outcome.
fn finish<T>(
    correlation_id: Uuid,
    operation: &'static str,
    status: StatusCode,
    result: EngineResult<T>,
) -> ApiResult<T> {
    match result {
        Ok(data) => {
            info!(correlation_id = %correlation_id, operation, "Request completed");
            Ok(ApiSuccess { status, data })
        }
        Err(err) => {
            warn!(
                correlation_id = %correlation_id,
                operation,
                error = %err,
                "Request failed"
            );
            Err(err.into())
        }
    }
}

/// Handler for GET /health.
async fn health_handler(State(state): State<AppState>) -> ApiSuccess<Value> {
    ApiSuccess {
        status: StatusCode::OK,
        data: json!({
            "status": "ok",
            "leave_types": state.config().leave_types().len(),
        }),
    }
}

/// Handler for POST /attendance/clock-in.
async fn clock_in_handler(
    State(state): State<AppState>,
    payload: Result<Json<ClockInRequest>, JsonRejection>,
) -> ApiResult<TimeEntry> {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing clock-in request");

    let request = json_body(correlation_id, payload)?;
    let result = state.attendance().clock_in(
        &request.employee_id,
        request.location,
        request.notes,
        Utc::now(),
    );
    finish(correlation_id, "clock_in", StatusCode::CREATED, result)
}

/// Handler for POST /attendance/start-break.
async fn start_break_handler(
    State(state): State<AppState>,
    payload: Result<Json<EmployeeActionRequest>, JsonRejection>,
) -> ApiResult<TimeEntry> {
    let correlation_id = Uuid::new_v4();
    let request = json_body(correlation_id, payload)?;
    let result = state.attendance().start_break(&request.employee_id, Utc::now());
    finish(correlation_id, "start_break", StatusCode::OK, result)
}

/// Handler for POST /attendance/end-break.
async fn end_break_handler(
    State(state): State<AppState>,
    payload: Result<Json<EmployeeActionRequest>, JsonRejection>,
) -> ApiResult<TimeEntry> {
    let correlation_id = Uuid::new_v4();
    let request = json_body(correlation_id, payload)?;
    let result = state.attendance().end_break(&request.employee_id, Utc::now());
    finish(correlation_id, "end_break", StatusCode::OK, result)
}

/// Handler for POST /attendance/clock-out.
async fn clock_out_handler(
    State(state): State<AppState>,
    payload: Result<Json<EmployeeActionRequest>, JsonRejection>,
) -> ApiResult<TimeEntry> {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing clock-out request");

    let request = json_body(correlation_id, payload)?;
    let result = state.attendance().clock_out(&request.employee_id, Utc::now());
    finish(correlation_id, "clock_out", StatusCode::OK, result)
}

/// Handler for GET /attendance/entries.
async fn list_entries_handler(
    State(state): State<AppState>,
    filter: Result<Query<TimeEntryFilter>, QueryRejection>,
) -> ApiResult<Vec<TimeEntry>> {
    let correlation_id = Uuid::new_v4();
    let filter = query(correlation_id, filter)?;
    let result = state.attendance().list_entries(&filter);
    finish(correlation_id, "list_entries", StatusCode::OK, result)
}

/// Handler for GET /attendance/entries/:id.
async fn get_entry_handler(
    State(state): State<AppState>,
    id: Result<Path<Uuid>, PathRejection>,
) -> ApiResult<TimeEntry> {
    let correlation_id = Uuid::new_v4();
    let id = path(correlation_id, id)?;
    finish(correlation_id, "get_entry", StatusCode::OK, state.attendance().get_entry(id))
}

/// Handler for DELETE /attendance/entries/:id.
async fn delete_entry_handler(
    State(state): State<AppState>,
    id: Result<Path<Uuid>, PathRejection>,
) -> ApiResult<TimeEntry> {
    let correlation_id = Uuid::new_v4();
    let id = path(correlation_id, id)?;
    let result = state.attendance().delete_entry(id);
    finish(correlation_id, "delete_entry", StatusCode::OK, result)
}

/// Handler for GET /attendance/current/:employee_id.
///
/// `data` is null when the employee has no open session.
async fn current_session_handler(
    State(state): State<AppState>,
    employee_id: Result<Path<String>, PathRejection>,
) -> ApiResult<Option<CurrentSession>> {
    let correlation_id = Uuid::new_v4();
    let employee_id = path(correlation_id, employee_id)?;
    let result = state.attendance().current_session(&employee_id, Utc::now());
    finish(correlation_id, "current_session", StatusCode::OK, result)
}

/// Handler for GET /attendance/summary/:employee_id.
async fn summary_handler(
    State(state): State<AppState>,
    employee_id: Result<Path<String>, PathRejection>,
    range: Result<Query<DateRangeQuery>, QueryRejection>,
) -> ApiResult<AttendanceSummary> {
    let correlation_id = Uuid::new_v4();
    let employee_id = path(correlation_id, employee_id)?;
    let range = query(correlation_id, range)?;
    let result = state.attendance().summarize(&employee_id, range.from, range.to);
    finish(correlation_id, "summary", StatusCode::OK, result)
}

/// Handler for GET /leave/types.
async fn leave_types_handler(State(state): State<AppState>) -> ApiSuccess<Vec<LeaveType>> {
    ApiSuccess {
        status: StatusCode::OK,
        data: state.ledger().leave_types().to_vec(),
    }
}

/// Handler for POST /leave/requests.
async fn submit_leave_handler(
    State(state): State<AppState>,
    payload: Result<Json<SubmitLeaveRequest>, JsonRejection>,
) -> ApiResult<LeaveRequest> {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing leave submission");

    let request = json_body(correlation_id, payload)?;
    let result = state.leave().submit(
        &request.employee_id,
        &request.leave_type,
        request.start_date,
        request.end_date,
        &request.reason,
        Utc::now(),
    );
    finish(correlation_id, "submit_leave", StatusCode::CREATED, result)
}

/// Handler for POST /leave/requests/:id/finalize.
async fn finalize_leave_handler(
    State(state): State<AppState>,
    id: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<FinalizeLeaveRequest>, JsonRejection>,
) -> ApiResult<LeaveRequest> {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing leave finalization");

    let id = path(correlation_id, id)?;
    let request = json_body(correlation_id, payload)?;
    let result = state.leave().finalize(
        id,
        request.decision,
        &request.approved_by,
        request.admin_notes,
        Utc::now(),
    );
    finish(correlation_id, "finalize_leave", StatusCode::OK, result)
}

/// Handler for GET /leave/requests.
async fn list_leave_handler(
    State(state): State<AppState>,
    filter: Result<Query<LeaveRequestFilter>, QueryRejection>,
) -> ApiResult<Vec<LeaveRequest>> {
    let correlation_id = Uuid::new_v4();
    let filter = query(correlation_id, filter)?;
    let result = state.leave().list_requests(&filter);
    finish(correlation_id, "list_leave", StatusCode::OK, result)
}

/// Handler for GET /leave/requests/:id.
async fn get_leave_handler(
    State(state): State<AppState>,
    id: Result<Path<Uuid>, PathRejection>,
) -> ApiResult<LeaveRequest> {
    let correlation_id = Uuid::new_v4();
    let id = path(correlation_id, id)?;
    finish(correlation_id, "get_leave", StatusCode::OK, state.leave().get_request(id))
}

/// Handler for DELETE /leave/requests/:id.
async fn delete_leave_handler(
    State(state): State<AppState>,
    id: Result<Path<Uuid>, PathRejection>,
) -> ApiResult<LeaveRequest> {
    let correlation_id = Uuid::new_v4();
    let id = path(correlation_id, id)?;
    finish(correlation_id, "delete_leave", StatusCode::OK, state.leave().delete(id))
}

/// Handler for PUT /leave/balances.
async fn grant_balance_handler(
    State(state): State<AppState>,
    payload: Result<Json<GrantBalanceRequest>, JsonRejection>,
) -> ApiResult<LeaveBalance> {
    let correlation_id = Uuid::new_v4();
    let request = json_body(correlation_id, payload)?;
    let result = state.ledger().grant(
        &request.employee_id,
        &request.leave_type,
        request.year,
        request.total_days,
    );
    finish(correlation_id, "grant_balance", StatusCode::OK, result)
}

/// Handler for GET /leave/balances/:employee_id/:leave_type/:year.
async fn get_balance_handler(
    State(state): State<AppState>,
    key: Result<Path<(String, String, i32)>, PathRejection>,
) -> ApiResult<LeaveBalance> {
    let correlation_id = Uuid::new_v4();
    let (employee_id, leave_type, year) = path(correlation_id, key)?;
    let result = state.ledger().get_balance(&employee_id, &leave_type, year);
    finish(correlation_id, "get_balance", StatusCode::OK, result)
}

/// Handler for POST /payroll/net-pay.
async fn net_pay_handler(
    payload: Result<Json<NetPayRequest>, JsonRejection>,
) -> ApiResult<NetPayResponse> {
    let correlation_id = Uuid::new_v4();
    let request = json_body(correlation_id, payload)?;
    let result = net_pay(
        request.gross_pay,
        request.overtime_pay,
        request.bonus,
        request.deductions,
    )
    .map(|net_pay| NetPayResponse { net_pay });
    finish(correlation_id, "net_pay", StatusCode::OK, result)
}

/// Handler for POST /payroll/records.
async fn create_payroll_handler(
    State(state): State<AppState>,
    payload: Result<Json<PayrollRecordInput>, JsonRejection>,
) -> ApiResult<PayrollRecord> {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing payroll record");

    let input = json_body(correlation_id, payload)?;
    let result = state.payroll().create_record(input, Utc::now());
    finish(correlation_id, "create_payroll", StatusCode::CREATED, result)
}

/// Handler for GET /payroll/records.
async fn list_payroll_handler(
    State(state): State<AppState>,
    filter: Result<Query<PayrollListQuery>, QueryRejection>,
) -> ApiResult<Vec<PayrollRecord>> {
    let correlation_id = Uuid::new_v4();
    let filter = query(correlation_id, filter)?;
    let result = state.payroll().list_records(filter.employee_id.as_deref());
    finish(correlation_id, "list_payroll", StatusCode::OK, result)
}

/// Handler for GET /payroll/records/:id.
async fn get_payroll_handler(
    State(state): State<AppState>,
    id: Result<Path<Uuid>, PathRejection>,
) -> ApiResult<PayrollRecord> {
    let correlation_id = Uuid::new_v4();
    let id = path(correlation_id, id)?;
    finish(correlation_id, "get_payroll", StatusCode::OK, state.payroll().get_record(id))
}

/// Handler for PUT /payroll/records/:id/status.
async fn update_payroll_status_handler(
    State(state): State<AppState>,
    id: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<UpdatePayrollStatusRequest>, JsonRejection>,
) -> ApiResult<PayrollRecord> {
    let correlation_id = Uuid::new_v4();
    let id = path(correlation_id, id)?;
    let request = json_body(correlation_id, payload)?;
    let result = state.payroll().update_status(id, request.status);
    finish(correlation_id, "update_payroll_status", StatusCode::OK, result)
}
