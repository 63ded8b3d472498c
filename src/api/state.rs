//! Application state for the employee portal API.
//!
//! This module defines the shared application state that is available
//! to all request handlers.

use std::sync::Arc;

use crate::attendance::AttendanceService;
use crate::config::ConfigLoader;
use crate::events::EventBus;
use crate::leave::{LeaveLedger, LeaveRequestWorkflow};
use crate::payroll::PayrollRegister;

/// Shared application state.
///
/// Every service publishes on the same event bus.
#[derive(Clone)]
pub struct AppState {
    config: Arc<ConfigLoader>,
    events: EventBus,
    attendance: Arc<AttendanceService>,
    leave: Arc<LeaveRequestWorkflow>,
    payroll: Arc<PayrollRegister>,
}

impl AppState {
    /// Creates the services described by `config`, all starting empty.
    pub fn new(config: ConfigLoader) -> Self {
        let events = EventBus::default();
        let ledger = Arc::new(LeaveLedger::new(
            config.leave_types().to_vec(),
            events.clone(),
        ));
        let payroll = PayrollRegister::new(
            config.net_pay_policy(),
            config.default_currency(),
            events.clone(),
        );

        Self {
            attendance: Arc::new(AttendanceService::new(events.clone())),
            leave: Arc::new(LeaveRequestWorkflow::new(ledger, events.clone())),
            payroll: Arc::new(payroll),
            config: Arc::new(config),
            events,
        }
    }

    /// Returns the configuration.
    pub fn config(&self) -> &ConfigLoader {
        &self.config
    }

    /// Returns the change notification bus.
    pub fn events(&self) -> &EventBus {
        &self.events
    }

    /// Returns the attendance service.
    pub fn attendance(&self) -> &AttendanceService {
        &self.attendance
    }

    /// Returns the leave request workflow.
    pub fn leave(&self) -> &LeaveRequestWorkflow {
        &self.leave
    }

    /// Returns the leave ledger.
    pub fn ledger(&self) -> &LeaveLedger {
        self.leave.ledger()
    }

    /// Returns the payroll register.
    pub fn payroll(&self) -> &PayrollRegister {
        &self.payroll
    }
}
