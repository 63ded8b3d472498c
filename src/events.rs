//! Change notifications for attendance, leave and payroll state.
//!
//! Every successful mutation publishes one [`PortalEvent`]. Subscribers are
//! optional: publishing with nobody listening is not an error, and a slow
//! subscriber only loses its own backlog.

use rust_decimal::Decimal;
use serde::Serialize;
use tokio::sync::broadcast;
use tracing::debug;
use uuid::Uuid;

use crate::models::{LeaveStatus, PayrollStatus, TimeEntryStatus};

/// Default number of events buffered per subscriber.
pub const DEFAULT_EVENT_CAPACITY: usize = 256;

/// A committed state change.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PortalEvent {
    /// A time entry moved to a new status.
    TimeEntryChanged {
        /// The entry.
        entry_id: Uuid,
        /// Its employee.
        employee_id: String,
        /// The status after the change.
        status: TimeEntryStatus,
    },
    /// An admin removed a time entry.
    TimeEntryDeleted {
        /// The removed entry.
        entry_id: Uuid,
        /// Its employee.
        employee_id: String,
    },
    /// A leave request was submitted or finalized.
    LeaveRequestChanged {
        /// The request.
        request_id: Uuid,
        /// Its employee.
        employee_id: String,
        /// The status after the change.
        status: LeaveStatus,
    },
    /// An admin removed a leave request.
    LeaveRequestDeleted {
        /// The removed request.
        request_id: Uuid,
        /// Its employee.
        employee_id: String,
        /// Days returned to the balance (zero unless it was approved).
        restored_days: Decimal,
    },
    /// An admin granted or changed an entitlement.
    LeaveBalanceGranted {
        /// The employee.
        employee_id: String,
        /// The leave type.
        leave_type: String,
        /// The leave year.
        year: i32,
        /// The new entitlement.
        total_days: Decimal,
    },
    /// A payroll record was created or its status changed.
    PayrollRecordChanged {
        /// The record.
        record_id: Uuid,
        /// Its employee.
        employee_id: String,
        /// The status after the change.
        status: PayrollStatus,
    },
}

/// Publish/subscribe hub shared by the services.
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<PortalEvent>,
}

impl EventBus {
    /// Creates a bus buffering up to `capacity` events per subscriber.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Registers a new subscriber that sees events published from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<PortalEvent> {
        self.sender.subscribe()
    }

    /// Publishes an event to all current subscribers.
    pub fn publish(&self, event: PortalEvent) {
        if self.sender.send(event).is_err() {
            debug!("No event subscribers");
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_EVENT_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subscriber_receives_published_event() {
        let bus = EventBus::default();
        let mut receiver = bus.subscribe();

        let event = PortalEvent::TimeEntryDeleted {
            entry_id: Uuid::new_v4(),
            employee_id: "emp_001".to_string(),
        };
        bus.publish(event.clone());

        assert_eq!(receiver.try_recv().unwrap(), event);
    }

    #[test]
    fn test_publish_without_subscribers_is_silent() {
        let bus = EventBus::new(4);
        bus.publish(PortalEvent::LeaveBalanceGranted {
            employee_id: "emp_001".to_string(),
            leave_type: "annual".to_string(),
            year: 2026,
            total_days: Decimal::new(20, 0),
        });
    }

    #[test]
    fn test_event_serializes_with_type_tag() {
        let event = PortalEvent::LeaveRequestChanged {
            request_id: Uuid::nil(),
            employee_id: "emp_001".to_string(),
            status: LeaveStatus::Approved,
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "leave_request_changed");
        assert_eq!(json["status"], "approved");
    }
}
