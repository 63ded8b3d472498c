//! Payroll record storage with net pay validation.

use std::collections::HashMap;
use std::sync::RwLock;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::calculation::net_pay;
use crate::config::NetPayPolicy;
use crate::error::{EngineError, EngineResult};
use crate::events::{EventBus, PortalEvent};
use crate::models::{PayrollRecord, PayrollStatus};

const TABLE: &str = "payroll records";

/// Fields an admin supplies to create a payroll record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayrollRecordInput {
    /// The employee being paid.
    pub employee_id: String,
    /// First day of the pay period.
    pub pay_period_start: NaiveDate,
    /// Last day of the pay period.
    pub pay_period_end: NaiveDate,
    /// Gross pay.
    pub gross_pay: Decimal,
    /// Total deductions.
    #[serde(default)]
    pub deductions: Decimal,
    /// Overtime hours.
    #[serde(default)]
    pub overtime_hours: Decimal,
    /// Overtime pay.
    #[serde(default)]
    pub overtime_pay: Decimal,
    /// Bonus.
    #[serde(default)]
    pub bonus: Decimal,
    /// Manually entered net pay; computed when omitted.
    #[serde(default)]
    pub net_pay: Option<Decimal>,
    /// Initial status; `pending` when omitted.
    #[serde(default)]
    pub status: Option<PayrollStatus>,
    /// Currency code; the configured default when omitted.
    #[serde(default)]
    pub currency: Option<String>,
}

/// Stores payroll records and keeps their net pay consistent.
#[derive(Debug)]
pub struct PayrollRegister {
    records: RwLock<HashMap<Uuid, PayrollRecord>>,
    policy: NetPayPolicy,
    default_currency: String,
    events: EventBus,
}

impl PayrollRegister {
    /// Creates an empty register.
    pub fn new(policy: NetPayPolicy, default_currency: impl Into<String>, events: EventBus) -> Self {
        Self {
            records: RwLock::new(HashMap::new()),
            policy,
            default_currency: default_currency.into(),
            events,
        }
    }

    /// Validates and stores a new record.
    ///
    /// A supplied `net_pay` that disagrees with the components is rejected
    /// under [`NetPayPolicy::Enforce`] and kept with a warning under
    /// [`NetPayPolicy::Suggest`].
    pub fn create_record(
        &self,
        input: PayrollRecordInput,
        now: DateTime<Utc>,
    ) -> EngineResult<PayrollRecord> {
        validate(&input)?;

        let computed = net_pay(
            input.gross_pay,
            input.overtime_pay,
            input.bonus,
            input.deductions,
        )?;
        let net = match input.net_pay {
            Some(entered) if entered != computed => match self.policy {
                NetPayPolicy::Enforce => {
                    return Err(EngineError::validation(
                        "net_pay",
                        format!("{} does not match computed net pay {}", entered, computed),
                    ));
                }
                NetPayPolicy::Suggest => {
                    warn!(
                        employee_id = %input.employee_id,
                        entered = %entered,
                        computed = %computed,
                        "Storing net pay that differs from computed value"
                    );
                    entered
                }
            },
            Some(entered) => entered,
            None => computed,
        };

        let record = PayrollRecord {
            id: Uuid::new_v4(),
            employee_id: input.employee_id,
            pay_period_start: input.pay_period_start,
            pay_period_end: input.pay_period_end,
            gross_pay: input.gross_pay,
            deductions: input.deductions,
            overtime_hours: input.overtime_hours,
            overtime_pay: input.overtime_pay,
            bonus: input.bonus,
            net_pay: net,
            status: input.status.unwrap_or(PayrollStatus::Pending),
            currency: input
                .currency
                .unwrap_or_else(|| self.default_currency.clone()),
            created_at: now,
        };

        self.records
            .write()
            .map_err(|_| EngineError::poisoned(TABLE))?
            .insert(record.id, record.clone());

        info!(
            record_id = %record.id,
            employee_id = %record.employee_id,
            net_pay = %record.net_pay,
            "Payroll record created"
        );
        self.announce(&record);
        Ok(record)
    }

    /// Sets a record's status. Any status may follow any other.
    pub fn update_status(&self, id: Uuid, status: PayrollStatus) -> EngineResult<PayrollRecord> {
        let record = {
            let mut records = self.records.write().map_err(|_| EngineError::poisoned(TABLE))?;
            let record = records
                .get_mut(&id)
                .ok_or_else(|| EngineError::not_found("Payroll record", id))?;
            record.status = status;
            record.clone()
        };

        info!(record_id = %id, status = ?status, "Payroll status updated");
        self.announce(&record);
        Ok(record)
    }

    /// Gets a record by id.
    pub fn get_record(&self, id: Uuid) -> EngineResult<PayrollRecord> {
        self.records
            .read()
            .map_err(|_| EngineError::poisoned(TABLE))?
            .get(&id)
            .cloned()
            .ok_or_else(|| EngineError::not_found("Payroll record", id))
    }

    /// Lists records, optionally for one employee, by pay period.
    pub fn list_records(&self, employee_id: Option<&str>) -> EngineResult<Vec<PayrollRecord>> {
        let mut records: Vec<PayrollRecord> = self
            .records
            .read()
            .map_err(|_| EngineError::poisoned(TABLE))?
            .values()
            .filter(|record| employee_id.is_none_or(|id| record.employee_id == id))
            .cloned()
            .collect();
        records.sort_by_key(|record| (record.pay_period_start, record.created_at));
        Ok(records)
    }

    fn announce(&self, record: &PayrollRecord) {
        self.events.publish(PortalEvent::PayrollRecordChanged {
            record_id: record.id,
            employee_id: record.employee_id.clone(),
            status: record.status,
        });
    }
}

fn validate(input: &PayrollRecordInput) -> EngineResult<()> {
    if input.employee_id.trim().is_empty() {
        return Err(EngineError::validation("employee_id", "must not be empty"));
    }
    if input.pay_period_end < input.pay_period_start {
        return Err(EngineError::validation(
            "pay_period_end",
            format!(
                "pay period end {} is before its start {}",
                input.pay_period_end, input.pay_period_start
            ),
        ));
    }
    let components = [
        ("gross_pay", input.gross_pay),
        ("deductions", input.deductions),
        ("overtime_hours", input.overtime_hours),
        ("overtime_pay", input.overtime_pay),
        ("bonus", input.bonus),
    ];
    for (field, value) in components {
        if value < Decimal::ZERO {
            return Err(EngineError::validation(field, "must not be negative"));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn decimal(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn input() -> PayrollRecordInput {
        PayrollRecordInput {
            employee_id: "emp_001".to_string(),
            pay_period_start: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
            pay_period_end: NaiveDate::from_ymd_opt(2026, 1, 31).unwrap(),
            gross_pay: decimal("5000"),
            deductions: decimal("300"),
            overtime_hours: decimal("4"),
            overtime_pay: decimal("200"),
            bonus: decimal("100"),
            net_pay: None,
            status: None,
            currency: None,
        }
    }

    fn register(policy: NetPayPolicy) -> PayrollRegister {
        PayrollRegister::new(policy, "USD", EventBus::default())
    }

    #[test]
    fn test_net_pay_filled_when_omitted() {
        let record = register(NetPayPolicy::Enforce)
            .create_record(input(), Utc::now())
            .unwrap();
        assert_eq!(record.net_pay, decimal("5000"));
        assert_eq!(record.status, PayrollStatus::Pending);
        assert_eq!(record.currency, "USD");
    }

    #[test]
    fn test_matching_net_pay_accepted() {
        let mut input = input();
        input.net_pay = Some(decimal("5000.00"));
        assert!(register(NetPayPolicy::Enforce).create_record(input, Utc::now()).is_ok());
    }

    #[test]
    fn test_divergent_net_pay_rejected_when_enforced() {
        let register = register(NetPayPolicy::Enforce);
        let mut input = input();
        input.net_pay = Some(decimal("5100"));

        match register.create_record(input, Utc::now()) {
            Err(EngineError::Validation { field, .. }) => assert_eq!(field, "net_pay"),
            other => panic!("Expected Validation error, got {:?}", other),
        }
        assert!(register.list_records(None).unwrap().is_empty());
    }

    #[test]
    fn test_divergent_net_pay_kept_when_suggested() {
        let mut input = input();
        input.net_pay = Some(decimal("5100"));
        let record = register(NetPayPolicy::Suggest)
            .create_record(input, Utc::now())
            .unwrap();
        assert_eq!(record.net_pay, decimal("5100"));
    }

    #[test]
    fn test_inverted_pay_period_rejected() {
        let mut input = input();
        input.pay_period_end = NaiveDate::from_ymd_opt(2025, 12, 31).unwrap();
        assert!(matches!(
            register(NetPayPolicy::Enforce).create_record(input, Utc::now()),
            Err(EngineError::Validation { .. })
        ));
    }

    #[test]
    fn test_negative_component_rejected() {
        let mut input = input();
        input.bonus = decimal("-1");
        match register(NetPayPolicy::Enforce).create_record(input, Utc::now()) {
            Err(EngineError::Validation { field, .. }) => assert_eq!(field, "bonus"),
            other => panic!("Expected Validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_out_of_range_components_rejected() {
        let register = register(NetPayPolicy::Enforce);
        let mut input = input();
        input.gross_pay = Decimal::MAX;
        input.deductions = Decimal::ZERO;

        match register.create_record(input, Utc::now()) {
            Err(EngineError::Validation { field, .. }) => assert_eq!(field, "net_pay"),
            other => panic!("Expected Validation error, got {:?}", other),
        }
        assert!(register.list_records(None).unwrap().is_empty());
    }

    #[test]
    fn test_status_can_move_freely() {
        let register = register(NetPayPolicy::Enforce);
        let record = register.create_record(input(), Utc::now()).unwrap();

        register.update_status(record.id, PayrollStatus::Paid).unwrap();
        let reverted = register.update_status(record.id, PayrollStatus::Processing).unwrap();
        assert_eq!(reverted.status, PayrollStatus::Processing);
        assert_eq!(register.get_record(record.id).unwrap().status, PayrollStatus::Processing);
    }

    #[test]
    fn test_update_unknown_is_not_found() {
        assert!(matches!(
            register(NetPayPolicy::Enforce).update_status(Uuid::new_v4(), PayrollStatus::Paid),
            Err(EngineError::NotFound { .. })
        ));
    }

    #[test]
    fn test_list_by_employee() {
        let register = register(NetPayPolicy::Enforce);
        register.create_record(input(), Utc::now()).unwrap();
        let mut other = input();
        other.employee_id = "emp_002".to_string();
        register.create_record(other, Utc::now()).unwrap();

        assert_eq!(register.list_records(None).unwrap().len(), 2);
        assert_eq!(register.list_records(Some("emp_002")).unwrap().len(), 1);
    }
}
