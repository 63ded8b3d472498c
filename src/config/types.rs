//! Configuration types for the employee portal.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from YAML configuration files.

use serde::Deserialize;

use crate::models::LeaveType;

/// Default address the HTTP server binds to.
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8080";

/// Default payroll currency.
pub const DEFAULT_CURRENCY: &str = "USD";

/// HTTP server settings.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Socket address to listen on.
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
        }
    }
}

fn default_bind_addr() -> String {
    DEFAULT_BIND_ADDR.to_string()
}

/// How a manually entered `net_pay` is treated when it disagrees with the
/// computed value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NetPayPolicy {
    /// Reject the record.
    #[default]
    Enforce,
    /// Store it anyway and log a warning.
    Suggest,
}

/// Payroll settings.
#[derive(Debug, Clone, Deserialize)]
pub struct PayrollConfig {
    /// Currency used when a record does not name one.
    #[serde(default = "default_currency")]
    pub default_currency: String,
    /// Treatment of divergent `net_pay` values.
    #[serde(default)]
    pub net_pay_policy: NetPayPolicy,
}

impl Default for PayrollConfig {
    fn default() -> Self {
        Self {
            default_currency: default_currency(),
            net_pay_policy: NetPayPolicy::default(),
        }
    }
}

fn default_currency() -> String {
    DEFAULT_CURRENCY.to_string()
}

/// Structure of `portal.yaml`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PortalSettings {
    /// Server settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Payroll settings.
    #[serde(default)]
    pub payroll: PayrollConfig,
}

/// Structure of `leave_types.yaml`.
#[derive(Debug, Clone, Deserialize)]
pub struct LeaveTypesConfig {
    /// The configured leave types.
    pub leave_types: Vec<LeaveType>,
}

/// The complete portal configuration loaded from YAML files.
#[derive(Debug, Clone)]
pub struct PortalConfig {
    settings: PortalSettings,
    leave_types: Vec<LeaveType>,
}

impl PortalConfig {
    /// Creates a new PortalConfig from its component parts.
    pub fn new(settings: PortalSettings, leave_types: Vec<LeaveType>) -> Self {
        Self {
            settings,
            leave_types,
        }
    }

    /// Returns the server settings.
    pub fn server(&self) -> &ServerConfig {
        &self.settings.server
    }

    /// Returns the payroll settings.
    pub fn payroll(&self) -> &PayrollConfig {
        &self.settings.payroll
    }

    /// Returns the configured leave types.
    pub fn leave_types(&self) -> &[LeaveType] {
        &self.leave_types
    }

    pub(crate) fn server_mut(&mut self) -> &mut ServerConfig {
        &mut self.settings.server
    }
}
