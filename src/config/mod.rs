//! Configuration loading and management for the employee portal.
//!
//! This module loads server settings, payroll policy and the leave type
//! reference data from a directory of YAML files.
//!
//! # Example
//!
//! ```no_run
//! use employee_portal::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/portal").unwrap();
//! println!("Listening on {}", config.bind_addr());
//! ```

mod loader;
mod types;

pub use loader::{BIND_ADDR_ENV, CONFIG_DIR_ENV, ConfigLoader, DEFAULT_CONFIG_DIR};
pub use types::{
    DEFAULT_BIND_ADDR, DEFAULT_CURRENCY, LeaveTypesConfig, NetPayPolicy, PayrollConfig,
    PortalConfig, PortalSettings, ServerConfig,
};
