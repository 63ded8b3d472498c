//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading portal
//! configuration from YAML files.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use crate::error::{EngineError, EngineResult};
use crate::models::LeaveType;

use super::types::{LeaveTypesConfig, NetPayPolicy, PortalConfig, PortalSettings};

/// Environment variable naming the configuration directory.
pub const CONFIG_DIR_ENV: &str = "PORTAL_CONFIG_DIR";

/// Environment variable overriding the server bind address.
pub const BIND_ADDR_ENV: &str = "PORTAL_BIND_ADDR";

/// Configuration directory used when [`CONFIG_DIR_ENV`] is unset.
pub const DEFAULT_CONFIG_DIR: &str = "./config/portal";

/// Loads and provides access to portal configuration.
///
/// # Directory Structure
///
/// ```text
/// config/portal/
/// ├── portal.yaml       # Server and payroll settings
/// └── leave_types.yaml  # Leave type reference data
/// ```
///
/// # Example
///
/// ```no_run
/// use employee_portal::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/portal").unwrap();
/// for leave_type in loader.leave_types() {
///     println!("{}: {} days", leave_type.name, leave_type.max_days_per_year);
/// }
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config: PortalConfig,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// Returns an error if either file is missing or contains invalid YAML,
    /// or if a leave type name is empty or repeated.
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();

        let portal_path = path.join("portal.yaml");
        let settings = Self::load_yaml::<PortalSettings>(&portal_path)?;

        let leave_types_path = path.join("leave_types.yaml");
        let leave_types = Self::load_yaml::<LeaveTypesConfig>(&leave_types_path)?.leave_types;
        Self::check_leave_types(&leave_types_path, &leave_types)?;

        Ok(Self {
            config: PortalConfig::new(settings, leave_types),
        })
    }

    /// Loads the directory named by `PORTAL_CONFIG_DIR` (or the default),
    /// then applies the `PORTAL_BIND_ADDR` override.
    pub fn from_env() -> EngineResult<Self> {
        let dir = std::env::var(CONFIG_DIR_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_DIR.to_string());
        let mut loader = Self::load(dir)?;

        if let Ok(addr) = std::env::var(BIND_ADDR_ENV) {
            loader.config.server_mut().bind_addr = addr;
        }

        Ok(loader)
    }

    /// Wraps an already-built configuration.
    pub fn from_config(config: PortalConfig) -> Self {
        Self { config }
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    fn check_leave_types(path: &Path, leave_types: &[LeaveType]) -> EngineResult<()> {
        let mut seen = HashSet::new();
        for leave_type in leave_types {
            let message = if leave_type.name.trim().is_empty() {
                "leave type name must not be empty".to_string()
            } else if !seen.insert(leave_type.name.as_str()) {
                format!("duplicate leave type '{}'", leave_type.name)
            } else {
                continue;
            };
            return Err(EngineError::ConfigParseError {
                path: path.display().to_string(),
                message,
            });
        }
        Ok(())
    }

    /// Returns the underlying portal configuration.
    pub fn config(&self) -> &PortalConfig {
        &self.config
    }

    /// Returns the address the HTTP server should bind to.
    pub fn bind_addr(&self) -> &str {
        &self.config.server().bind_addr
    }

    /// Returns the payroll net pay policy.
    pub fn net_pay_policy(&self) -> NetPayPolicy {
        self.config.payroll().net_pay_policy
    }

    /// Returns the currency used when a payroll record names none.
    pub fn default_currency(&self) -> &str {
        &self.config.payroll().default_currency
    }

    /// Returns the configured leave types in file order.
    pub fn leave_types(&self) -> &[LeaveType] {
        self.config.leave_types()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_path() -> &'static str {
        "./config/portal"
    }

    #[test]
    fn test_load_valid_configuration() {
        let result = ConfigLoader::load(config_path());
        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());

        let loader = result.unwrap();
        assert_eq!(loader.bind_addr(), "127.0.0.1:8080");
        assert_eq!(loader.default_currency(), "USD");
        assert_eq!(loader.net_pay_policy(), NetPayPolicy::Enforce);
    }

    #[test]
    fn test_leave_types_loaded_in_file_order() {
        let loader = ConfigLoader::load(config_path()).unwrap();

        let names: Vec<&str> = loader.leave_types().iter().map(|lt| lt.name.as_str()).collect();
        assert_eq!(names, vec!["annual", "sick", "personal", "parental"]);

        let annual = &loader.leave_types()[0];
        assert_eq!(annual.max_days_per_year, 20);
        assert!(annual.carry_forward);
        assert!(!loader.leave_types()[1].carry_forward);
    }

    #[test]
    fn test_load_missing_directory_returns_error() {
        match ConfigLoader::load("/nonexistent/path") {
            Err(EngineError::ConfigNotFound { path }) => {
                assert!(path.contains("portal.yaml"));
            }
            other => panic!("Expected ConfigNotFound error, got {:?}", other),
        }
    }

    #[test]
    fn test_duplicate_leave_types_rejected() {
        let leave_types = vec![
            LeaveType {
                name: "annual".to_string(),
                max_days_per_year: 20,
                carry_forward: true,
            },
            LeaveType {
                name: "annual".to_string(),
                max_days_per_year: 10,
                carry_forward: false,
            },
        ];

        let result = ConfigLoader::check_leave_types(Path::new("leave_types.yaml"), &leave_types);
        assert!(matches!(result, Err(EngineError::ConfigParseError { .. })));
    }

    #[test]
    fn test_suggest_policy_parses() {
        let settings: PortalSettings =
            serde_yaml::from_str("payroll:\n  net_pay_policy: suggest\n").unwrap();
        assert_eq!(settings.payroll.net_pay_policy, NetPayPolicy::Suggest);
        assert_eq!(settings.payroll.default_currency, "USD");
        assert_eq!(settings.server.bind_addr, "127.0.0.1:8080");
    }
}
