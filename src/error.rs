//! Error types for the employee portal core.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for every outcome an attendance, leave or payroll operation can reject with.

use rust_decimal::Decimal;
use thiserror::Error;

/// The main error type for the employee portal core.
///
/// Every variant except [`EngineError::Internal`] and the configuration
/// variants is an expected, recoverable outcome that callers should resurface
/// to the user.
///
/// # Example
///
/// ```
/// use employee_portal::error::EngineError;
///
/// let error = EngineError::Conflict {
///     message: "employee 'emp_001' is already clocked in".to_string(),
/// };
/// assert_eq!(
///     error.to_string(),
///     "Conflict: employee 'emp_001' is already clocked in"
/// );
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// Input was malformed, e.g. an end date before a start date.
    #[error("Invalid value for '{field}': {message}")]
    Validation {
        /// The offending field.
        field: String,
        /// What was wrong with it.
        message: String,
    },

    /// The requested transition is not legal from the current state.
    #[error("Conflict: {message}")]
    Conflict {
        /// A description of the conflicting state.
        message: String,
    },

    /// Requested leave days exceed the remaining entitlement.
    #[error(
        "Insufficient {leave_type} balance for '{employee_id}' in {year}: requested {requested}, remaining {remaining}"
    )]
    InsufficientBalance {
        /// The employee whose balance was checked.
        employee_id: String,
        /// The leave type.
        leave_type: String,
        /// The leave year.
        year: i32,
        /// Days requested.
        requested: Decimal,
        /// Days remaining at the time of the check.
        remaining: Decimal,
    },

    /// No record exists with the given identifier.
    #[error("{entity} not found: {id}")]
    NotFound {
        /// The kind of record, e.g. "Time entry".
        entity: String,
        /// The identifier that was looked up.
        id: String,
    },

    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// The system itself failed, independent of the request.
    #[error("Internal error: {message}")]
    Internal {
        /// A description of the failure.
        message: String,
    },
}

impl EngineError {
    /// Shorthand for a [`EngineError::Validation`].
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        EngineError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Shorthand for a [`EngineError::Conflict`].
    pub fn conflict(message: impl Into<String>) -> Self {
        EngineError::Conflict {
            message: message.into(),
        }
    }

    /// Shorthand for a [`EngineError::NotFound`].
    pub fn not_found(entity: impl Into<String>, id: impl ToString) -> Self {
        EngineError::NotFound {
            entity: entity.into(),
            id: id.to_string(),
        }
    }

    /// Error reported when a storage lock was poisoned by a panicking writer.
    pub(crate) fn poisoned(table: &str) -> Self {
        EngineError::Internal {
            message: format!("{} lock poisoned", table),
        }
    }
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
