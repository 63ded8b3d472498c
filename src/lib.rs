//! Attendance and leave accounting core for an employee portal.
//!
//! This crate tracks clock-in, break and clock-out sessions, derives worked
//! hours, keeps per-employee leave entitlements consistent with approved
//! requests, and stores payroll records whose net pay follows from their
//! components. The [`api`] module exposes all of it over HTTP.

#![warn(missing_docs)]

pub mod api;
pub mod attendance;
pub mod calculation;
pub mod config;
pub mod error;
pub mod events;
pub mod leave;
pub mod models;
pub mod payroll;
