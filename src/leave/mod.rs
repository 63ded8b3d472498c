//! Leave accounting: the entitlement ledger and the request workflow.
//!
//! The ledger stores granted entitlement only; usage is always derived from
//! approved requests. The workflow is the only writer of request status and
//! performs every status change inside the ledger's write guard.

mod ledger;
mod workflow;

pub use ledger::LeaveLedger;
pub use workflow::{LeaveRequestFilter, LeaveRequestWorkflow};
