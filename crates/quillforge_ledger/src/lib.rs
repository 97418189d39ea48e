//! Usage ledger for the Quillforge content engine.
//!
//! Records every metered operation with a pricing snapshot, aggregates
//! daily and monthly totals, and gates new work against plan limits with
//! graded warnings. Only durably recorded usage counts against a limit.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod ledger;
mod memory;

pub use ledger::{GateDecision, UsageAnalytics, UsageLedger, UsageWarning};
pub use memory::InMemoryUsageStore;
