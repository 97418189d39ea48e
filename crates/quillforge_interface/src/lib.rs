//! Trait seams and domain value types for the Quillforge content engine.
//!
//! This crate defines the boundary between the engine and everything it
//! does not own: the upstream text-generation provider ([`TextCompletion`]),
//! the style pipeline ([`StyleGuidanceSource`]), subscription data
//! ([`PlanSource`]), and persistence ([`ContentStore`], [`UsageStore`]).
//! The value types here are the currency all engine crates trade in.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod edit;
mod filter;
mod revision;
mod traits;
mod usage_entry;

pub use edit::{EditRecord, NewEditRecord};
pub use filter::{ContentFilter, MetadataUpdate};
pub use revision::{ContentRevision, NewContentRevision};
pub use traits::{
    Completion, ContentStore, PlanSource, StyleGuidanceSource, TextCompletion, UsageStore,
};
pub use usage_entry::{DailyUsage, NewUsageEntry, UsageEntry, UsageTotals};
