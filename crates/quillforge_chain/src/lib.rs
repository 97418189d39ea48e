//! Version chain manager for the Quillforge content engine.
//!
//! A lineage is an immutable chain of content revisions. This crate owns
//! the chain invariants: versions start at 1 and increment by exactly one,
//! exactly one revision per lineage is current, and every accepted edit
//! appends atomically with an optimistic check so concurrent editors can
//! never fork the chain.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod chain;
mod memory;

pub use chain::{EditSeed, LineageExport, LineageSeed, VersionChain};
pub use memory::InMemoryContentStore;
