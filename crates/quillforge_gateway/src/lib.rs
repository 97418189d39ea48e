//! Generation gateway for the Quillforge content engine.
//!
//! Every upstream call funnels through [`GenerationGateway`]: it assembles
//! the prompt, applies jittered exponential backoff to transient provider
//! failures, prices the reported token usage, and computes text metrics
//! and diffs on the way out. [`extract_json`] handles providers that wrap
//! structured output in prose or code fences.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod extraction;
mod gateway;

pub use extraction::{extract_json, parse_json};
pub use gateway::{Edited, Generated, GenerationGateway};
