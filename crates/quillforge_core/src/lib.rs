//! Core data types and pure text functions for the Quillforge content engine.
//!
//! This crate provides the leaf building blocks shared by every other
//! Quillforge crate: content metrics, structured diffs, token accounting,
//! content-type prompt templates, edit categories, plan limits, model
//! pricing, and the engine configuration.
//!
//! Everything here is deterministic and side-effect free.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod content_type;
mod diff;
mod edit_category;
mod metrics;
mod plan;
mod pricing;
mod status;
mod usage;
mod validate;

pub use config::{EngineConfig, RetryConfig};
pub use content_type::{ContentType, PromptSpec};
pub use diff::{ChangeType, TextDiff, text_diff};
pub use edit_category::EditCategory;
pub use metrics::{ContentMetrics, content_metrics};
pub use plan::{PlanLimits, PlanTier};
pub use pricing::{ModelPricing, PricingTable};
pub use status::{ContentStatus, OperationCategory, ServiceCategory, SuccessFlag};
pub use usage::TokenUsage;
pub use validate::{
    MAX_BODY_CHARS, MAX_BRIEF_CHARS, MAX_INSTRUCTION_CHARS, MAX_TITLE_CHARS, MIN_BODY_CHARS,
    MIN_BODY_WORDS, MIN_BRIEF_CHARS, MIN_TITLE_CHARS, validate_body, validate_brief,
    validate_instruction, validate_title,
};
