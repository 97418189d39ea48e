//! Quillforge: a content version-chain, diff, and usage-metering engine.
//!
//! The engine generates and edits long-form content through a pluggable
//! text-completion provider, keeps every piece of content as an immutable
//! chain of revisions, and meters every provider call against per-plan
//! usage limits. [`ContentOrchestrator`] is the front door; the building
//! blocks live in the `quillforge_*` crates and are re-exported here.
//!
//! # Example
//!
//! ```rust,ignore
//! use quillforge::{
//!     ContentOrchestrator, ContentType, EngineConfig, GenerateContentRequest,
//! };
//!
//! quillforge::telemetry::init_telemetry();
//! let config = EngineConfig::load()?;
//! let orchestrator =
//!     ContentOrchestrator::new(driver, content_store, usage_store, plans, styles, config);
//!
//! let generated = orchestrator
//!     .generate_content(
//!         organization_id,
//!         user_id,
//!         GenerateContentRequest {
//!             title: "Launch announcement".into(),
//!             brief: None,
//!             content_type: ContentType::PressRelease,
//!             style_profile_id: None,
//!             target_length: Some(400),
//!             additional_instructions: None,
//!             model: None,
//!             deadline: None,
//!         },
//!     )
//!     .await?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod orchestrator;
mod requests;
pub mod telemetry;

pub use orchestrator::ContentOrchestrator;
pub use requests::{
    EditContentRequest, EditedContent, GenerateContentRequest, GeneratedContent,
};

pub use quillforge_chain::{EditSeed, InMemoryContentStore, LineageExport, LineageSeed, VersionChain};
pub use quillforge_core::{
    ChangeType, ContentMetrics, ContentStatus, ContentType, EditCategory, EngineConfig,
    OperationCategory, PlanLimits, PlanTier, PricingTable, PromptSpec, RetryConfig,
    ServiceCategory, SuccessFlag, TextDiff, TokenUsage, content_metrics, text_diff,
};
pub use quillforge_error::{QuillforgeError, QuillforgeErrorKind, QuillforgeResult};
pub use quillforge_gateway::{Edited, Generated, GenerationGateway, extract_json, parse_json};
pub use quillforge_interface::{
    Completion, ContentFilter, ContentRevision, ContentStore, DailyUsage, EditRecord,
    MetadataUpdate, PlanSource, StyleGuidanceSource, TextCompletion, UsageEntry, UsageStore,
    UsageTotals,
};
pub use quillforge_ledger::{
    GateDecision, InMemoryUsageStore, UsageAnalytics, UsageLedger, UsageWarning,
};
