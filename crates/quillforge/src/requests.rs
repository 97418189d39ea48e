//! Request and result types for the orchestrator surface.

use quillforge_core::{ContentType, EditCategory};
use quillforge_interface::{ContentRevision, EditRecord, UsageEntry};
use quillforge_ledger::UsageWarning;
use std::time::Duration;
use uuid::Uuid;

/// A request to generate fresh content and start a new lineage.
#[derive(Debug, Clone)]
pub struct GenerateContentRequest {
    /// Content title, or the subject line for email content
    pub title: String,
    /// Optional brief or outline
    pub brief: Option<String>,
    /// Kind of content to produce
    pub content_type: ContentType,
    /// Style profile whose guidance should shape the output, if any
    pub style_profile_id: Option<Uuid>,
    /// Target word count; bounds come from the engine configuration
    pub target_length: Option<u32>,
    /// Free-form extra instructions appended to the prompt
    pub additional_instructions: Option<String>,
    /// Model override; the configured default when `None`
    pub model: Option<String>,
    /// Hard ceiling on the whole call including retries
    pub deadline: Option<Duration>,
}

/// A request to rewrite a lineage's current revision.
#[derive(Debug, Clone)]
pub struct EditContentRequest {
    /// What to change
    pub instruction: String,
    /// Requested kind of change
    pub category: EditCategory,
    /// Model override; the configured default when `None`
    pub model: Option<String>,
    /// Hard ceiling on the whole call including retries
    pub deadline: Option<Duration>,
}

/// Outcome of a successful generation.
#[derive(Debug, Clone)]
pub struct GeneratedContent {
    /// Version 1 of the new lineage
    pub revision: ContentRevision,
    /// The metered usage entry for the call
    pub usage_entry: UsageEntry,
    /// Plan-limit warnings in force when the call was admitted
    pub warnings: Vec<UsageWarning>,
}

/// Outcome of a successful edit.
#[derive(Debug, Clone)]
pub struct EditedContent {
    /// The new current revision
    pub revision: ContentRevision,
    /// The edit record, including the diff against the previous text
    pub edit: EditRecord,
    /// The metered usage entry for the call
    pub usage_entry: UsageEntry,
    /// Plan-limit warnings in force when the call was admitted
    pub warnings: Vec<UsageWarning>,
}
