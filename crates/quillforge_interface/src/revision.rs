//! Content revision value types.

use chrono::{DateTime, Utc};
use quillforge_core::{ContentStatus, ContentType, TokenUsage};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One immutable snapshot of generated text within a lineage.
///
/// A lineage is the chain of revisions descending from one generation
/// request; `lineage_id` is stable across the chain while `id` names this
/// snapshot. `version` starts at 1 and increments by exactly one per
/// accepted edit, and at most one revision per lineage is current.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentRevision {
    /// Revision id
    pub id: Uuid,
    /// Stable id of the chain this revision belongs to
    pub lineage_id: Uuid,
    /// Owning organization
    pub organization_id: Uuid,
    /// User who triggered the generation or edit
    pub created_by: Uuid,
    /// Style profile applied, if any
    pub style_profile_id: Option<Uuid>,
    /// Content title
    pub title: String,
    /// Brief or outline the content was generated from
    pub brief: Option<String>,
    /// Kind of content
    pub content_type: ContentType,
    /// The generated text
    pub body: String,
    /// Word count of `body`
    pub word_count: i32,
    /// Character count of `body`
    pub character_count: i32,
    /// 1-based position in the lineage
    pub version: i32,
    /// Whether this is the lineage's current revision
    pub is_current: bool,
    /// Tokens consumed producing this revision
    pub usage: TokenUsage,
    /// Estimated upstream cost in USD
    pub estimated_cost: f64,
    /// Model that produced the text
    pub model: String,
    /// Prompt sent upstream, kept for audit
    pub prompt: Option<String>,
    /// Lifecycle status
    pub status: ContentStatus,
    /// Soft-archive flag on the lineage head
    pub is_archived: bool,
    /// Creation time
    pub created_at: DateTime<Utc>,
    /// Last metadata update time
    pub updated_at: DateTime<Utc>,
}

/// A revision about to be persisted. The store assigns `id` and timestamps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewContentRevision {
    /// Stable id of the chain this revision belongs to
    pub lineage_id: Uuid,
    /// Owning organization
    pub organization_id: Uuid,
    /// User who triggered the generation or edit
    pub created_by: Uuid,
    /// Style profile applied, if any
    pub style_profile_id: Option<Uuid>,
    /// Content title
    pub title: String,
    /// Brief or outline the content was generated from
    pub brief: Option<String>,
    /// Kind of content
    pub content_type: ContentType,
    /// The generated text
    pub body: String,
    /// Word count of `body`
    pub word_count: i32,
    /// Character count of `body`
    pub character_count: i32,
    /// 1-based position in the lineage
    pub version: i32,
    /// Whether this revision becomes the lineage's current one
    pub is_current: bool,
    /// Tokens consumed producing this revision
    pub usage: TokenUsage,
    /// Estimated upstream cost in USD
    pub estimated_cost: f64,
    /// Model that produced the text
    pub model: String,
    /// Prompt sent upstream, kept for audit
    pub prompt: Option<String>,
    /// Lifecycle status
    pub status: ContentStatus,
    /// Soft-archive flag
    pub is_archived: bool,
}
