//! Listing filters and metadata updates.

use chrono::{DateTime, Utc};
use quillforge_core::{ContentStatus, ContentType};
use serde::{Deserialize, Serialize};

/// Filter for listing current revisions of an organization's lineages.
///
/// All criteria are conjunctive; `Default` matches every non-archived
/// lineage.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContentFilter {
    /// Only this kind of content
    pub content_type: Option<ContentType>,
    /// Only this lifecycle status
    pub status: Option<ContentStatus>,
    /// Include archived lineages
    pub include_archived: bool,
    /// Only lineages created at or after this instant
    pub created_after: Option<DateTime<Utc>>,
    /// Only lineages created at or before this instant
    pub created_before: Option<DateTime<Utc>>,
    /// Minimum current-revision word count
    pub min_word_count: Option<i32>,
    /// Maximum current-revision word count
    pub max_word_count: Option<i32>,
    /// Case-insensitive substring match on title and body
    pub query: Option<String>,
    /// Page size
    pub limit: Option<i64>,
    /// Page offset
    pub offset: Option<i64>,
}

/// Metadata changes applied to a lineage's current revision.
///
/// `None` fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetadataUpdate {
    /// New title
    pub title: Option<String>,
    /// New brief
    pub brief: Option<String>,
    /// Archive or unarchive the lineage
    pub is_archived: Option<bool>,
}
