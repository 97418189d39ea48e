//! Edit record value types.

use chrono::{DateTime, Utc};
use quillforge_core::{ContentStatus, EditCategory, TokenUsage};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One accepted edit within a lineage.
///
/// Created atomically with the revision it produced and never mutated
/// afterwards. Sequence numbers are contiguous from 1.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditRecord {
    /// Edit id
    pub id: Uuid,
    /// Lineage the edit belongs to
    pub lineage_id: Uuid,
    /// Revision produced by this edit
    pub revision_id: Uuid,
    /// User who requested the edit
    pub edited_by: Uuid,
    /// 1-based position in the lineage's edit history
    pub sequence: i32,
    /// The edit instruction sent upstream
    pub instruction: String,
    /// Requested kind of change
    pub category: EditCategory,
    /// Body of the revision that was current before the edit
    pub previous_text: String,
    /// Body of the revision the edit produced
    pub new_text: String,
    /// One-sentence description of the change
    pub diff_summary: String,
    /// Tagged diff lines between previous and new text
    pub diff_lines: Vec<String>,
    /// Word count before the edit
    pub previous_word_count: i32,
    /// Word count after the edit
    pub new_word_count: i32,
    /// `new_word_count - previous_word_count`
    pub word_count_delta: i32,
    /// Character count before the edit
    pub previous_character_count: i32,
    /// Character count after the edit
    pub new_character_count: i32,
    /// `new_character_count - previous_character_count`
    pub character_count_delta: i32,
    /// Tokens consumed by the edit call
    pub usage: TokenUsage,
    /// Estimated upstream cost in USD
    pub estimated_cost: f64,
    /// Model that produced the rewrite
    pub model: String,
    /// Lifecycle status
    pub status: ContentStatus,
    /// Creation time
    pub created_at: DateTime<Utc>,
}

/// An edit about to be persisted alongside its new revision.
///
/// The store assigns `id`, `revision_id` (the id of the revision inserted
/// in the same transaction), and the timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewEditRecord {
    /// Lineage the edit belongs to
    pub lineage_id: Uuid,
    /// User who requested the edit
    pub edited_by: Uuid,
    /// 1-based position in the lineage's edit history
    pub sequence: i32,
    /// The edit instruction sent upstream
    pub instruction: String,
    /// Requested kind of change
    pub category: EditCategory,
    /// Body of the revision that was current before the edit
    pub previous_text: String,
    /// Body of the revision the edit produced
    pub new_text: String,
    /// One-sentence description of the change
    pub diff_summary: String,
    /// Tagged diff lines between previous and new text
    pub diff_lines: Vec<String>,
    /// Word count before the edit
    pub previous_word_count: i32,
    /// Word count after the edit
    pub new_word_count: i32,
    /// `new_word_count - previous_word_count`
    pub word_count_delta: i32,
    /// Character count before the edit
    pub previous_character_count: i32,
    /// Character count after the edit
    pub new_character_count: i32,
    /// `new_character_count - previous_character_count`
    pub character_count_delta: i32,
    /// Tokens consumed by the edit call
    pub usage: TokenUsage,
    /// Estimated upstream cost in USD
    pub estimated_cost: f64,
    /// Model that produced the rewrite
    pub model: String,
    /// Lifecycle status
    pub status: ContentStatus,
}
