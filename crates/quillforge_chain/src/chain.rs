//! The version chain manager.

use quillforge_core::{
    ContentStatus, ContentType, EditCategory, TokenUsage, content_metrics, text_diff,
};
use quillforge_error::{
    ConsistencyError, ConsistencyErrorKind, LimitExceededError, LimitExceededErrorKind,
    NotFoundError, QuillforgeResult,
};
use quillforge_interface::{
    ContentFilter, ContentRevision, ContentStore, EditRecord, MetadataUpdate, NewContentRevision,
    NewEditRecord,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, instrument};
use uuid::Uuid;

/// Everything needed to start a new lineage at version 1.
#[derive(Debug, Clone)]
pub struct LineageSeed {
    /// Owning organization
    pub organization_id: Uuid,
    /// User who triggered the generation
    pub created_by: Uuid,
    /// Style profile applied, if any
    pub style_profile_id: Option<Uuid>,
    /// Content title
    pub title: String,
    /// Brief or outline
    pub brief: Option<String>,
    /// Kind of content
    pub content_type: ContentType,
    /// The generated text
    pub body: String,
    /// Tokens consumed by the generation
    pub usage: TokenUsage,
    /// Estimated upstream cost in USD
    pub estimated_cost: f64,
    /// Model that produced the text
    pub model: String,
    /// Prompt sent upstream
    pub prompt: Option<String>,
    /// Lifecycle status; `Failed` keeps an audit row for a failed call
    pub status: ContentStatus,
}

/// Everything needed to append one edit to a lineage.
#[derive(Debug, Clone)]
pub struct EditSeed {
    /// User who requested the edit
    pub edited_by: Uuid,
    /// The edit instruction
    pub instruction: String,
    /// Requested kind of change
    pub category: EditCategory,
    /// The rewritten body
    pub new_body: String,
    /// Tokens consumed by the edit call
    pub usage: TokenUsage,
    /// Estimated upstream cost in USD
    pub estimated_cost: f64,
    /// Model that produced the rewrite
    pub model: String,
    /// Rewrite prompt sent upstream
    pub prompt: Option<String>,
}

/// Snapshot of a whole lineage for export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineageExport {
    /// The lineage id
    pub lineage_id: Uuid,
    /// Every revision, oldest first
    pub revisions: Vec<ContentRevision>,
    /// Edit history, oldest first; empty when not requested
    pub edits: Vec<EditRecord>,
}

/// Manager for content lineages over a [`ContentStore`].
///
/// Owns the version-chain invariants: versions increment by exactly one,
/// exactly one revision per lineage is current, and edits append
/// atomically with an optimistic check against concurrent writers.
pub struct VersionChain {
    store: Arc<dyn ContentStore>,
    max_edits: u32,
}

impl VersionChain {
    /// Build a manager over a store with an edit cap per lineage.
    pub fn new(store: Arc<dyn ContentStore>, max_edits: u32) -> Self {
        Self { store, max_edits }
    }

    /// Start a new lineage: persist version 1 as the current revision.
    #[instrument(skip(self, seed), fields(organization_id = %seed.organization_id, content_type = %seed.content_type))]
    pub async fn create_lineage(&self, seed: LineageSeed) -> QuillforgeResult<ContentRevision> {
        let metrics = content_metrics(&seed.body);
        self.store
            .insert_revision(NewContentRevision {
                lineage_id: Uuid::new_v4(),
                organization_id: seed.organization_id,
                created_by: seed.created_by,
                style_profile_id: seed.style_profile_id,
                title: seed.title,
                brief: seed.brief,
                content_type: seed.content_type,
                word_count: metrics.word_count as i32,
                character_count: metrics.character_count as i32,
                body: seed.body,
                version: 1,
                is_current: true,
                usage: seed.usage,
                estimated_cost: seed.estimated_cost,
                model: seed.model,
                prompt: seed.prompt,
                status: seed.status,
                is_archived: false,
            })
            .await
    }

    /// Append an accepted edit: one atomic write producing the edit record
    /// and the new current revision.
    ///
    /// Fails with a stale-revision error when a concurrent edit commits
    /// first, and with a limit error once the lineage holds the maximum
    /// number of edits.
    #[instrument(skip(self, seed), fields(%lineage_id, category = %seed.category))]
    pub async fn append_edit(
        &self,
        lineage_id: Uuid,
        seed: EditSeed,
    ) -> QuillforgeResult<(ContentRevision, EditRecord)> {
        let current = self.current_of(lineage_id).await?;

        let edit_count = self.store.edit_count(lineage_id).await?;
        if edit_count >= self.max_edits as i64 {
            return Err(LimitExceededError::new(LimitExceededErrorKind::EditCount(
                self.max_edits,
            )))?;
        }

        let diff = text_diff(&current.body, &seed.new_body);
        let new_metrics = content_metrics(&seed.new_body);

        let revision = NewContentRevision {
            lineage_id,
            organization_id: current.organization_id,
            created_by: seed.edited_by,
            style_profile_id: current.style_profile_id,
            title: current.title.clone(),
            brief: current.brief.clone(),
            content_type: current.content_type,
            word_count: new_metrics.word_count as i32,
            character_count: new_metrics.character_count as i32,
            body: seed.new_body.clone(),
            version: current.version + 1,
            is_current: true,
            usage: seed.usage,
            estimated_cost: seed.estimated_cost,
            model: seed.model.clone(),
            prompt: seed.prompt,
            status: ContentStatus::Completed,
            is_archived: current.is_archived,
        };
        let edit = NewEditRecord {
            lineage_id,
            edited_by: seed.edited_by,
            sequence: edit_count as i32 + 1,
            instruction: seed.instruction,
            category: seed.category,
            previous_text: current.body.clone(),
            new_text: seed.new_body,
            diff_summary: diff.summary,
            diff_lines: diff.lines,
            previous_word_count: current.word_count,
            new_word_count: new_metrics.word_count as i32,
            word_count_delta: new_metrics.word_count as i32 - current.word_count,
            previous_character_count: current.character_count,
            new_character_count: new_metrics.character_count as i32,
            character_count_delta: new_metrics.character_count as i32
                - current.character_count,
            usage: seed.usage,
            estimated_cost: seed.estimated_cost,
            model: seed.model,
            status: ContentStatus::Completed,
        };

        self.store
            .append_edit(lineage_id, current.version, revision, edit)
            .await
    }

    /// The single current revision of a lineage.
    ///
    /// An unknown lineage is a not-found error. A known lineage with zero
    /// or several current revisions is a consistency fault: logged loudly
    /// and surfaced, never silently repaired.
    pub async fn current_of(&self, lineage_id: Uuid) -> QuillforgeResult<ContentRevision> {
        let mut currents = self.store.current_revisions(lineage_id).await?;
        match currents.len() {
            1 => Ok(currents.remove(0)),
            0 => {
                if self.store.revisions_of(lineage_id).await?.is_empty() {
                    Err(NotFoundError::new(format!("lineage {lineage_id} not found")))?
                } else {
                    error!(%lineage_id, "lineage has no current revision");
                    Err(ConsistencyError::new(ConsistencyErrorKind::NoCurrentRevision(
                        lineage_id.to_string(),
                    )))?
                }
            }
            count => {
                error!(%lineage_id, count, "lineage has multiple current revisions");
                Err(ConsistencyError::new(
                    ConsistencyErrorKind::MultipleCurrentRevisions {
                        lineage: lineage_id.to_string(),
                        count,
                    },
                ))?
            }
        }
    }

    /// Full revision history of a lineage, oldest first.
    pub async fn revisions_of(&self, lineage_id: Uuid) -> QuillforgeResult<Vec<ContentRevision>> {
        let revisions = self.store.revisions_of(lineage_id).await?;
        if revisions.is_empty() {
            return Err(NotFoundError::new(format!("lineage {lineage_id} not found")))?;
        }
        Ok(revisions)
    }

    /// Number of edits recorded against a lineage.
    pub async fn edit_count(&self, lineage_id: Uuid) -> QuillforgeResult<i64> {
        self.store.edit_count(lineage_id).await
    }

    /// The edit cap enforced per lineage.
    pub fn max_edits(&self) -> u32 {
        self.max_edits
    }

    /// Edit history of a lineage, oldest first.
    pub async fn edits_of(&self, lineage_id: Uuid) -> QuillforgeResult<Vec<EditRecord>> {
        // Distinguish a lineage with no edits from an unknown lineage.
        if self.store.revisions_of(lineage_id).await?.is_empty() {
            return Err(NotFoundError::new(format!("lineage {lineage_id} not found")))?;
        }
        self.store.edits_of(lineage_id).await
    }

    /// Current revisions of an organization's lineages matching a filter.
    pub async fn list(
        &self,
        organization_id: Uuid,
        filter: &ContentFilter,
    ) -> QuillforgeResult<Vec<ContentRevision>> {
        self.store.list_revisions(organization_id, filter).await
    }

    /// Update title/brief/archive flag on a lineage's current revision.
    pub async fn update_metadata(
        &self,
        lineage_id: Uuid,
        update: MetadataUpdate,
    ) -> QuillforgeResult<ContentRevision> {
        self.store.update_metadata(lineage_id, update).await
    }

    /// Delete a lineage and its edit history. Returns revisions removed.
    #[instrument(skip(self), fields(%lineage_id))]
    pub async fn delete_lineage(&self, lineage_id: Uuid) -> QuillforgeResult<u64> {
        self.store.delete_lineage(lineage_id).await
    }

    /// Export a whole lineage, optionally with its edit history.
    pub async fn export_lineage(
        &self,
        lineage_id: Uuid,
        include_edits: bool,
    ) -> QuillforgeResult<LineageExport> {
        let revisions = self.revisions_of(lineage_id).await?;
        let edits = if include_edits {
            self.store.edits_of(lineage_id).await?
        } else {
            Vec::new()
        };
        Ok(LineageExport {
            lineage_id,
            revisions,
            edits,
        })
    }
}
