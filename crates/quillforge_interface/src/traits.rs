//! Trait seams between the engine and the world around it.

use crate::{
    ContentFilter, ContentRevision, EditRecord, MetadataUpdate, NewContentRevision, NewEditRecord,
    UsageEntry, UsageTotals,
};
use async_trait::async_trait;
use chrono::NaiveDate;
use quillforge_core::PlanTier;
use quillforge_error::{GenerationError, QuillforgeResult};
use uuid::Uuid;

/// One successful upstream completion.
#[derive(Debug, Clone, PartialEq)]
pub struct Completion {
    /// The generated text
    pub text: String,
    /// Prompt-side tokens the provider reported
    pub input_tokens: i64,
    /// Completion-side tokens the provider reported
    pub output_tokens: i64,
    /// Provider request id, when available
    pub request_id: Option<String>,
}

/// Upstream text-generation capability.
///
/// The gateway retries `RateLimited` and `Timeout` failures; every other
/// error kind surfaces immediately, so implementations should classify
/// provider failures carefully.
#[async_trait]
pub trait TextCompletion: Send + Sync {
    /// Run one completion call against the provider.
    async fn complete(
        &self,
        prompt: &str,
        model: &str,
        temperature: f32,
        max_tokens: u32,
    ) -> Result<Completion, GenerationError>;
}

/// Source of opaque style guidance produced by the style pipeline.
#[async_trait]
pub trait StyleGuidanceSource: Send + Sync {
    /// Guidance text for a style profile, or `None` when the profile has
    /// no usable analysis yet.
    async fn guidance_for(&self, style_profile_id: Uuid) -> QuillforgeResult<Option<String>>;
}

/// Source of an organization's subscription tier.
#[async_trait]
pub trait PlanSource: Send + Sync {
    /// Current plan tier of the organization.
    async fn plan_of(&self, organization_id: Uuid) -> QuillforgeResult<PlanTier>;
}

/// Persistence for content revisions and edit records.
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Insert a standalone revision (version 1 of a new lineage).
    async fn insert_revision(
        &self,
        revision: NewContentRevision,
    ) -> QuillforgeResult<ContentRevision>;

    /// Atomically append an edit: insert the edit record, insert the new
    /// revision as current, and flip the previous current revision off.
    ///
    /// The write is conditional on the lineage's current revision still
    /// having `expected_version`; a concurrent edit that commits first
    /// makes this call fail with a stale-revision consistency error.
    async fn append_edit(
        &self,
        lineage_id: Uuid,
        expected_version: i32,
        revision: NewContentRevision,
        edit: NewEditRecord,
    ) -> QuillforgeResult<(ContentRevision, EditRecord)>;

    /// All revisions of a lineage flagged current.
    ///
    /// Returns whatever the store holds, including zero or several rows;
    /// interpreting that as a consistency fault is the caller's job.
    async fn current_revisions(&self, lineage_id: Uuid) -> QuillforgeResult<Vec<ContentRevision>>;

    /// All revisions of a lineage, oldest first.
    async fn revisions_of(&self, lineage_id: Uuid) -> QuillforgeResult<Vec<ContentRevision>>;

    /// All edit records of a lineage, oldest first.
    async fn edits_of(&self, lineage_id: Uuid) -> QuillforgeResult<Vec<EditRecord>>;

    /// Number of edit records in a lineage.
    async fn edit_count(&self, lineage_id: Uuid) -> QuillforgeResult<i64>;

    /// Current revisions of an organization's lineages matching a filter.
    async fn list_revisions(
        &self,
        organization_id: Uuid,
        filter: &ContentFilter,
    ) -> QuillforgeResult<Vec<ContentRevision>>;

    /// Apply a metadata update to a lineage's current revision.
    async fn update_metadata(
        &self,
        lineage_id: Uuid,
        update: MetadataUpdate,
    ) -> QuillforgeResult<ContentRevision>;

    /// Delete a lineage and everything in it. Returns the number of
    /// revisions removed.
    async fn delete_lineage(&self, lineage_id: Uuid) -> QuillforgeResult<u64>;
}

/// Persistence for usage entries.
#[async_trait]
pub trait UsageStore: Send + Sync {
    /// Persist a fully stamped usage entry.
    async fn insert(&self, entry: UsageEntry) -> QuillforgeResult<UsageEntry>;

    /// Entries for an organization with `usage_date` in `from..=to`.
    async fn entries_in_range(
        &self,
        organization_id: Uuid,
        from: NaiveDate,
        to: NaiveDate,
    ) -> QuillforgeResult<Vec<UsageEntry>>;

    /// Token/cost/request totals for an organization over `from..=to`.
    async fn totals_in_range(
        &self,
        organization_id: Uuid,
        from: NaiveDate,
        to: NaiveDate,
    ) -> QuillforgeResult<UsageTotals>;
}
