//! In-memory content store for tests and embedded use.

use async_trait::async_trait;
use chrono::Utc;
use quillforge_error::{
    ConsistencyError, ConsistencyErrorKind, NotFoundError, QuillforgeResult,
};
use quillforge_interface::{
    ContentFilter, ContentRevision, ContentStore, EditRecord, MetadataUpdate, NewContentRevision,
    NewEditRecord,
};
use std::collections::HashMap;
use std::sync::Mutex;
use uuid::Uuid;

#[derive(Debug, Default)]
struct Lineages {
    revisions: HashMap<Uuid, Vec<ContentRevision>>,
    edits: HashMap<Uuid, Vec<EditRecord>>,
}

/// [`ContentStore`] backed by hash maps behind a single mutex.
///
/// The one mutex makes `append_edit` trivially atomic, including the
/// optimistic version check, which mirrors what the Postgres store does
/// with a transaction and a conditional update.
#[derive(Debug, Default)]
pub struct InMemoryContentStore {
    inner: Mutex<Lineages>,
}

impl InMemoryContentStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

fn materialize(new: NewContentRevision) -> ContentRevision {
    let now = Utc::now();
    ContentRevision {
        id: Uuid::new_v4(),
        lineage_id: new.lineage_id,
        organization_id: new.organization_id,
        created_by: new.created_by,
        style_profile_id: new.style_profile_id,
        title: new.title,
        brief: new.brief,
        content_type: new.content_type,
        body: new.body,
        word_count: new.word_count,
        character_count: new.character_count,
        version: new.version,
        is_current: new.is_current,
        usage: new.usage,
        estimated_cost: new.estimated_cost,
        model: new.model,
        prompt: new.prompt,
        status: new.status,
        is_archived: new.is_archived,
        created_at: now,
        updated_at: now,
    }
}

fn matches_filter(revision: &ContentRevision, filter: &ContentFilter) -> bool {
    if let Some(ct) = filter.content_type
        && revision.content_type != ct
    {
        return false;
    }
    if let Some(status) = filter.status
        && revision.status != status
    {
        return false;
    }
    if !filter.include_archived && revision.is_archived {
        return false;
    }
    if let Some(after) = filter.created_after
        && revision.created_at < after
    {
        return false;
    }
    if let Some(before) = filter.created_before
        && revision.created_at > before
    {
        return false;
    }
    if let Some(min) = filter.min_word_count
        && revision.word_count < min
    {
        return false;
    }
    if let Some(max) = filter.max_word_count
        && revision.word_count > max
    {
        return false;
    }
    if let Some(query) = &filter.query {
        let needle = query.to_lowercase();
        if !revision.title.to_lowercase().contains(&needle)
            && !revision.body.to_lowercase().contains(&needle)
        {
            return false;
        }
    }
    true
}

#[async_trait]
impl ContentStore for InMemoryContentStore {
    async fn insert_revision(
        &self,
        revision: NewContentRevision,
    ) -> QuillforgeResult<ContentRevision> {
        let mut inner = self.inner.lock().unwrap_or_else(|p| p.into_inner());
        let materialized = materialize(revision);
        inner
            .revisions
            .entry(materialized.lineage_id)
            .or_default()
            .push(materialized.clone());
        Ok(materialized)
    }

    async fn append_edit(
        &self,
        lineage_id: Uuid,
        expected_version: i32,
        revision: NewContentRevision,
        edit: NewEditRecord,
    ) -> QuillforgeResult<(ContentRevision, EditRecord)> {
        let mut inner = self.inner.lock().unwrap_or_else(|p| p.into_inner());

        let revisions = inner
            .revisions
            .get_mut(&lineage_id)
            .ok_or_else(|| NotFoundError::new(format!("lineage {lineage_id} not found")))?;
        // Conditional write: the row being superseded must still be the
        // current one at the expected version.
        let Some(previous) = revisions
            .iter_mut()
            .find(|r| r.is_current && r.version == expected_version)
        else {
            return Err(ConsistencyError::new(ConsistencyErrorKind::StaleRevision(
                format!("lineage {lineage_id} moved past version {expected_version}"),
            )))?;
        };
        previous.is_current = false;

        let materialized = materialize(revision);
        revisions.push(materialized.clone());

        let now = Utc::now();
        let record = EditRecord {
            id: Uuid::new_v4(),
            lineage_id: edit.lineage_id,
            revision_id: materialized.id,
            edited_by: edit.edited_by,
            sequence: edit.sequence,
            instruction: edit.instruction,
            category: edit.category,
            previous_text: edit.previous_text,
            new_text: edit.new_text,
            diff_summary: edit.diff_summary,
            diff_lines: edit.diff_lines,
            previous_word_count: edit.previous_word_count,
            new_word_count: edit.new_word_count,
            word_count_delta: edit.word_count_delta,
            previous_character_count: edit.previous_character_count,
            new_character_count: edit.new_character_count,
            character_count_delta: edit.character_count_delta,
            usage: edit.usage,
            estimated_cost: edit.estimated_cost,
            model: edit.model,
            status: edit.status,
            created_at: now,
        };
        inner.edits.entry(lineage_id).or_default().push(record.clone());
        Ok((materialized, record))
    }

    async fn current_revisions(&self, lineage_id: Uuid) -> QuillforgeResult<Vec<ContentRevision>> {
        let inner = self.inner.lock().unwrap_or_else(|p| p.into_inner());
        Ok(inner
            .revisions
            .get(&lineage_id)
            .map(|revs| revs.iter().filter(|r| r.is_current).cloned().collect())
            .unwrap_or_default())
    }

    async fn revisions_of(&self, lineage_id: Uuid) -> QuillforgeResult<Vec<ContentRevision>> {
        let inner = self.inner.lock().unwrap_or_else(|p| p.into_inner());
        let mut revisions = inner
            .revisions
            .get(&lineage_id)
            .cloned()
            .unwrap_or_default();
        revisions.sort_by_key(|r| r.version);
        Ok(revisions)
    }

    async fn edits_of(&self, lineage_id: Uuid) -> QuillforgeResult<Vec<EditRecord>> {
        let inner = self.inner.lock().unwrap_or_else(|p| p.into_inner());
        let mut edits = inner.edits.get(&lineage_id).cloned().unwrap_or_default();
        edits.sort_by_key(|e| e.sequence);
        Ok(edits)
    }

    async fn edit_count(&self, lineage_id: Uuid) -> QuillforgeResult<i64> {
        let inner = self.inner.lock().unwrap_or_else(|p| p.into_inner());
        Ok(inner.edits.get(&lineage_id).map_or(0, |e| e.len() as i64))
    }

    async fn list_revisions(
        &self,
        organization_id: Uuid,
        filter: &ContentFilter,
    ) -> QuillforgeResult<Vec<ContentRevision>> {
        let inner = self.inner.lock().unwrap_or_else(|p| p.into_inner());
        let mut matched: Vec<ContentRevision> = inner
            .revisions
            .values()
            .flatten()
            .filter(|r| {
                r.is_current && r.organization_id == organization_id && matches_filter(r, filter)
            })
            .cloned()
            .collect();
        matched.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let offset = filter.offset.unwrap_or(0).max(0) as usize;
        let matched: Vec<ContentRevision> = matched.into_iter().skip(offset).collect();
        Ok(match filter.limit {
            Some(limit) => matched.into_iter().take(limit.max(0) as usize).collect(),
            None => matched,
        })
    }

    async fn update_metadata(
        &self,
        lineage_id: Uuid,
        update: MetadataUpdate,
    ) -> QuillforgeResult<ContentRevision> {
        let mut inner = self.inner.lock().unwrap_or_else(|p| p.into_inner());
        let revisions = inner
            .revisions
            .get_mut(&lineage_id)
            .ok_or_else(|| NotFoundError::new(format!("lineage {lineage_id} not found")))?;
        let current = revisions
            .iter_mut()
            .find(|r| r.is_current)
            .ok_or_else(|| {
                ConsistencyError::new(ConsistencyErrorKind::NoCurrentRevision(
                    lineage_id.to_string(),
                ))
            })?;

        if let Some(title) = update.title {
            current.title = title;
        }
        if let Some(brief) = update.brief {
            current.brief = Some(brief);
        }
        if let Some(archived) = update.is_archived {
            current.is_archived = archived;
        }
        current.updated_at = Utc::now();
        Ok(current.clone())
    }

    async fn delete_lineage(&self, lineage_id: Uuid) -> QuillforgeResult<u64> {
        let mut inner = self.inner.lock().unwrap_or_else(|p| p.into_inner());
        let removed = inner
            .revisions
            .remove(&lineage_id)
            .ok_or_else(|| NotFoundError::new(format!("lineage {lineage_id} not found")))?;
        inner.edits.remove(&lineage_id);
        Ok(removed.len() as u64)
    }
}
