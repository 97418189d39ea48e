//! PostgreSQL implementation of the content store.

use crate::models::{ContentRevisionRow, EditRecordRow, NewContentRevisionRow, NewEditRecordRow};
use crate::schema::{content_revisions, edit_records};
use async_trait::async_trait;
use chrono::Utc;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use quillforge_error::{
    ConsistencyError, ConsistencyErrorKind, DatabaseError, NotFoundError, QuillforgeResult,
};
use quillforge_interface::{
    ContentFilter, ContentRevision, ContentStore, EditRecord, MetadataUpdate, NewContentRevision,
    NewEditRecord,
};
use std::sync::Arc;
use tokio::sync::Mutex;
use uuid::Uuid;

#[derive(AsChangeset)]
#[diesel(table_name = content_revisions)]
struct MetadataChangeset {
    title: Option<String>,
    brief: Option<String>,
    is_archived: Option<bool>,
    updated_at: chrono::DateTime<Utc>,
}

/// [`ContentStore`] backed by PostgreSQL through diesel.
///
/// The three-write edit append runs in one transaction with a conditional
/// update on the current pointer, so a racing editor rolls back instead of
/// forking the lineage.
pub struct PostgresContentStore {
    conn: Arc<Mutex<PgConnection>>,
}

impl PostgresContentStore {
    /// Wrap an established connection.
    pub fn new(conn: PgConnection) -> Self {
        Self {
            conn: Arc::new(Mutex::new(conn)),
        }
    }

    /// Share an existing connection handle.
    pub fn from_arc(conn: Arc<Mutex<PgConnection>>) -> Self {
        Self { conn }
    }
}

fn rows_to_revisions(rows: Vec<ContentRevisionRow>) -> QuillforgeResult<Vec<ContentRevision>> {
    rows.into_iter()
        .map(|row| ContentRevision::try_from(row).map_err(Into::into))
        .collect()
}

#[async_trait]
impl ContentStore for PostgresContentStore {
    async fn insert_revision(
        &self,
        revision: NewContentRevision,
    ) -> QuillforgeResult<ContentRevision> {
        let mut conn = self.conn.lock().await;
        let row: ContentRevisionRow = diesel::insert_into(content_revisions::table)
            .values(NewContentRevisionRow::from_domain(revision))
            .get_result(&mut *conn)
            .map_err(DatabaseError::from)?;
        Ok(row.try_into().map_err(DatabaseError::from)?)
    }

    async fn append_edit(
        &self,
        lineage_id: Uuid,
        expected_version: i32,
        revision: NewContentRevision,
        edit: NewEditRecord,
    ) -> QuillforgeResult<(ContentRevision, EditRecord)> {
        // Both rows are built before the transaction opens, so a
        // serialization failure never masquerades as a write conflict.
        let revision_values = NewContentRevisionRow::from_domain(revision);
        let edit_values = NewEditRecordRow::from_domain(edit, revision_values.id)?;

        let mut conn = self.conn.lock().await;
        let result = conn.transaction::<_, diesel::result::Error, _>(|conn| {
            // Conditional flip of the current pointer: zero rows means a
            // concurrent edit already moved the lineage past this version.
            let flipped = diesel::update(
                content_revisions::table.filter(
                    content_revisions::lineage_id
                        .eq(lineage_id)
                        .and(content_revisions::is_current.eq(true))
                        .and(content_revisions::version.eq(expected_version)),
                ),
            )
            .set((
                content_revisions::is_current.eq(false),
                content_revisions::updated_at.eq(Utc::now()),
            ))
            .execute(conn)?;
            if flipped != 1 {
                return Err(diesel::result::Error::RollbackTransaction);
            }

            let revision_row: ContentRevisionRow = diesel::insert_into(content_revisions::table)
                .values(revision_values)
                .get_result(conn)?;

            let edit_row: EditRecordRow = diesel::insert_into(edit_records::table)
                .values(edit_values)
                .get_result(conn)?;

            Ok((revision_row, edit_row))
        });

        let (revision_row, edit_row) = match result {
            Ok(rows) => rows,
            Err(diesel::result::Error::RollbackTransaction) => {
                return Err(ConsistencyError::new(ConsistencyErrorKind::StaleRevision(
                    format!("lineage {lineage_id} moved past version {expected_version}"),
                )))?;
            }
            Err(e) => return Err(DatabaseError::from(e))?,
        };
        Ok((
            revision_row.try_into().map_err(DatabaseError::from)?,
            edit_row.try_into().map_err(DatabaseError::from)?,
        ))
    }

    async fn current_revisions(&self, lineage_id: Uuid) -> QuillforgeResult<Vec<ContentRevision>> {
        let mut conn = self.conn.lock().await;
        let rows: Vec<ContentRevisionRow> = content_revisions::table
            .filter(
                content_revisions::lineage_id
                    .eq(lineage_id)
                    .and(content_revisions::is_current.eq(true)),
            )
            .load(&mut *conn)
            .map_err(DatabaseError::from)?;
        rows_to_revisions(rows)
    }

    async fn revisions_of(&self, lineage_id: Uuid) -> QuillforgeResult<Vec<ContentRevision>> {
        let mut conn = self.conn.lock().await;
        let rows: Vec<ContentRevisionRow> = content_revisions::table
            .filter(content_revisions::lineage_id.eq(lineage_id))
            .order(content_revisions::version.asc())
            .load(&mut *conn)
            .map_err(DatabaseError::from)?;
        rows_to_revisions(rows)
    }

    async fn edits_of(&self, lineage_id: Uuid) -> QuillforgeResult<Vec<EditRecord>> {
        let mut conn = self.conn.lock().await;
        let rows: Vec<EditRecordRow> = edit_records::table
            .filter(edit_records::lineage_id.eq(lineage_id))
            .order(edit_records::sequence.asc())
            .load(&mut *conn)
            .map_err(DatabaseError::from)?;
        rows.into_iter()
            .map(|row| EditRecord::try_from(row).map_err(Into::into))
            .collect()
    }

    async fn edit_count(&self, lineage_id: Uuid) -> QuillforgeResult<i64> {
        let mut conn = self.conn.lock().await;
        Ok(edit_records::table
            .filter(edit_records::lineage_id.eq(lineage_id))
            .count()
            .get_result(&mut *conn)
            .map_err(DatabaseError::from)?)
    }

    async fn list_revisions(
        &self,
        organization_id: Uuid,
        filter: &ContentFilter,
    ) -> QuillforgeResult<Vec<ContentRevision>> {
        let mut conn = self.conn.lock().await;
        let mut query = content_revisions::table
            .filter(
                content_revisions::organization_id
                    .eq(organization_id)
                    .and(content_revisions::is_current.eq(true)),
            )
            .into_boxed();

        if let Some(content_type) = filter.content_type {
            query = query.filter(content_revisions::content_type.eq(content_type.to_string()));
        }
        if let Some(status) = filter.status {
            query = query.filter(content_revisions::status.eq(status.to_string()));
        }
        if !filter.include_archived {
            query = query.filter(content_revisions::is_archived.eq(false));
        }
        if let Some(after) = filter.created_after {
            query = query.filter(content_revisions::created_at.ge(after));
        }
        if let Some(before) = filter.created_before {
            query = query.filter(content_revisions::created_at.le(before));
        }
        if let Some(min) = filter.min_word_count {
            query = query.filter(content_revisions::word_count.ge(min));
        }
        if let Some(max) = filter.max_word_count {
            query = query.filter(content_revisions::word_count.le(max));
        }
        if let Some(text) = &filter.query {
            let pattern = format!("%{}%", text.to_lowercase());
            query = query.filter(
                content_revisions::title
                    .ilike(pattern.clone())
                    .or(content_revisions::body.ilike(pattern)),
            );
        }

        query = query.order(content_revisions::created_at.desc());
        if let Some(offset) = filter.offset {
            query = query.offset(offset.max(0));
        }
        if let Some(limit) = filter.limit {
            query = query.limit(limit.max(0));
        }

        let rows: Vec<ContentRevisionRow> =
            query.load(&mut *conn).map_err(DatabaseError::from)?;
        rows_to_revisions(rows)
    }

    async fn update_metadata(
        &self,
        lineage_id: Uuid,
        update: MetadataUpdate,
    ) -> QuillforgeResult<ContentRevision> {
        let mut conn = self.conn.lock().await;
        let changes = MetadataChangeset {
            title: update.title,
            brief: update.brief,
            is_archived: update.is_archived,
            updated_at: Utc::now(),
        };
        let row: ContentRevisionRow = diesel::update(
            content_revisions::table.filter(
                content_revisions::lineage_id
                    .eq(lineage_id)
                    .and(content_revisions::is_current.eq(true)),
            ),
        )
        .set(changes)
        .get_result(&mut *conn)
        .optional()
        .map_err(DatabaseError::from)?
        .ok_or_else(|| NotFoundError::new(format!("lineage {lineage_id} not found")))?;
        Ok(row.try_into().map_err(DatabaseError::from)?)
    }

    async fn delete_lineage(&self, lineage_id: Uuid) -> QuillforgeResult<u64> {
        let mut conn = self.conn.lock().await;
        let deleted = conn
            .transaction::<_, diesel::result::Error, _>(|conn| {
                diesel::delete(
                    edit_records::table.filter(edit_records::lineage_id.eq(lineage_id)),
                )
                .execute(conn)?;
                diesel::delete(
                    content_revisions::table
                        .filter(content_revisions::lineage_id.eq(lineage_id)),
                )
                .execute(conn)
            })
            .map_err(DatabaseError::from)?;
        if deleted == 0 {
            return Err(NotFoundError::new(format!("lineage {lineage_id} not found")))?;
        }
        Ok(deleted as u64)
    }
}
