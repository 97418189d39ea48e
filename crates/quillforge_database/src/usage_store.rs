//! PostgreSQL implementation of the usage store.

use crate::models::UsageEntryRow;
use crate::schema::usage_entries;
use async_trait::async_trait;
use chrono::NaiveDate;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use quillforge_error::{DatabaseError, QuillforgeResult};
use quillforge_interface::{UsageEntry, UsageStore, UsageTotals};
use std::sync::Arc;
use tokio::sync::Mutex;
use uuid::Uuid;

/// Append-only [`UsageStore`] backed by PostgreSQL through diesel.
pub struct PostgresUsageStore {
    conn: Arc<Mutex<PgConnection>>,
}

impl PostgresUsageStore {
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

#[async_trait]
impl UsageStore for PostgresUsageStore {
    async fn insert(&self, entry: UsageEntry) -> QuillforgeResult<UsageEntry> {
        let mut conn = self.conn.lock().await;
        let row: UsageEntryRow = diesel::insert_into(usage_entries::table)
            .values(UsageEntryRow::from(entry))
            .get_result(&mut *conn)
            .map_err(DatabaseError::from)?;
        Ok(row.try_into().map_err(DatabaseError::from)?)
    }

    async fn entries_in_range(
        &self,
        organization_id: Uuid,
        from: NaiveDate,
        to: NaiveDate,
    ) -> QuillforgeResult<Vec<UsageEntry>> {
        let mut conn = self.conn.lock().await;
        let rows: Vec<UsageEntryRow> = usage_entries::table
            .filter(
                usage_entries::organization_id
                    .eq(organization_id)
                    .and(usage_entries::usage_date.ge(from))
                    .and(usage_entries::usage_date.le(to)),
            )
            .order(usage_entries::created_at.asc())
            .load(&mut *conn)
            .map_err(DatabaseError::from)?;
        rows.into_iter()
            .map(|row| UsageEntry::try_from(row).map_err(Into::into))
            .collect()
    }

    async fn totals_in_range(
        &self,
        organization_id: Uuid,
        from: NaiveDate,
        to: NaiveDate,
    ) -> QuillforgeResult<UsageTotals> {
        let mut conn = self.conn.lock().await;
        let rows: Vec<(i64, f64)> = usage_entries::table
            .filter(
                usage_entries::organization_id
                    .eq(organization_id)
                    .and(usage_entries::usage_date.ge(from))
                    .and(usage_entries::usage_date.le(to)),
            )
            .select((usage_entries::total_tokens, usage_entries::total_cost))
            .load(&mut *conn)
            .map_err(DatabaseError::from)?;
        Ok(rows
            .into_iter()
            .fold(UsageTotals::default(), |mut acc, (tokens, cost)| {
                acc.tokens += tokens;
                acc.cost += cost;
                acc.requests += 1;
                acc
            }))
    }
}
