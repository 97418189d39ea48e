//! In-memory usage store for tests and embedded use.

use async_trait::async_trait;
use chrono::NaiveDate;
use quillforge_error::QuillforgeResult;
use quillforge_interface::{UsageEntry, UsageStore, UsageTotals};
use std::sync::Mutex;
use uuid::Uuid;

/// Append-only [`UsageStore`] backed by a `Vec` behind a mutex.
#[derive(Debug, Default)]
pub struct InMemoryUsageStore {
    entries: Mutex<Vec<UsageEntry>>,
}

impl InMemoryUsageStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn with_entries<T>(&self, f: impl FnOnce(&Vec<UsageEntry>) -> T) -> T {
        let guard = self.entries.lock().unwrap_or_else(|p| p.into_inner());
        f(&guard)
    }
}

#[async_trait]
impl UsageStore for InMemoryUsageStore {
    async fn insert(&self, entry: UsageEntry) -> QuillforgeResult<UsageEntry> {
        let mut guard = self.entries.lock().unwrap_or_else(|p| p.into_inner());
        guard.push(entry.clone());
        Ok(entry)
    }

    async fn entries_in_range(
        &self,
        organization_id: Uuid,
        from: NaiveDate,
        to: NaiveDate,
    ) -> QuillforgeResult<Vec<UsageEntry>> {
        Ok(self.with_entries(|entries| {
            entries
                .iter()
                .filter(|e| {
                    e.organization_id == organization_id
                        && e.usage_date >= from
                        && e.usage_date <= to
                })
                .cloned()
                .collect()
        }))
    }

    async fn totals_in_range(
        &self,
        organization_id: Uuid,
        from: NaiveDate,
        to: NaiveDate,
    ) -> QuillforgeResult<UsageTotals> {
        Ok(self.with_entries(|entries| {
            entries
                .iter()
                .filter(|e| {
                    e.organization_id == organization_id
                        && e.usage_date >= from
                        && e.usage_date <= to
                })
                .fold(UsageTotals::default(), |mut acc, e| {
                    acc.tokens += e.usage.total_tokens;
                    acc.cost += e.total_cost;
                    acc.requests += 1;
                    acc
                })
        }))
    }
}
