//! Diesel row models and their conversions to domain types.
//!
//! Enum-valued columns are stored as snake_case text; a tag that no longer
//! parses is a serialization fault, never a silent fallback.

use crate::schema::{content_revisions, edit_records, usage_entries};
use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;
use quillforge_core::{
    ContentStatus, ContentType, EditCategory, OperationCategory, ServiceCategory, SuccessFlag,
    TokenUsage,
};
use quillforge_error::{DatabaseError, DatabaseErrorKind};
use quillforge_interface::{
    ContentRevision, EditRecord, NewContentRevision, NewEditRecord, UsageEntry,
};
use std::str::FromStr;
use uuid::Uuid;

fn parse_tag<T: FromStr>(value: &str, column: &str) -> Result<T, DatabaseError> {
    T::from_str(value).map_err(|_| {
        DatabaseError::new(DatabaseErrorKind::Serialization(format!(
            "invalid {column} tag: {value}"
        )))
    })
}

/// Row of the `content_revisions` table.
#[derive(Debug, Clone, Queryable, Identifiable, Selectable)]
#[diesel(table_name = content_revisions)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ContentRevisionRow {
    pub id: Uuid,
    pub lineage_id: Uuid,
    pub organization_id: Uuid,
    pub created_by: Uuid,
    pub style_profile_id: Option<Uuid>,
    pub title: String,
    pub brief: Option<String>,
    pub content_type: String,
    pub body: String,
    pub word_count: i32,
    pub character_count: i32,
    pub version: i32,
    pub is_current: bool,
    pub input_tokens: i64,
    pub output_tokens: i64,
    pub total_tokens: i64,
    pub estimated_cost: f64,
    pub model: String,
    pub prompt: Option<String>,
    pub status: String,
    pub is_archived: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insertable row for `content_revisions`.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = content_revisions)]
pub struct NewContentRevisionRow {
    pub id: Uuid,
    pub lineage_id: Uuid,
    pub organization_id: Uuid,
    pub created_by: Uuid,
    pub style_profile_id: Option<Uuid>,
    pub title: String,
    pub brief: Option<String>,
    pub content_type: String,
    pub body: String,
    pub word_count: i32,
    pub character_count: i32,
    pub version: i32,
    pub is_current: bool,
    pub input_tokens: i64,
    pub output_tokens: i64,
    pub total_tokens: i64,
    pub estimated_cost: f64,
    pub model: String,
    pub prompt: Option<String>,
    pub status: String,
    pub is_archived: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl NewContentRevisionRow {
    /// Materialize a domain revision with a fresh id and timestamps.
    pub fn from_domain(new: NewContentRevision) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            lineage_id: new.lineage_id,
            organization_id: new.organization_id,
            created_by: new.created_by,
            style_profile_id: new.style_profile_id,
            title: new.title,
            brief: new.brief,
            content_type: new.content_type.to_string(),
            body: new.body,
            word_count: new.word_count,
            character_count: new.character_count,
            version: new.version,
            is_current: new.is_current,
            input_tokens: new.usage.input_tokens,
            output_tokens: new.usage.output_tokens,
            total_tokens: new.usage.total_tokens,
            estimated_cost: new.estimated_cost,
            model: new.model,
            prompt: new.prompt,
            status: new.status.to_string(),
            is_archived: new.is_archived,
            created_at: now,
            updated_at: now,
        }
    }
}

impl TryFrom<ContentRevisionRow> for ContentRevision {
    type Error = DatabaseError;

    fn try_from(row: ContentRevisionRow) -> Result<Self, Self::Error> {
        Ok(ContentRevision {
            id: row.id,
            lineage_id: row.lineage_id,
            organization_id: row.organization_id,
            created_by: row.created_by,
            style_profile_id: row.style_profile_id,
            title: row.title,
            brief: row.brief,
            content_type: parse_tag::<ContentType>(&row.content_type, "content_type")?,
            body: row.body,
            word_count: row.word_count,
            character_count: row.character_count,
            version: row.version,
            is_current: row.is_current,
            usage: TokenUsage {
                input_tokens: row.input_tokens,
                output_tokens: row.output_tokens,
                total_tokens: row.total_tokens,
            },
            estimated_cost: row.estimated_cost,
            model: row.model,
            prompt: row.prompt,
            status: parse_tag::<ContentStatus>(&row.status, "status")?,
            is_archived: row.is_archived,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Row of the `edit_records` table.
#[derive(Debug, Clone, Queryable, Identifiable, Selectable)]
#[diesel(table_name = edit_records)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct EditRecordRow {
    pub id: Uuid,
    pub lineage_id: Uuid,
    pub revision_id: Uuid,
    pub edited_by: Uuid,
    pub sequence: i32,
    pub instruction: String,
    pub category: String,
    pub previous_text: String,
    pub new_text: String,
    pub diff_summary: String,
    pub diff_lines: serde_json::Value,
    pub previous_word_count: i32,
    pub new_word_count: i32,
    pub word_count_delta: i32,
    pub previous_character_count: i32,
    pub new_character_count: i32,
    pub character_count_delta: i32,
    pub input_tokens: i64,
    pub output_tokens: i64,
    pub total_tokens: i64,
    pub estimated_cost: f64,
    pub model: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

/// Insertable row for `edit_records`.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = edit_records)]
pub struct NewEditRecordRow {
    pub id: Uuid,
    pub lineage_id: Uuid,
    pub revision_id: Uuid,
    pub edited_by: Uuid,
    pub sequence: i32,
    pub instruction: String,
    pub category: String,
    pub previous_text: String,
    pub new_text: String,
    pub diff_summary: String,
    pub diff_lines: serde_json::Value,
    pub previous_word_count: i32,
    pub new_word_count: i32,
    pub word_count_delta: i32,
    pub previous_character_count: i32,
    pub new_character_count: i32,
    pub character_count_delta: i32,
    pub input_tokens: i64,
    pub output_tokens: i64,
    pub total_tokens: i64,
    pub estimated_cost: f64,
    pub model: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl NewEditRecordRow {
    /// Materialize a domain edit against the revision it produced.
    pub fn from_domain(new: NewEditRecord, revision_id: Uuid) -> Result<Self, DatabaseError> {
        Ok(Self {
            id: Uuid::new_v4(),
            lineage_id: new.lineage_id,
            revision_id,
            edited_by: new.edited_by,
            sequence: new.sequence,
            instruction: new.instruction,
            category: new.category.to_string(),
            previous_text: new.previous_text,
            new_text: new.new_text,
            diff_summary: new.diff_summary,
            diff_lines: serde_json::to_value(&new.diff_lines)?,
            previous_word_count: new.previous_word_count,
            new_word_count: new.new_word_count,
            word_count_delta: new.word_count_delta,
            previous_character_count: new.previous_character_count,
            new_character_count: new.new_character_count,
            character_count_delta: new.character_count_delta,
            input_tokens: new.usage.input_tokens,
            output_tokens: new.usage.output_tokens,
            total_tokens: new.usage.total_tokens,
            estimated_cost: new.estimated_cost,
            model: new.model,
            status: new.status.to_string(),
            created_at: Utc::now(),
        })
    }
}

impl TryFrom<EditRecordRow> for EditRecord {
    type Error = DatabaseError;

    fn try_from(row: EditRecordRow) -> Result<Self, Self::Error> {
        Ok(EditRecord {
            id: row.id,
            lineage_id: row.lineage_id,
            revision_id: row.revision_id,
            edited_by: row.edited_by,
            sequence: row.sequence,
            instruction: row.instruction,
            category: parse_tag::<EditCategory>(&row.category, "category")?,
            previous_text: row.previous_text,
            new_text: row.new_text,
            diff_summary: row.diff_summary,
            diff_lines: serde_json::from_value(row.diff_lines)?,
            previous_word_count: row.previous_word_count,
            new_word_count: row.new_word_count,
            word_count_delta: row.word_count_delta,
            previous_character_count: row.previous_character_count,
            new_character_count: row.new_character_count,
            character_count_delta: row.character_count_delta,
            usage: TokenUsage {
                input_tokens: row.input_tokens,
                output_tokens: row.output_tokens,
                total_tokens: row.total_tokens,
            },
            estimated_cost: row.estimated_cost,
            model: row.model,
            status: parse_tag::<ContentStatus>(&row.status, "status")?,
            created_at: row.created_at,
        })
    }
}

/// Row of the `usage_entries` table; insertable as-is because the ledger
/// stamps every field before the write.
#[derive(Debug, Clone, Queryable, Identifiable, Selectable, Insertable)]
#[diesel(table_name = usage_entries)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UsageEntryRow {
    pub id: Uuid,
    pub organization_id: Uuid,
    pub actor_id: Option<Uuid>,
    pub service: String,
    pub operation: String,
    pub input_tokens: i64,
    pub output_tokens: i64,
    pub total_tokens: i64,
    pub input_cost: f64,
    pub output_cost: f64,
    pub total_cost: f64,
    pub model: String,
    pub input_cost_per_1k: f64,
    pub output_cost_per_1k: f64,
    pub request_id: Option<String>,
    pub response_time_ms: Option<i64>,
    pub success: String,
    pub usage_date: NaiveDate,
    pub usage_hour: i16,
    pub created_at: DateTime<Utc>,
}

impl From<UsageEntry> for UsageEntryRow {
    fn from(entry: UsageEntry) -> Self {
        Self {
            id: entry.id,
            organization_id: entry.organization_id,
            actor_id: entry.actor_id,
            service: entry.service.to_string(),
            operation: entry.operation.to_string(),
            input_tokens: entry.usage.input_tokens,
            output_tokens: entry.usage.output_tokens,
            total_tokens: entry.usage.total_tokens,
            input_cost: entry.input_cost,
            output_cost: entry.output_cost,
            total_cost: entry.total_cost,
            model: entry.model,
            input_cost_per_1k: entry.input_cost_per_1k,
            output_cost_per_1k: entry.output_cost_per_1k,
            request_id: entry.request_id,
            response_time_ms: entry.response_time_ms,
            success: entry.success.to_string(),
            usage_date: entry.usage_date,
            usage_hour: entry.usage_hour,
            created_at: entry.created_at,
        }
    }
}

impl TryFrom<UsageEntryRow> for UsageEntry {
    type Error = DatabaseError;

    fn try_from(row: UsageEntryRow) -> Result<Self, Self::Error> {
        Ok(UsageEntry {
            id: row.id,
            organization_id: row.organization_id,
            actor_id: row.actor_id,
            service: parse_tag::<ServiceCategory>(&row.service, "service")?,
            operation: parse_tag::<OperationCategory>(&row.operation, "operation")?,
            usage: TokenUsage {
                input_tokens: row.input_tokens,
                output_tokens: row.output_tokens,
                total_tokens: row.total_tokens,
            },
            input_cost: row.input_cost,
            output_cost: row.output_cost,
            total_cost: row.total_cost,
            model: row.model,
            input_cost_per_1k: row.input_cost_per_1k,
            output_cost_per_1k: row.output_cost_per_1k,
            request_id: row.request_id,
            response_time_ms: row.response_time_ms,
            success: parse_tag::<SuccessFlag>(&row.success, "success")?,
            usage_date: row.usage_date,
            usage_hour: row.usage_hour,
            created_at: row.created_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quillforge_core::ContentType;

    #[test]
    fn enum_tags_round_trip_through_text_columns() {
        assert_eq!(
            parse_tag::<ContentType>("blog_post", "content_type").ok(),
            Some(ContentType::BlogPost)
        );
        assert_eq!(
            parse_tag::<SuccessFlag>("partial", "success").ok(),
            Some(SuccessFlag::Partial)
        );
        assert!(parse_tag::<ContentType>("haiku", "content_type").is_err());
    }

    #[test]
    fn serde_failures_map_to_serialization_errors() {
        let bad = serde_json::from_str::<serde_json::Value>("{").expect_err("malformed json");
        let err = DatabaseError::from(bad);
        assert!(matches!(err.kind, DatabaseErrorKind::Serialization(_)));
    }

    // Row construction happens before any write, so the edit row can bind
    // to the revision id it will point at once both rows are inserted.
    #[test]
    fn edit_rows_bind_to_the_prebuilt_revision_id() {
        let lineage_id = Uuid::new_v4();
        let revision_values = NewContentRevisionRow::from_domain(NewContentRevision {
            lineage_id,
            organization_id: Uuid::new_v4(),
            created_by: Uuid::new_v4(),
            style_profile_id: None,
            title: "Draft".to_string(),
            brief: None,
            content_type: ContentType::Article,
            body: "Second draft body.".to_string(),
            word_count: 3,
            character_count: 18,
            version: 2,
            is_current: true,
            usage: TokenUsage::new(10, 20),
            estimated_cost: 0.001,
            model: "gpt-4".to_string(),
            prompt: None,
            status: ContentStatus::Completed,
            is_archived: false,
        });
        let edit_values = NewEditRecordRow::from_domain(
            NewEditRecord {
                lineage_id,
                edited_by: Uuid::new_v4(),
                sequence: 1,
                instruction: "Tighten it".to_string(),
                category: EditCategory::Clarity,
                previous_text: "First draft body.".to_string(),
                new_text: "Second draft body.".to_string(),
                diff_summary: "Content modified with same word count".to_string(),
                diff_lines: vec!["- First draft body.".to_string()],
                previous_word_count: 3,
                new_word_count: 3,
                word_count_delta: 0,
                previous_character_count: 17,
                new_character_count: 18,
                character_count_delta: 1,
                usage: TokenUsage::new(10, 20),
                estimated_cost: 0.001,
                model: "gpt-4".to_string(),
                status: ContentStatus::Completed,
            },
            revision_values.id,
        )
        .expect("edit row builds");

        assert_eq!(edit_values.revision_id, revision_values.id);
        assert!(edit_values.diff_lines.is_array());
    }
}
