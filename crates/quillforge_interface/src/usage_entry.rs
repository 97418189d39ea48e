//! Usage metering value types.

use chrono::{DateTime, NaiveDate, Utc};
use quillforge_core::{OperationCategory, ServiceCategory, SuccessFlag, TokenUsage};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One metered operation, append-only.
///
/// Carries a snapshot of the pricing in force when the entry was written so
/// later price changes never rewrite history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsageEntry {
    /// Entry id
    pub id: Uuid,
    /// Organization charged for the usage
    pub organization_id: Uuid,
    /// User who triggered the operation, if known
    pub actor_id: Option<Uuid>,
    /// Engine surface that consumed the tokens
    pub service: ServiceCategory,
    /// Operation performed
    pub operation: OperationCategory,
    /// Token counts
    pub usage: TokenUsage,
    /// Prompt-side cost in USD
    pub input_cost: f64,
    /// Completion-side cost in USD
    pub output_cost: f64,
    /// Total cost in USD
    pub total_cost: f64,
    /// Model identifier
    pub model: String,
    /// Pricing snapshot: USD per 1k prompt tokens at write time
    pub input_cost_per_1k: f64,
    /// Pricing snapshot: USD per 1k completion tokens at write time
    pub output_cost_per_1k: f64,
    /// Upstream request id, if the provider returned one
    pub request_id: Option<String>,
    /// Upstream round-trip time in milliseconds
    pub response_time_ms: Option<i64>,
    /// Outcome of the operation
    pub success: SuccessFlag,
    /// Calendar date bucket (UTC)
    pub usage_date: NaiveDate,
    /// Hour-of-day bucket, 0..=23 (UTC)
    pub usage_hour: i16,
    /// Creation time
    pub created_at: DateTime<Utc>,
}

/// A usage entry as reported by the caller.
///
/// The ledger validates the token arithmetic, stamps costs, the pricing
/// snapshot, and the date/hour buckets, and assigns the id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewUsageEntry {
    /// Organization charged for the usage
    pub organization_id: Uuid,
    /// User who triggered the operation, if known
    pub actor_id: Option<Uuid>,
    /// Engine surface that consumed the tokens
    pub service: ServiceCategory,
    /// Operation performed
    pub operation: OperationCategory,
    /// Token counts
    pub usage: TokenUsage,
    /// Model identifier
    pub model: String,
    /// Upstream request id, if the provider returned one
    pub request_id: Option<String>,
    /// Upstream round-trip time in milliseconds
    pub response_time_ms: Option<i64>,
    /// Outcome of the operation
    pub success: SuccessFlag,
}

/// Aggregate usage over a period.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct UsageTotals {
    /// Total tokens consumed
    pub tokens: i64,
    /// Total cost in USD
    pub cost: f64,
    /// Number of metered operations
    pub requests: i64,
}

/// Usage totals for one calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailyUsage {
    /// The day (UTC)
    pub date: NaiveDate,
    /// Totals for that day
    pub totals: UsageTotals,
}
