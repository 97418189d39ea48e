//! The usage ledger: metering, aggregation, and plan-limit gating.

use chrono::{Datelike, Months, NaiveDate, Timelike, Utc};
use quillforge_core::{PlanLimits, PlanTier, PricingTable};
use quillforge_error::{QuillforgeResult, ValidationError};
use quillforge_interface::{DailyUsage, NewUsageEntry, UsageEntry, UsageStore, UsageTotals};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;

/// Warning thresholds checked against the daily token limit, in percent.
const WARNING_THRESHOLDS: [u8; 3] = [50, 75, 90];

/// One usage warning: a limit threshold the organization has crossed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsageWarning {
    /// Threshold crossed, percent of the daily token limit
    pub threshold_percent: u8,
    /// Actual usage, percent of the daily token limit
    pub percent_used: f64,
    /// Human-readable description
    pub message: String,
}

/// Outcome of a plan-limit check for one organization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GateDecision {
    /// The plan tier the decision was made against
    pub tier: PlanTier,
    /// Limits in force for that tier
    pub limits: PlanLimits,
    /// Tokens durably recorded today
    pub daily_tokens_used: i64,
    /// Tokens durably recorded this month
    pub monthly_tokens_used: i64,
    /// Daily token limit reached or passed
    pub daily_exceeded: bool,
    /// Monthly token limit reached or passed
    pub monthly_exceeded: bool,
    /// Thresholds crossed short of the limit
    pub warnings: Vec<UsageWarning>,
}

impl GateDecision {
    /// True when the organization may spend more tokens right now.
    pub fn allowed(&self) -> bool {
        !self.daily_exceeded && !self.monthly_exceeded
    }
}

/// Analytics view over an organization's recorded usage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsageAnalytics {
    /// First day of the period (inclusive)
    pub from: NaiveDate,
    /// Last day of the period (inclusive)
    pub to: NaiveDate,
    /// Totals over the whole period
    pub totals: UsageTotals,
    /// Per-day breakdown, days with no usage omitted
    pub daily: Vec<DailyUsage>,
    /// Share of entries flagged success, 0.0..=1.0; 1.0 for an empty period
    pub success_rate: f64,
    /// Totals per service category
    pub by_service: BTreeMap<String, UsageTotals>,
    /// Totals per model identifier
    pub by_model: BTreeMap<String, UsageTotals>,
}

/// Usage ledger over a [`UsageStore`].
///
/// All gating reads go through the store, so only durably recorded usage
/// ever counts against a limit.
pub struct UsageLedger {
    store: Arc<dyn UsageStore>,
    pricing: PricingTable,
}

impl UsageLedger {
    /// Build a ledger over a store with a pricing table.
    pub fn new(store: Arc<dyn UsageStore>, pricing: PricingTable) -> Self {
        Self { store, pricing }
    }

    /// Limits table for a plan tier.
    pub fn limits_for(&self, tier: PlanTier) -> PlanLimits {
        PlanLimits::for_tier(tier)
    }

    /// Pricing for a model identifier.
    pub fn price_of(&self, model: &str) -> quillforge_core::ModelPricing {
        self.pricing.price_of(model)
    }

    /// Validate and persist one usage entry.
    ///
    /// Stamps the pricing snapshot, derived costs, and the UTC date/hour
    /// buckets. Inconsistent token arithmetic is a validation error and
    /// nothing is written.
    #[instrument(skip(self, entry), fields(organization_id = %entry.organization_id, model = %entry.model))]
    pub async fn record(&self, entry: NewUsageEntry) -> QuillforgeResult<UsageEntry> {
        if !entry.usage.is_consistent() {
            return Err(ValidationError::new(format!(
                "inconsistent token usage: {} + {} != {}",
                entry.usage.input_tokens, entry.usage.output_tokens, entry.usage.total_tokens
            )))?;
        }
        if let Some(ms) = entry.response_time_ms
            && ms < 0
        {
            return Err(ValidationError::new("negative response time"))?;
        }

        let pricing = self.pricing.price_of(&entry.model);
        let (input_cost, output_cost) =
            pricing.cost_of(entry.usage.input_tokens, entry.usage.output_tokens);
        let now = Utc::now();

        let full = UsageEntry {
            id: Uuid::new_v4(),
            organization_id: entry.organization_id,
            actor_id: entry.actor_id,
            service: entry.service,
            operation: entry.operation,
            usage: entry.usage,
            input_cost,
            output_cost,
            total_cost: input_cost + output_cost,
            model: entry.model,
            input_cost_per_1k: pricing.input_cost_per_1k,
            output_cost_per_1k: pricing.output_cost_per_1k,
            request_id: entry.request_id,
            response_time_ms: entry.response_time_ms,
            success: entry.success,
            usage_date: now.date_naive(),
            usage_hour: now.hour() as i16,
            created_at: now,
        };
        self.store.insert(full).await
    }

    /// Token/cost/request totals for one calendar day.
    pub async fn daily_usage(
        &self,
        organization_id: Uuid,
        date: NaiveDate,
    ) -> QuillforgeResult<UsageTotals> {
        self.store.totals_in_range(organization_id, date, date).await
    }

    /// Token/cost/request totals for one calendar month.
    pub async fn monthly_usage(
        &self,
        organization_id: Uuid,
        year: i32,
        month: u32,
    ) -> QuillforgeResult<UsageTotals> {
        let (from, to) = month_bounds(year, month)?;
        self.store.totals_in_range(organization_id, from, to).await
    }

    /// Check an organization's recorded usage against its plan limits.
    ///
    /// `estimated_tokens` is the projected cost of the operation being
    /// gated; a request that would push recorded usage past the limit is
    /// refused before any tokens are spent. Warnings grade recorded usage
    /// only.
    #[instrument(skip(self), fields(%organization_id, %tier, estimated_tokens))]
    pub async fn check_gate(
        &self,
        organization_id: Uuid,
        tier: PlanTier,
        estimated_tokens: i64,
    ) -> QuillforgeResult<GateDecision> {
        let limits = PlanLimits::for_tier(tier);
        let today = Utc::now().date_naive();
        let daily = self.daily_usage(organization_id, today).await?;
        let monthly = self
            .monthly_usage(organization_id, today.year(), today.month())
            .await?;

        let percent_used = daily.tokens as f64 * 100.0 / limits.daily_tokens as f64;
        let daily_exceeded = daily.tokens >= limits.daily_tokens
            || daily.tokens + estimated_tokens > limits.daily_tokens;
        let monthly_exceeded = monthly.tokens >= limits.monthly_tokens
            || monthly.tokens + estimated_tokens > limits.monthly_tokens;

        let warnings = if daily_exceeded {
            Vec::new()
        } else {
            WARNING_THRESHOLDS
                .iter()
                .filter(|&&t| percent_used >= t as f64)
                .map(|&threshold_percent| UsageWarning {
                    threshold_percent,
                    percent_used,
                    message: format!(
                        "daily token usage at {percent_used:.1}% of the {} limit",
                        limits.daily_tokens
                    ),
                })
                .collect()
        };

        Ok(GateDecision {
            tier,
            limits,
            daily_tokens_used: daily.tokens,
            monthly_tokens_used: monthly.tokens,
            daily_exceeded,
            monthly_exceeded,
            warnings,
        })
    }

    /// Aggregate analytics over `from..=to`.
    pub async fn usage_analytics(
        &self,
        organization_id: Uuid,
        from: NaiveDate,
        to: NaiveDate,
    ) -> QuillforgeResult<UsageAnalytics> {
        if from > to {
            return Err(ValidationError::new("analytics period is inverted"))?;
        }
        let entries = self
            .store
            .entries_in_range(organization_id, from, to)
            .await?;

        let mut totals = UsageTotals::default();
        let mut per_day: BTreeMap<NaiveDate, UsageTotals> = BTreeMap::new();
        let mut by_service: BTreeMap<String, UsageTotals> = BTreeMap::new();
        let mut by_model: BTreeMap<String, UsageTotals> = BTreeMap::new();
        let mut successes = 0usize;

        for entry in &entries {
            accumulate(&mut totals, entry);
            accumulate(per_day.entry(entry.usage_date).or_default(), entry);
            accumulate(by_service.entry(entry.service.to_string()).or_default(), entry);
            accumulate(by_model.entry(entry.model.clone()).or_default(), entry);
            if entry.success == quillforge_core::SuccessFlag::Success {
                successes += 1;
            }
        }

        let success_rate = if entries.is_empty() {
            1.0
        } else {
            successes as f64 / entries.len() as f64
        };

        Ok(UsageAnalytics {
            from,
            to,
            totals,
            daily: per_day
                .into_iter()
                .map(|(date, totals)| DailyUsage { date, totals })
                .collect(),
            success_rate,
            by_service,
            by_model,
        })
    }
}

fn accumulate(acc: &mut UsageTotals, entry: &UsageEntry) {
    acc.tokens += entry.usage.total_tokens;
    acc.cost += entry.total_cost;
    acc.requests += 1;
}

/// First and last day of a calendar month.
fn month_bounds(year: i32, month: u32) -> QuillforgeResult<(NaiveDate, NaiveDate)> {
    let from = NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| ValidationError::new(format!("invalid month: {year}-{month}")))?;
    let to = from
        .checked_add_months(Months::new(1))
        .and_then(|next| next.pred_opt())
        .ok_or_else(|| ValidationError::new(format!("invalid month: {year}-{month}")))?;
    Ok((from, to))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn month_bounds_cover_whole_months() {
        let (from, to) = month_bounds(2026, 2).expect("valid month");
        assert_eq!(from, NaiveDate::from_ymd_opt(2026, 2, 1).expect("date"));
        assert_eq!(to, NaiveDate::from_ymd_opt(2026, 2, 28).expect("date"));

        let (_, december_end) = month_bounds(2025, 12).expect("valid month");
        assert_eq!(
            december_end,
            NaiveDate::from_ymd_opt(2025, 12, 31).expect("date")
        );
    }

    #[test]
    fn month_bounds_reject_bad_months() {
        assert!(month_bounds(2026, 13).is_err());
        assert!(month_bounds(2026, 0).is_err());
    }
}
