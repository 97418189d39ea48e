//! Behavioral tests for the usage ledger over the in-memory store.

use chrono::{Datelike, Utc};
use quillforge_core::{
    OperationCategory, PlanTier, PricingTable, ServiceCategory, SuccessFlag, TokenUsage,
};
use quillforge_interface::NewUsageEntry;
use quillforge_ledger::{InMemoryUsageStore, UsageLedger};
use std::sync::Arc;
use uuid::Uuid;

fn ledger() -> UsageLedger {
    UsageLedger::new(Arc::new(InMemoryUsageStore::new()), PricingTable::default())
}

fn entry(org: Uuid, tokens: i64, model: &str, success: SuccessFlag) -> NewUsageEntry {
    NewUsageEntry {
        organization_id: org,
        actor_id: Some(Uuid::new_v4()),
        service: ServiceCategory::ContentGeneration,
        operation: OperationCategory::Generate,
        usage: TokenUsage::new(tokens / 2, tokens - tokens / 2),
        model: model.to_string(),
        request_id: None,
        response_time_ms: Some(1_200),
        success,
    }
}

#[tokio::test]
async fn record_stamps_pricing_snapshot_and_costs() {
    let ledger = ledger();
    let org = Uuid::new_v4();

    let recorded = ledger
        .record(entry(org, 2_000, "gpt-4-turbo-preview", SuccessFlag::Success))
        .await
        .expect("entry records");

    assert_eq!(recorded.usage.total_tokens, 2_000);
    assert_eq!(recorded.input_cost_per_1k, 0.005);
    assert_eq!(recorded.output_cost_per_1k, 0.015);
    // 1000 input @ 0.005 + 1000 output @ 0.015
    assert!((recorded.total_cost - 0.02).abs() < 1e-9);
    assert_eq!(recorded.usage_date, Utc::now().date_naive());
    assert!((0..24).contains(&recorded.usage_hour));
}

#[tokio::test]
async fn inconsistent_token_arithmetic_is_rejected_and_not_stored() {
    let ledger = ledger();
    let org = Uuid::new_v4();

    let mut bad = entry(org, 100, "gpt-4", SuccessFlag::Success);
    bad.usage.total_tokens = 999;
    assert!(ledger.record(bad).await.is_err());

    let today = Utc::now().date_naive();
    let totals = ledger.daily_usage(org, today).await.expect("totals");
    assert_eq!(totals.tokens, 0);
    assert_eq!(totals.requests, 0);
}

#[tokio::test]
async fn daily_totals_aggregate_per_organization() {
    let ledger = ledger();
    let org = Uuid::new_v4();
    let other = Uuid::new_v4();

    for tokens in [1_000, 2_000, 3_000] {
        ledger
            .record(entry(org, tokens, "gpt-4", SuccessFlag::Success))
            .await
            .expect("records");
    }
    ledger
        .record(entry(other, 50_000, "gpt-4", SuccessFlag::Success))
        .await
        .expect("records");

    let today = Utc::now().date_naive();
    let totals = ledger.daily_usage(org, today).await.expect("totals");
    assert_eq!(totals.tokens, 6_000);
    assert_eq!(totals.requests, 3);

    let monthly = ledger
        .monthly_usage(org, today.year(), today.month())
        .await
        .expect("monthly totals");
    assert_eq!(monthly.tokens, 6_000);
}

#[tokio::test]
async fn gate_warns_at_graded_thresholds_before_refusing() {
    let ledger = ledger();
    let org = Uuid::new_v4();

    // 9,500 of the free plan's 10,000 daily tokens
    ledger
        .record(entry(org, 9_500, "gpt-4", SuccessFlag::Success))
        .await
        .expect("records");

    let decision = ledger
        .check_gate(org, PlanTier::Free, 0)
        .await
        .expect("gate decision");
    assert!(decision.allowed());
    assert!(!decision.daily_exceeded);
    let thresholds: Vec<u8> = decision
        .warnings
        .iter()
        .map(|w| w.threshold_percent)
        .collect();
    assert_eq!(thresholds, vec![50, 75, 90]);
}

#[tokio::test]
async fn gate_refuses_a_request_projected_past_the_limit() {
    let ledger = ledger();
    let org = Uuid::new_v4();

    // 9,500 recorded; a request estimated at 1,000 tokens would overshoot.
    ledger
        .record(entry(org, 9_500, "gpt-4", SuccessFlag::Success))
        .await
        .expect("records");

    let decision = ledger
        .check_gate(org, PlanTier::Free, 1_000)
        .await
        .expect("gate decision");
    assert!(decision.daily_exceeded);
    assert!(!decision.allowed());

    // An estimate that fits under the limit is still allowed.
    let decision = ledger
        .check_gate(org, PlanTier::Free, 500)
        .await
        .expect("gate decision");
    assert!(decision.allowed());
}

#[tokio::test]
async fn gate_refuses_at_the_daily_limit() {
    let ledger = ledger();
    let org = Uuid::new_v4();

    ledger
        .record(entry(org, 10_000, "gpt-4", SuccessFlag::Success))
        .await
        .expect("records");

    let decision = ledger
        .check_gate(org, PlanTier::Free, 0)
        .await
        .expect("gate decision");
    assert!(decision.daily_exceeded);
    assert!(!decision.allowed());
    assert!(decision.warnings.is_empty());
}

#[tokio::test]
async fn fresh_organization_passes_the_gate_without_warnings() {
    let ledger = ledger();
    let decision = ledger
        .check_gate(Uuid::new_v4(), PlanTier::Enterprise, 0)
        .await
        .expect("gate decision");
    assert!(decision.allowed());
    assert!(decision.warnings.is_empty());
    assert_eq!(decision.limits.daily_tokens, 10_000_000);
}

#[tokio::test]
async fn analytics_split_by_model_and_report_success_rate() {
    let ledger = ledger();
    let org = Uuid::new_v4();

    ledger
        .record(entry(org, 1_000, "gpt-4", SuccessFlag::Success))
        .await
        .expect("records");
    ledger
        .record(entry(org, 2_000, "gpt-4-turbo-preview", SuccessFlag::Success))
        .await
        .expect("records");
    ledger
        .record(entry(org, 3_000, "gpt-4-turbo-preview", SuccessFlag::Partial))
        .await
        .expect("records");

    let today = Utc::now().date_naive();
    let analytics = ledger
        .usage_analytics(org, today, today)
        .await
        .expect("analytics");

    assert_eq!(analytics.totals.tokens, 6_000);
    assert_eq!(analytics.totals.requests, 3);
    assert!((analytics.success_rate - 2.0 / 3.0).abs() < 1e-9);
    assert_eq!(analytics.by_model.len(), 2);
    assert_eq!(
        analytics.by_model["gpt-4-turbo-preview"].tokens,
        5_000
    );
    assert_eq!(analytics.daily.len(), 1);
    assert_eq!(analytics.daily[0].totals.requests, 3);

    assert!(ledger.usage_analytics(org, today, today.pred_opt().expect("date")).await.is_err());
}
