//! End-to-end orchestrator tests over the in-memory stores and a scripted
//! provider driver.

use async_trait::async_trait;
use chrono::Utc;
use quillforge::{
    Completion, ContentFilter, ContentOrchestrator, ContentType, EditCategory, EditContentRequest,
    EngineConfig, GenerateContentRequest, InMemoryContentStore, InMemoryUsageStore,
    MetadataUpdate, OperationCategory, PlanSource, PlanTier, PricingTable, QuillforgeError,
    QuillforgeErrorKind, QuillforgeResult, ServiceCategory, StyleGuidanceSource, SuccessFlag,
    TextCompletion, TokenUsage, UsageEntry, UsageLedger, UsageStore,
};
use quillforge_error::{GenerationError, GenerationErrorKind, LimitExceededErrorKind};
use quillforge_interface::NewUsageEntry;
use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use uuid::Uuid;

#[derive(Clone)]
struct ScriptedDriver {
    responses: Arc<Mutex<VecDeque<Result<Completion, GenerationErrorKind>>>>,
    prompts: Arc<Mutex<Vec<String>>>,
    calls: Arc<AtomicUsize>,
}

impl ScriptedDriver {
    fn with_texts(texts: &[&str]) -> Self {
        let responses = texts
            .iter()
            .map(|text| {
                Ok(Completion {
                    text: text.to_string(),
                    input_tokens: 300,
                    output_tokens: 700,
                    request_id: Some("req-1".to_string()),
                })
            })
            .collect();
        Self {
            responses: Arc::new(Mutex::new(responses)),
            prompts: Arc::new(Mutex::new(Vec::new())),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn last_prompt(&self) -> Option<String> {
        self.prompts.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl TextCompletion for ScriptedDriver {
    async fn complete(
        &self,
        prompt: &str,
        _model: &str,
        _temperature: f32,
        _max_tokens: u32,
    ) -> Result<Completion, GenerationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().unwrap().push(prompt.to_string());
        match self.responses.lock().unwrap().pop_front() {
            Some(Ok(completion)) => Ok(completion),
            Some(Err(kind)) => Err(GenerationError::new(kind)),
            None => Err(GenerationError::new(GenerationErrorKind::Upstream(
                "script exhausted".to_string(),
            ))),
        }
    }
}

struct StaticPlans(PlanTier);

#[async_trait]
impl PlanSource for StaticPlans {
    async fn plan_of(&self, _organization_id: Uuid) -> QuillforgeResult<PlanTier> {
        Ok(self.0)
    }
}

struct StaticStyles(Option<String>);

#[async_trait]
impl StyleGuidanceSource for StaticStyles {
    async fn guidance_for(&self, _style_profile_id: Uuid) -> QuillforgeResult<Option<String>> {
        Ok(self.0.clone())
    }
}

struct Harness {
    orchestrator: ContentOrchestrator<ScriptedDriver>,
    driver: ScriptedDriver,
    usage_store: Arc<InMemoryUsageStore>,
}

fn harness(tier: PlanTier, style: Option<&str>, config: EngineConfig, texts: &[&str]) -> Harness {
    let driver = ScriptedDriver::with_texts(texts);
    let usage_store = Arc::new(InMemoryUsageStore::new());
    Harness {
        orchestrator: ContentOrchestrator::new(
            driver.clone(),
            Arc::new(InMemoryContentStore::new()),
            usage_store.clone(),
            Arc::new(StaticPlans(tier)),
            Arc::new(StaticStyles(style.map(str::to_string))),
            config,
        ),
        driver,
        usage_store,
    }
}

fn generate_request(target_length: Option<u32>) -> GenerateContentRequest {
    GenerateContentRequest {
        title: "Quarterly update".to_string(),
        brief: Some("Cover the launch highlights.".to_string()),
        content_type: ContentType::BlogPost,
        style_profile_id: None,
        target_length,
        additional_instructions: None,
        model: None,
        deadline: None,
    }
}

fn edit_request(instruction: &str) -> EditContentRequest {
    EditContentRequest {
        instruction: instruction.to_string(),
        category: EditCategory::Clarity,
        model: None,
        deadline: None,
    }
}

async fn entries_today(store: &InMemoryUsageStore, organization_id: Uuid) -> Vec<UsageEntry> {
    let today = Utc::now().date_naive();
    store
        .entries_in_range(organization_id, today, today)
        .await
        .expect("entries load")
}

/// Seed recorded usage directly through a ledger sharing the same store.
async fn seed_usage(store: Arc<InMemoryUsageStore>, organization_id: Uuid, tokens: i64) {
    let ledger = UsageLedger::new(store, PricingTable::default());
    ledger
        .record(NewUsageEntry {
            organization_id,
            actor_id: None,
            service: ServiceCategory::ContentGeneration,
            operation: OperationCategory::Generate,
            usage: TokenUsage::new(tokens / 2, tokens - tokens / 2),
            model: "gpt-4".to_string(),
            request_id: None,
            response_time_ms: None,
            success: SuccessFlag::Success,
        })
        .await
        .expect("seed entry records");
}

fn assert_daily_limit_error(err: &QuillforgeError) {
    match err.kind() {
        QuillforgeErrorKind::LimitExceeded(limit) => {
            assert!(matches!(
                limit.kind,
                LimitExceededErrorKind::DailyTokens { .. }
            ));
        }
        other => panic!("expected a daily limit error, got {other}"),
    }
}

#[tokio::test]
async fn generate_creates_version_one_and_meters_usage() {
    let harness = harness(
        PlanTier::Pro,
        None,
        EngineConfig::default(),
        &["A fresh launch post. It covers the highlights.\n\nAnd a closing note."],
    );
    let org = Uuid::new_v4();
    let user = Uuid::new_v4();

    let generated = harness
        .orchestrator
        .generate_content(org, user, generate_request(Some(200)))
        .await
        .expect("generation succeeds");

    assert_eq!(generated.revision.version, 1);
    assert!(generated.revision.is_current);
    assert_eq!(generated.revision.word_count, 12);
    assert_eq!(generated.revision.created_by, user);
    assert!(generated.warnings.is_empty());

    assert_eq!(generated.usage_entry.usage.total_tokens, 1_000);
    assert_eq!(generated.usage_entry.service, ServiceCategory::ContentGeneration);
    // 300 input and 700 output on the default turbo pricing
    assert!((generated.usage_entry.total_cost - 0.012).abs() < 1e-9);

    let limits = harness
        .orchestrator
        .usage_limits(org)
        .await
        .expect("limits load");
    assert_eq!(limits.daily_tokens_used, 1_000);
    assert!(limits.allowed());
}

#[tokio::test]
async fn blank_title_is_rejected_before_the_provider_call() {
    let harness = harness(PlanTier::Pro, None, EngineConfig::default(), &["unused"]);
    let org = Uuid::new_v4();

    let mut request = generate_request(None);
    request.title = "   ".to_string();
    let err = harness
        .orchestrator
        .generate_content(org, Uuid::new_v4(), request)
        .await
        .expect_err("blank title is invalid");
    assert!(matches!(err.kind(), QuillforgeErrorKind::Validation(_)));

    assert_eq!(harness.driver.calls(), 0);
    assert!(entries_today(&harness.usage_store, org).await.is_empty());
}

#[tokio::test]
async fn out_of_range_target_length_is_rejected() {
    let harness = harness(PlanTier::Pro, None, EngineConfig::default(), &["unused"]);
    let org = Uuid::new_v4();

    for target in [50, 9_000] {
        let err = harness
            .orchestrator
            .generate_content(org, Uuid::new_v4(), generate_request(Some(target)))
            .await
            .expect_err("target outside 100..=5000 is invalid");
        assert!(matches!(err.kind(), QuillforgeErrorKind::Validation(_)));
    }
    assert_eq!(harness.driver.calls(), 0);
}

#[tokio::test]
async fn limit_refusal_precedes_the_provider_call() {
    let harness = harness(PlanTier::Free, None, EngineConfig::default(), &["unused"]);
    let org = Uuid::new_v4();

    // 9,500 of the free plan's 10,000 daily tokens already recorded; a
    // 600-word request projects to roughly a thousand more.
    seed_usage(harness.usage_store.clone(), org, 9_500).await;

    let err = harness
        .orchestrator
        .generate_content(org, Uuid::new_v4(), generate_request(Some(600)))
        .await
        .expect_err("projected overshoot is refused");
    assert_daily_limit_error(&err);

    assert_eq!(harness.driver.calls(), 0);
    // Only the seeded entry; the refused attempt metered nothing.
    assert_eq!(entries_today(&harness.usage_store, org).await.len(), 1);
}

#[tokio::test]
async fn small_request_still_fits_under_a_nearly_spent_limit() {
    let harness = harness(
        PlanTier::Free,
        None,
        EngineConfig::default(),
        &["Short post body."],
    );
    let org = Uuid::new_v4();
    seed_usage(harness.usage_store.clone(), org, 9_500).await;

    let generated = harness
        .orchestrator
        .generate_content(org, Uuid::new_v4(), generate_request(Some(100)))
        .await
        .expect("a small request is admitted");
    assert_eq!(generated.revision.version, 1);
    let thresholds: Vec<u8> = generated
        .warnings
        .iter()
        .map(|w| w.threshold_percent)
        .collect();
    assert_eq!(thresholds, vec![50, 75, 90]);
}

#[tokio::test]
async fn edit_appends_version_two_and_records_the_diff() {
    let harness = harness(
        PlanTier::Pro,
        None,
        EngineConfig::default(),
        &[
            "First line of the draft.\nSecond line stays put.\nThird line to cut.",
            "First line of the draft.\nSecond line stays put.",
        ],
    );
    let org = Uuid::new_v4();
    let user = Uuid::new_v4();

    let generated = harness
        .orchestrator
        .generate_content(org, user, generate_request(None))
        .await
        .expect("generation succeeds");
    let lineage_id = generated.revision.lineage_id;

    let edited = harness
        .orchestrator
        .edit_content(org, user, lineage_id, edit_request("Cut the third line"))
        .await
        .expect("edit succeeds");

    assert_eq!(edited.revision.version, 2);
    assert!(edited.revision.is_current);
    assert_eq!(edited.edit.sequence, 1);
    assert!(edited.edit.word_count_delta < 0);
    assert!(edited.edit.diff_lines.iter().any(|l| l.starts_with("- ")));

    let history = harness
        .orchestrator
        .revision_history(org, lineage_id)
        .await
        .expect("history loads");
    assert_eq!(history.len(), 2);
    assert!(!history[0].is_current);
    assert!(history[1].is_current);

    let entries = entries_today(&harness.usage_store, org).await;
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[1].service, ServiceCategory::ContentEditing);
    assert_eq!(entries[1].operation, OperationCategory::Edit);
}

#[tokio::test]
async fn edit_cap_blocks_before_the_provider_call() {
    let config = EngineConfig {
        max_edits_per_lineage: 1,
        ..EngineConfig::default()
    };
    let harness = harness(
        PlanTier::Pro,
        None,
        config,
        &["Draft one.", "Draft two.", "unused"],
    );
    let org = Uuid::new_v4();
    let user = Uuid::new_v4();

    let generated = harness
        .orchestrator
        .generate_content(org, user, generate_request(None))
        .await
        .expect("generation succeeds");
    let lineage_id = generated.revision.lineage_id;

    harness
        .orchestrator
        .edit_content(org, user, lineage_id, edit_request("First pass"))
        .await
        .expect("first edit fits under the cap");

    let err = harness
        .orchestrator
        .edit_content(org, user, lineage_id, edit_request("Second pass"))
        .await
        .expect_err("cap refuses the second edit");
    match err.kind() {
        QuillforgeErrorKind::LimitExceeded(limit) => {
            assert_eq!(limit.kind, LimitExceededErrorKind::EditCount(1));
        }
        other => panic!("expected an edit-cap error, got {other}"),
    }
    // Generation plus one edit only.
    assert_eq!(harness.driver.calls(), 2);
}

#[tokio::test]
async fn foreign_lineage_reads_as_not_found() {
    let harness = harness(PlanTier::Pro, None, EngineConfig::default(), &["Body."]);
    let owner = Uuid::new_v4();
    let stranger = Uuid::new_v4();

    let generated = harness
        .orchestrator
        .generate_content(owner, Uuid::new_v4(), generate_request(None))
        .await
        .expect("generation succeeds");
    let lineage_id = generated.revision.lineage_id;

    let err = harness
        .orchestrator
        .current_content(stranger, lineage_id)
        .await
        .expect_err("other tenants cannot see the lineage");
    assert!(matches!(err.kind(), QuillforgeErrorKind::NotFound(_)));

    let err = harness
        .orchestrator
        .edit_content(stranger, Uuid::new_v4(), lineage_id, edit_request("Steal it"))
        .await
        .expect_err("other tenants cannot edit the lineage");
    assert!(matches!(err.kind(), QuillforgeErrorKind::NotFound(_)));
    assert_eq!(harness.driver.calls(), 1);
}

#[tokio::test]
async fn style_guidance_threads_into_the_prompt() {
    let harness = harness(
        PlanTier::Pro,
        Some("Use a wry, confident voice."),
        EngineConfig::default(),
        &["Styled body."],
    );
    let mut request = generate_request(None);
    request.style_profile_id = Some(Uuid::new_v4());

    harness
        .orchestrator
        .generate_content(Uuid::new_v4(), Uuid::new_v4(), request)
        .await
        .expect("generation succeeds");

    let prompt = harness.driver.last_prompt().expect("prompt captured");
    assert!(prompt.contains("Writing Style Guidelines:\nUse a wry, confident voice."));
}

#[tokio::test]
async fn metadata_export_and_delete_round_out_the_lifecycle() {
    let harness = harness(PlanTier::Pro, None, EngineConfig::default(), &["Body text."]);
    let org = Uuid::new_v4();
    let user = Uuid::new_v4();

    let generated = harness
        .orchestrator
        .generate_content(org, user, generate_request(None))
        .await
        .expect("generation succeeds");
    let lineage_id = generated.revision.lineage_id;

    let updated = harness
        .orchestrator
        .update_content_metadata(
            org,
            lineage_id,
            MetadataUpdate {
                title: Some("Renamed update".to_string()),
                brief: None,
                is_archived: None,
            },
        )
        .await
        .expect("metadata updates");
    assert_eq!(updated.title, "Renamed update");

    let listed = harness
        .orchestrator
        .list_content(org, &ContentFilter::default())
        .await
        .expect("listing succeeds");
    assert_eq!(listed.len(), 1);

    let export = harness
        .orchestrator
        .export_content(org, lineage_id, true)
        .await
        .expect("export succeeds");
    assert_eq!(export.revisions.len(), 1);
    assert!(export.edits.is_empty());

    let removed = harness
        .orchestrator
        .delete_content(org, lineage_id)
        .await
        .expect("deletion succeeds");
    assert_eq!(removed, 1);

    let err = harness
        .orchestrator
        .current_content(org, lineage_id)
        .await
        .expect_err("deleted lineage is gone");
    assert!(matches!(err.kind(), QuillforgeErrorKind::NotFound(_)));
}
