//! The content orchestrator: the one front door to the engine.

use crate::requests::{
    EditContentRequest, EditedContent, GenerateContentRequest, GeneratedContent,
};
use chrono::NaiveDate;
use quillforge_chain::{EditSeed, LineageExport, LineageSeed, VersionChain};
use quillforge_core::{
    ContentStatus, EngineConfig, OperationCategory, PromptSpec, ServiceCategory, SuccessFlag,
    TokenUsage, validate_brief, validate_instruction, validate_title,
};
use quillforge_error::{
    LimitExceededError, LimitExceededErrorKind, NotFoundError, QuillforgeResult, ValidationError,
};
use quillforge_gateway::{Edited, Generated, GenerationGateway};
use quillforge_interface::{
    ContentFilter, ContentRevision, ContentStore, EditRecord, MetadataUpdate, NewUsageEntry,
    PlanSource, StyleGuidanceSource, TextCompletion, UsageStore,
};
use quillforge_ledger::{GateDecision, UsageAnalytics, UsageLedger};
use std::sync::Arc;
use tracing::{instrument, warn};
use uuid::Uuid;

/// Heuristic prompt-side characters per token, used only for gating.
const CHARS_PER_TOKEN: usize = 4;

/// Orchestrates one content operation end to end: validate, gate against
/// plan limits, call the provider, persist the lineage write, and meter
/// the spend.
///
/// A request projected past its plan limit is refused before the provider
/// is ever invoked, and nothing is metered for the refused attempt. Usage
/// for a completed call is always recorded, even when the lineage write
/// that follows it fails.
pub struct ContentOrchestrator<D> {
    gateway: GenerationGateway<D>,
    chain: VersionChain,
    ledger: UsageLedger,
    plans: Arc<dyn PlanSource>,
    styles: Arc<dyn StyleGuidanceSource>,
    config: EngineConfig,
}

impl<D: TextCompletion> ContentOrchestrator<D> {
    /// Wire up an orchestrator from a provider driver, the two stores, and
    /// the external sources the engine does not own.
    pub fn new(
        driver: D,
        content_store: Arc<dyn ContentStore>,
        usage_store: Arc<dyn UsageStore>,
        plans: Arc<dyn PlanSource>,
        styles: Arc<dyn StyleGuidanceSource>,
        config: EngineConfig,
    ) -> Self {
        Self {
            gateway: GenerationGateway::new(driver, &config),
            chain: VersionChain::new(content_store, config.max_edits_per_lineage),
            ledger: UsageLedger::new(usage_store, config.pricing),
            plans,
            styles,
            config,
        }
    }

    /// The configuration this orchestrator was built with.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Generate fresh content and start a new lineage at version 1.
    #[instrument(skip(self, request), fields(%organization_id, content_type = %request.content_type))]
    pub async fn generate_content(
        &self,
        organization_id: Uuid,
        requested_by: Uuid,
        request: GenerateContentRequest,
    ) -> QuillforgeResult<GeneratedContent> {
        let title = validate_title(&request.title)?;
        let brief = validate_brief(request.brief.as_deref())?;
        if let Some(words) = request.target_length
            && !(self.config.min_target_words..=self.config.max_target_words).contains(&words)
        {
            return Err(ValidationError::new(format!(
                "target length {words} outside {}..={} words",
                self.config.min_target_words, self.config.max_target_words
            )))?;
        }

        let style_guidance = match request.style_profile_id {
            Some(profile) => self.styles.guidance_for(profile).await?,
            None => None,
        };
        let spec = PromptSpec {
            content_type: request.content_type,
            title: &title,
            brief: brief.as_deref(),
            target_length: request.target_length,
            style_guidance: style_guidance.as_deref(),
            additional_instructions: request.additional_instructions.as_deref(),
        };

        let estimate = generation_estimate(
            &spec.render(),
            request.target_length,
            self.config.max_completion_tokens,
        );
        let decision = self.admit(organization_id, estimate).await?;

        let model = self.resolve_model(request.model.as_deref());
        let generated = self.gateway.generate(&spec, &model, request.deadline).await?;
        let Generated {
            text,
            usage,
            estimated_cost,
            model: served_model,
            prompt,
            request_id,
            response_time_ms,
            ..
        } = generated;

        let seed = LineageSeed {
            organization_id,
            created_by: requested_by,
            style_profile_id: request.style_profile_id,
            title,
            brief,
            content_type: request.content_type,
            body: text,
            usage,
            estimated_cost,
            model: served_model.clone(),
            prompt: Some(prompt),
            status: ContentStatus::Completed,
        };
        let revision = match self.chain.create_lineage(seed).await {
            Ok(revision) => revision,
            Err(persist_error) => {
                // Tokens were spent upstream; meter them before surfacing.
                self.record_partial(
                    organization_id,
                    requested_by,
                    ServiceCategory::ContentGeneration,
                    OperationCategory::Generate,
                    usage,
                    served_model,
                    request_id,
                    response_time_ms,
                )
                .await;
                return Err(persist_error);
            }
        };

        let usage_entry = self
            .ledger
            .record(NewUsageEntry {
                organization_id,
                actor_id: Some(requested_by),
                service: ServiceCategory::ContentGeneration,
                operation: OperationCategory::Generate,
                usage,
                model: served_model,
                request_id,
                response_time_ms: Some(response_time_ms),
                success: SuccessFlag::Success,
            })
            .await?;

        Ok(GeneratedContent {
            revision,
            usage_entry,
            warnings: decision.warnings,
        })
    }

    /// Rewrite a lineage's current revision and append the edit.
    #[instrument(skip(self, request), fields(%organization_id, %lineage_id, category = %request.category))]
    pub async fn edit_content(
        &self,
        organization_id: Uuid,
        requested_by: Uuid,
        lineage_id: Uuid,
        request: EditContentRequest,
    ) -> QuillforgeResult<EditedContent> {
        let instruction = validate_instruction(&request.instruction)?;
        let current = self.owned_current(organization_id, lineage_id).await?;

        // Cap check runs before any tokens are spent.
        let edits_so_far = self.chain.edit_count(lineage_id).await?;
        if edits_so_far >= self.chain.max_edits() as i64 {
            return Err(LimitExceededError::new(LimitExceededErrorKind::EditCount(
                self.chain.max_edits(),
            )))?;
        }

        let estimate = edit_estimate(&current.body, &instruction);
        let decision = self.admit(organization_id, estimate).await?;

        let model = self.resolve_model(request.model.as_deref());
        let edited = self
            .gateway
            .edit(
                &current.body,
                &instruction,
                request.category,
                &model,
                request.deadline,
            )
            .await?;
        let Edited {
            text,
            usage,
            estimated_cost,
            model: served_model,
            prompt,
            request_id,
            response_time_ms,
            ..
        } = edited;

        let seed = EditSeed {
            edited_by: requested_by,
            instruction,
            category: request.category,
            new_body: text,
            usage,
            estimated_cost,
            model: served_model.clone(),
            prompt: Some(prompt),
        };
        let (revision, edit) = match self.chain.append_edit(lineage_id, seed).await {
            Ok(pair) => pair,
            Err(persist_error) => {
                self.record_partial(
                    organization_id,
                    requested_by,
                    ServiceCategory::ContentEditing,
                    OperationCategory::Edit,
                    usage,
                    served_model,
                    request_id,
                    response_time_ms,
                )
                .await;
                return Err(persist_error);
            }
        };

        let usage_entry = self
            .ledger
            .record(NewUsageEntry {
                organization_id,
                actor_id: Some(requested_by),
                service: ServiceCategory::ContentEditing,
                operation: OperationCategory::Edit,
                usage,
                model: served_model,
                request_id,
                response_time_ms: Some(response_time_ms),
                success: SuccessFlag::Success,
            })
            .await?;

        Ok(EditedContent {
            revision,
            edit,
            usage_entry,
            warnings: decision.warnings,
        })
    }

    /// The current revision of a lineage owned by the organization.
    pub async fn current_content(
        &self,
        organization_id: Uuid,
        lineage_id: Uuid,
    ) -> QuillforgeResult<ContentRevision> {
        self.owned_current(organization_id, lineage_id).await
    }

    /// Full revision history of an owned lineage, oldest first.
    pub async fn revision_history(
        &self,
        organization_id: Uuid,
        lineage_id: Uuid,
    ) -> QuillforgeResult<Vec<ContentRevision>> {
        self.owned_current(organization_id, lineage_id).await?;
        self.chain.revisions_of(lineage_id).await
    }

    /// Edit history of an owned lineage, oldest first.
    pub async fn edit_history(
        &self,
        organization_id: Uuid,
        lineage_id: Uuid,
    ) -> QuillforgeResult<Vec<EditRecord>> {
        self.owned_current(organization_id, lineage_id).await?;
        self.chain.edits_of(lineage_id).await
    }

    /// Current revisions of the organization's lineages matching a filter.
    pub async fn list_content(
        &self,
        organization_id: Uuid,
        filter: &ContentFilter,
    ) -> QuillforgeResult<Vec<ContentRevision>> {
        self.chain.list(organization_id, filter).await
    }

    /// Update title, brief, or the archive flag on an owned lineage.
    ///
    /// A `None` field leaves the stored value unchanged.
    pub async fn update_content_metadata(
        &self,
        organization_id: Uuid,
        lineage_id: Uuid,
        update: MetadataUpdate,
    ) -> QuillforgeResult<ContentRevision> {
        let update = MetadataUpdate {
            title: match update.title {
                Some(title) => Some(validate_title(&title)?),
                None => None,
            },
            brief: match update.brief {
                Some(brief) => validate_brief(Some(&brief))?,
                None => None,
            },
            is_archived: update.is_archived,
        };
        self.owned_current(organization_id, lineage_id).await?;
        self.chain.update_metadata(lineage_id, update).await
    }

    /// Delete an owned lineage and its edit history. Returns revisions
    /// removed.
    pub async fn delete_content(
        &self,
        organization_id: Uuid,
        lineage_id: Uuid,
    ) -> QuillforgeResult<u64> {
        self.owned_current(organization_id, lineage_id).await?;
        self.chain.delete_lineage(lineage_id).await
    }

    /// Export an owned lineage, optionally with its edit history.
    pub async fn export_content(
        &self,
        organization_id: Uuid,
        lineage_id: Uuid,
        include_edits: bool,
    ) -> QuillforgeResult<LineageExport> {
        self.owned_current(organization_id, lineage_id).await?;
        self.chain.export_lineage(lineage_id, include_edits).await
    }

    /// The organization's plan limits and how much of them is used today.
    pub async fn usage_limits(&self, organization_id: Uuid) -> QuillforgeResult<GateDecision> {
        let tier = self.plans.plan_of(organization_id).await?;
        self.ledger.check_gate(organization_id, tier, 0).await
    }

    /// Aggregate usage analytics over `from..=to`.
    pub async fn usage_analytics(
        &self,
        organization_id: Uuid,
        from: NaiveDate,
        to: NaiveDate,
    ) -> QuillforgeResult<UsageAnalytics> {
        self.ledger.usage_analytics(organization_id, from, to).await
    }

    /// Gate one operation: refuse when recorded usage plus the estimate
    /// would pass a plan limit.
    async fn admit(
        &self,
        organization_id: Uuid,
        estimated_tokens: i64,
    ) -> QuillforgeResult<GateDecision> {
        let tier = self.plans.plan_of(organization_id).await?;
        let decision = self
            .ledger
            .check_gate(organization_id, tier, estimated_tokens)
            .await?;
        if decision.daily_exceeded {
            return Err(LimitExceededError::new(LimitExceededErrorKind::DailyTokens {
                used: decision.daily_tokens_used,
                limit: decision.limits.daily_tokens,
            }))?;
        }
        if decision.monthly_exceeded {
            return Err(LimitExceededError::new(
                LimitExceededErrorKind::MonthlyTokens {
                    used: decision.monthly_tokens_used,
                    limit: decision.limits.monthly_tokens,
                },
            ))?;
        }
        Ok(decision)
    }

    fn resolve_model(&self, requested: Option<&str>) -> String {
        requested.unwrap_or(&self.config.default_model).to_string()
    }

    /// Tenant check: a lineage owned by someone else reads as missing.
    async fn owned_current(
        &self,
        organization_id: Uuid,
        lineage_id: Uuid,
    ) -> QuillforgeResult<ContentRevision> {
        let current = self.chain.current_of(lineage_id).await?;
        if current.organization_id != organization_id {
            return Err(NotFoundError::new(format!("lineage {lineage_id} not found")))?;
        }
        Ok(current)
    }

    /// Best-effort metering for a call whose lineage write failed. The
    /// tokens were spent upstream either way.
    #[allow(clippy::too_many_arguments)]
    async fn record_partial(
        &self,
        organization_id: Uuid,
        requested_by: Uuid,
        service: ServiceCategory,
        operation: OperationCategory,
        usage: TokenUsage,
        model: String,
        request_id: Option<String>,
        response_time_ms: i64,
    ) {
        let entry = NewUsageEntry {
            organization_id,
            actor_id: Some(requested_by),
            service,
            operation,
            usage,
            model,
            request_id,
            response_time_ms: Some(response_time_ms),
            success: SuccessFlag::Partial,
        };
        if let Err(e) = self.ledger.record(entry).await {
            warn!(error = %e, %organization_id, "failed to meter a partially completed call");
        }
    }
}

/// Projected token cost of a generation, for gating only. Roughly 4
/// characters per prompt token; a requested word costs about 4/3 output
/// tokens, and with no target the completion ceiling stands in.
fn generation_estimate(prompt: &str, target_words: Option<u32>, max_completion_tokens: u32) -> i64 {
    let input = (prompt.len() / CHARS_PER_TOKEN).max(1) as i64;
    let output = match target_words {
        Some(words) => words as i64 * 4 / 3,
        None => max_completion_tokens as i64,
    };
    input + output
}

/// Projected token cost of an edit, for gating only. The rewrite is
/// assumed to come back roughly the size of its input.
fn edit_estimate(current_body: &str, instruction: &str) -> i64 {
    let input = ((current_body.len() + instruction.len()) / CHARS_PER_TOKEN).max(1) as i64;
    let output = (current_body.len() / CHARS_PER_TOKEN).max(1) as i64;
    input + output
}
