//! The generation gateway: the single path to the upstream provider.

use quillforge_core::{
    ContentMetrics, EditCategory, EngineConfig, PricingTable, PromptSpec, RetryConfig, TextDiff,
    TokenUsage, content_metrics, text_diff,
};
use quillforge_error::{
    GenerationError, GenerationErrorKind, QuillforgeResult, RetryableError,
};
use quillforge_interface::{Completion, TextCompletion};
use std::time::{Duration, Instant};
use tokio_retry2::{Retry, RetryError, strategy::ExponentialBackoff, strategy::jitter};
use tracing::{instrument, warn};

/// Outcome of a fresh generation call.
#[derive(Debug, Clone, PartialEq)]
pub struct Generated {
    /// The generated text
    pub text: String,
    /// Metrics of the generated text
    pub metrics: ContentMetrics,
    /// Tokens consumed
    pub usage: TokenUsage,
    /// Estimated upstream cost in USD
    pub estimated_cost: f64,
    /// Model that served the call
    pub model: String,
    /// Full prompt sent upstream
    pub prompt: String,
    /// Provider request id, when available
    pub request_id: Option<String>,
    /// Wall-clock time of the call including retries, milliseconds
    pub response_time_ms: i64,
}

/// Outcome of an edit call: the rewrite plus its diff against the input.
#[derive(Debug, Clone, PartialEq)]
pub struct Edited {
    /// The rewritten text
    pub text: String,
    /// Metrics of the rewritten text
    pub metrics: ContentMetrics,
    /// Diff from the input text to the rewrite
    pub diff: TextDiff,
    /// Tokens consumed
    pub usage: TokenUsage,
    /// Estimated upstream cost in USD
    pub estimated_cost: f64,
    /// Model that served the call
    pub model: String,
    /// Full prompt sent upstream
    pub prompt: String,
    /// Provider request id, when available
    pub request_id: Option<String>,
    /// Wall-clock time of the call including retries, milliseconds
    pub response_time_ms: i64,
}

/// Gateway wrapping a [`TextCompletion`] driver with retry, pricing, and
/// prompt assembly.
///
/// Rate-limit and timeout failures are retried with jittered exponential
/// backoff; everything else surfaces immediately. An optional caller
/// deadline bounds the whole retry loop.
pub struct GenerationGateway<D> {
    driver: D,
    pricing: PricingTable,
    retry: RetryConfig,
    generate_temperature: f32,
    edit_temperature: f32,
    max_completion_tokens: u32,
}

impl<D: TextCompletion> GenerationGateway<D> {
    /// Build a gateway from a driver and the engine configuration.
    pub fn new(driver: D, config: &EngineConfig) -> Self {
        Self {
            driver,
            pricing: config.pricing,
            retry: config.retry,
            generate_temperature: config.generate_temperature,
            edit_temperature: config.edit_temperature,
            max_completion_tokens: config.max_completion_tokens,
        }
    }

    /// Access the wrapped driver.
    pub fn driver(&self) -> &D {
        &self.driver
    }

    /// Generate fresh content from a prompt specification.
    #[instrument(skip(self, spec), fields(content_type = %spec.content_type, model))]
    pub async fn generate(
        &self,
        spec: &PromptSpec<'_>,
        model: &str,
        deadline: Option<Duration>,
    ) -> QuillforgeResult<Generated> {
        let prompt = spec.render();
        let started = Instant::now();
        let completion = self
            .complete_with_retry(&prompt, model, self.generate_temperature, deadline)
            .await?;
        let response_time_ms = started.elapsed().as_millis() as i64;

        let usage = TokenUsage::new(completion.input_tokens, completion.output_tokens);
        let (input_cost, output_cost) = self
            .pricing
            .price_of(model)
            .cost_of(usage.input_tokens, usage.output_tokens);
        Ok(Generated {
            metrics: content_metrics(&completion.text),
            text: completion.text,
            usage,
            estimated_cost: input_cost + output_cost,
            model: model.to_string(),
            prompt,
            request_id: completion.request_id,
            response_time_ms,
        })
    }

    /// Rewrite existing content per an edit instruction.
    #[instrument(skip(self, current_text, instruction), fields(%category, model))]
    pub async fn edit(
        &self,
        current_text: &str,
        instruction: &str,
        category: EditCategory,
        model: &str,
        deadline: Option<Duration>,
    ) -> QuillforgeResult<Edited> {
        let prompt = render_edit_prompt(current_text, instruction, category);
        let started = Instant::now();
        let completion = self
            .complete_with_retry(&prompt, model, self.edit_temperature, deadline)
            .await?;
        let response_time_ms = started.elapsed().as_millis() as i64;

        let usage = TokenUsage::new(completion.input_tokens, completion.output_tokens);
        let (input_cost, output_cost) = self
            .pricing
            .price_of(model)
            .cost_of(usage.input_tokens, usage.output_tokens);
        Ok(Edited {
            metrics: content_metrics(&completion.text),
            diff: text_diff(current_text, &completion.text),
            text: completion.text,
            usage,
            estimated_cost: input_cost + output_cost,
            model: model.to_string(),
            prompt,
            request_id: completion.request_id,
            response_time_ms,
        })
    }

    /// One upstream call with backoff on transient failures.
    ///
    /// Backoff delays run base, 2x base, 4x base and so on, jittered and
    /// capped at the configured maximum.
    async fn complete_with_retry(
        &self,
        prompt: &str,
        model: &str,
        temperature: f32,
        deadline: Option<Duration>,
    ) -> QuillforgeResult<Completion> {
        let strategy = ExponentialBackoff::from_millis(2)
            .factor(self.retry.base_delay_ms / 2)
            .max_delay(Duration::from_millis(self.retry.max_delay_ms))
            .map(jitter)
            .take(self.retry.max_attempts.saturating_sub(1) as usize);

        let attempt = || async {
            match self
                .driver
                .complete(prompt, model, temperature, self.max_completion_tokens)
                .await
            {
                Ok(completion) if completion.text.trim().is_empty() => Err(
                    RetryError::Permanent(GenerationError::new(GenerationErrorKind::EmptyResponse)),
                ),
                Ok(completion) => Ok(completion),
                Err(e) if e.is_retryable() => {
                    warn!(error = %e, model, "transient upstream failure, will retry");
                    Err(RetryError::Transient {
                        err: e,
                        retry_after: None,
                    })
                }
                Err(e) => Err(RetryError::Permanent(e)),
            }
        };

        let retried = Retry::spawn(strategy, attempt);
        let completion = match deadline {
            Some(limit) => tokio::time::timeout(limit, retried).await.map_err(|_| {
                GenerationError::new(GenerationErrorKind::Timeout(format!(
                    "caller deadline of {}ms exceeded",
                    limit.as_millis()
                )))
            })??,
            None => retried.await?,
        };
        Ok(completion)
    }
}

/// Assemble the rewrite prompt for an edit request.
fn render_edit_prompt(current_text: &str, instruction: &str, category: EditCategory) -> String {
    format!(
        "Please edit the following content based on these instructions:\n\n\
         Edit Request: {instruction}\n\
         Edit Type: {category}\n\
         Guidance: {guidance}\n\n\
         Current Content:\n{current_text}\n\n\
         Please provide the edited version that incorporates the requested \
         changes while maintaining high quality and coherence.",
        guidance = category.guidance(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edit_prompt_carries_instruction_category_and_text() {
        let prompt = render_edit_prompt("Original body.", "Make it formal", EditCategory::Tone);
        assert!(prompt.contains("Edit Request: Make it formal"));
        assert!(prompt.contains("Edit Type: tone"));
        assert!(prompt.contains("Guidance: Adjust the tone"));
        assert!(prompt.contains("Current Content:\nOriginal body."));
    }
}
