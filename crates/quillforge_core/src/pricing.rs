//! Per-model token pricing.

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Cost per 1,000 tokens for one model family.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModelPricing {
    /// USD per 1k prompt tokens
    pub input_cost_per_1k: f64,
    /// USD per 1k completion tokens
    pub output_cost_per_1k: f64,
}

impl ModelPricing {
    /// Cost in USD for the given token counts.
    pub fn cost_of(&self, input_tokens: i64, output_tokens: i64) -> (f64, f64) {
        (
            input_tokens as f64 / 1_000.0 * self.input_cost_per_1k,
            output_tokens as f64 / 1_000.0 * self.output_cost_per_1k,
        )
    }
}

/// Pricing table resolved by model-identifier substring.
///
/// Identifiers containing both `gpt-4` and `turbo` (including dated variants
/// like `gpt-4-turbo-preview`) get the turbo tier. Plain `gpt-4` identifiers
/// get the base tier, which also serves as the fallback for models the table
/// has never seen, so metering never fails on an unknown identifier.
///
/// # Examples
///
/// ```
/// use quillforge_core::PricingTable;
///
/// let table = PricingTable::default();
/// let turbo = table.price_of("gpt-4-turbo-preview");
/// assert_eq!(turbo.input_cost_per_1k, 0.005);
/// let base = table.price_of("gpt-4");
/// assert_eq!(base.output_cost_per_1k, 0.03);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricingTable {
    /// Base gpt-4 tier, also the fallback
    pub gpt4: ModelPricing,
    /// gpt-4 turbo tier
    pub gpt4_turbo: ModelPricing,
}

impl Default for PricingTable {
    fn default() -> Self {
        Self {
            gpt4: ModelPricing {
                input_cost_per_1k: 0.01,
                output_cost_per_1k: 0.03,
            },
            gpt4_turbo: ModelPricing {
                input_cost_per_1k: 0.005,
                output_cost_per_1k: 0.015,
            },
        }
    }
}

impl PricingTable {
    /// Resolve pricing for a model identifier, case-insensitively.
    pub fn price_of(&self, model: &str) -> ModelPricing {
        let normalized = model.to_lowercase();
        if normalized.contains("gpt-4") && normalized.contains("turbo") {
            self.gpt4_turbo
        } else if normalized.contains("gpt-4") {
            self.gpt4
        } else {
            debug!(model, "no pricing entry, falling back to base tier");
            self.gpt4
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn turbo_variants_use_turbo_tier() {
        let table = PricingTable::default();
        for model in ["gpt-4-turbo", "gpt-4-turbo-preview", "gpt-4-turbo-2024-04-09"] {
            assert_eq!(table.price_of(model), table.gpt4_turbo, "{model}");
        }
    }

    #[test]
    fn plain_gpt4_uses_base_tier() {
        let table = PricingTable::default();
        assert_eq!(table.price_of("gpt-4"), table.gpt4);
        assert_eq!(table.price_of("gpt-4-0613"), table.gpt4);
    }

    #[test]
    fn matching_ignores_identifier_case() {
        let table = PricingTable::default();
        assert_eq!(table.price_of("GPT-4-Turbo"), table.gpt4_turbo);
        assert_eq!(table.price_of("GPT-4"), table.gpt4);
    }

    #[test]
    fn unknown_models_fall_back_to_base_tier() {
        let table = PricingTable::default();
        assert_eq!(table.price_of("some-future-model"), table.gpt4);
    }

    #[test]
    fn cost_scales_linearly_with_tokens() {
        let table = PricingTable::default();
        let (input, output) = table.price_of("gpt-4").cost_of(2_000, 1_000);
        assert!((input - 0.02).abs() < 1e-12);
        assert!((output - 0.03).abs() < 1e-12);
    }
}
