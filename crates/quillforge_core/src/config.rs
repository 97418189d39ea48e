//! Engine configuration.
//!
//! There is no module-level global: callers construct an [`EngineConfig`]
//! (usually via [`EngineConfig::load`]) and pass it explicitly to the
//! components that need it.

use crate::PricingTable;
use config::{Config, File, FileFormat};
use quillforge_error::{ConfigError, QuillforgeResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Backoff policy for retryable upstream failures.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Total attempts including the first call
    pub max_attempts: u32,
    /// First backoff delay in milliseconds
    pub base_delay_ms: u64,
    /// Backoff delay ceiling in milliseconds
    pub max_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay_ms: 4_000,
            max_delay_ms: 10_000,
        }
    }
}

/// Tunable knobs for the whole engine.
///
/// Deserialized from an optional `quillforge.toml` merged over these
/// defaults; a missing file yields the defaults unchanged.
///
/// # Examples
///
/// ```
/// use quillforge_core::EngineConfig;
///
/// let config = EngineConfig::default();
/// assert_eq!(config.min_target_words, 100);
/// assert_eq!(config.max_edits_per_lineage, 50);
/// assert_eq!(config.retry.max_attempts, 3);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Smallest accepted target word count
    pub min_target_words: u32,
    /// Largest accepted target word count
    pub max_target_words: u32,
    /// Edit records allowed per lineage
    pub max_edits_per_lineage: u32,
    /// Model used when the request names none
    pub default_model: String,
    /// Sampling temperature for fresh generation
    pub generate_temperature: f32,
    /// Sampling temperature for edits
    pub edit_temperature: f32,
    /// Completion token ceiling per upstream call
    pub max_completion_tokens: u32,
    /// Upstream retry policy
    pub retry: RetryConfig,
    /// Per-model pricing overrides
    pub pricing: PricingTable,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            min_target_words: 100,
            max_target_words: 5_000,
            max_edits_per_lineage: 50,
            default_model: "gpt-4-turbo-preview".to_string(),
            generate_temperature: 0.7,
            edit_temperature: 0.5,
            max_completion_tokens: 4_000,
            retry: RetryConfig::default(),
            pricing: PricingTable::default(),
        }
    }
}

impl EngineConfig {
    /// Load from `quillforge.toml` in the working directory, if present.
    pub fn load() -> QuillforgeResult<Self> {
        Self::from_file("quillforge.toml")
    }

    /// Load from a specific TOML file merged over the defaults.
    ///
    /// The file is optional; values it omits keep their defaults.
    pub fn from_file(path: impl AsRef<Path>) -> QuillforgeResult<Self> {
        let path = path.as_ref().display().to_string();
        let settings = Config::builder()
            .add_source(File::new(&path, FileFormat::Toml).required(false))
            .build()
            .map_err(|e| ConfigError::new(e.to_string()))?;
        let config: Self = settings
            .try_deserialize()
            .map_err(|e| ConfigError::new(e.to_string()))?;
        config.validated()
    }

    fn validated(self) -> QuillforgeResult<Self> {
        if self.min_target_words == 0 || self.min_target_words > self.max_target_words {
            return Err(ConfigError::new(format!(
                "invalid target word bounds: {}..={}",
                self.min_target_words, self.max_target_words
            )))?;
        }
        if self.max_edits_per_lineage == 0 {
            return Err(ConfigError::new("max_edits_per_lineage must be positive"))?;
        }
        if self.retry.max_attempts == 0 {
            return Err(ConfigError::new("retry.max_attempts must be positive"))?;
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let config = EngineConfig::from_file("definitely-not-here.toml");
        assert_eq!(config.ok(), Some(EngineConfig::default()));
    }

    #[test]
    fn inverted_bounds_are_rejected() {
        let config = EngineConfig {
            min_target_words: 6_000,
            ..EngineConfig::default()
        };
        assert!(config.validated().is_err());
    }

    #[test]
    fn zero_retry_attempts_are_rejected() {
        let mut config = EngineConfig::default();
        config.retry.max_attempts = 0;
        assert!(config.validated().is_err());
    }
}
