//! Subscription plan tiers and their usage limits.

use serde::{Deserialize, Serialize};

/// Monthly limits are a flat 30x of the daily ones. This intentionally
/// ignores calendar length so limits stay predictable across months.
const MONTHLY_DAYS: i64 = 30;

/// Cost ceiling per 1k tokens used to derive the plan cost limit.
const COST_PER_1K_TOKENS: f64 = 0.03;

/// Subscription tier of an organization.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum PlanTier {
    /// 10k tokens/day
    Free,
    /// 100k tokens/day
    Basic,
    /// 1M tokens/day
    Pro,
    /// 10M tokens/day
    Enterprise,
}

impl Default for PlanTier {
    fn default() -> Self {
        Self::Free
    }
}

/// Usage ceilings for one plan tier.
///
/// # Examples
///
/// ```
/// use quillforge_core::{PlanLimits, PlanTier};
///
/// let limits = PlanLimits::for_tier(PlanTier::Free);
/// assert_eq!(limits.daily_tokens, 10_000);
/// assert_eq!(limits.daily_requests, 10);
/// assert_eq!(limits.monthly_tokens, 300_000);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlanLimits {
    /// Tokens allowed per calendar day
    pub daily_tokens: i64,
    /// Requests allowed per calendar day
    pub daily_requests: i64,
    /// Spend allowed per calendar day, USD
    pub daily_cost: f64,
    /// Tokens allowed per 30-day month
    pub monthly_tokens: i64,
    /// Requests allowed per 30-day month
    pub monthly_requests: i64,
    /// Spend allowed per 30-day month, USD
    pub monthly_cost: f64,
}

impl PlanLimits {
    /// Static limits table for a plan tier.
    pub fn for_tier(tier: PlanTier) -> Self {
        let daily_tokens: i64 = match tier {
            PlanTier::Free => 10_000,
            PlanTier::Basic => 100_000,
            PlanTier::Pro => 1_000_000,
            PlanTier::Enterprise => 10_000_000,
        };
        let daily_requests = daily_tokens / 1_000;
        let daily_cost = daily_tokens as f64 * COST_PER_1K_TOKENS / 1_000.0;
        Self {
            daily_tokens,
            daily_requests,
            daily_cost,
            monthly_tokens: daily_tokens * MONTHLY_DAYS,
            monthly_requests: daily_requests * MONTHLY_DAYS,
            monthly_cost: daily_cost * MONTHLY_DAYS as f64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tiers_scale_by_powers_of_ten() {
        let free = PlanLimits::for_tier(PlanTier::Free);
        let basic = PlanLimits::for_tier(PlanTier::Basic);
        let pro = PlanLimits::for_tier(PlanTier::Pro);
        let enterprise = PlanLimits::for_tier(PlanTier::Enterprise);
        assert_eq!(free.daily_tokens, 10_000);
        assert_eq!(basic.daily_tokens, 100_000);
        assert_eq!(pro.daily_tokens, 1_000_000);
        assert_eq!(enterprise.daily_tokens, 10_000_000);
    }

    #[test]
    fn derived_limits_follow_daily_tokens() {
        let basic = PlanLimits::for_tier(PlanTier::Basic);
        assert_eq!(basic.daily_requests, 100);
        assert!((basic.daily_cost - 3.0).abs() < f64::EPSILON);
        assert_eq!(basic.monthly_tokens, 3_000_000);
        assert_eq!(basic.monthly_requests, 3_000);
        assert!((basic.monthly_cost - 90.0).abs() < 1e-9);
    }
}
