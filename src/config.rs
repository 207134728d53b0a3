use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::decimal::{Money, Rate};
use crate::pricing::DurationPolicy;

/// engine configuration.
///
/// rate tables tied to closed enums (tier discounts, insurance surcharges,
/// refund fractions) are exhaustive match functions on those enums, not
/// configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    pub tax_rate: Rate,
    pub duration_policy: DurationPolicy,
    pub loyalty: LoyaltyConfig,
}

/// loyalty accrual thresholds
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoyaltyConfig {
    /// currency units per loyalty point
    pub currency_per_point: Decimal,
    pub vip_spend_threshold: Money,
    pub vip_points_threshold: u64,
    pub vip_duration_days: i64,
}

impl EngineConfig {
    /// standard rate card: 18% flat tax, day+hour split billing
    pub fn standard() -> Self {
        Self {
            tax_rate: Rate::from_percentage(18),
            duration_policy: DurationPolicy::DayHourSplit,
            loyalty: LoyaltyConfig::standard(),
        }
    }
}

impl LoyaltyConfig {
    /// 1 point per 10 currency units; vip at 10,000 spend and 5,000 points
    pub fn standard() -> Self {
        Self {
            currency_per_point: dec!(10),
            vip_spend_threshold: Money::from_major(10_000),
            vip_points_threshold: 5_000,
            vip_duration_days: 365,
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::standard()
    }
}

impl Default for LoyaltyConfig {
    fn default() -> Self {
        Self::standard()
    }
}
