use chrono::{DateTime, Duration, Utc};

use crate::config::LoyaltyConfig;
use crate::decimal::Money;
use crate::types::{Member, MembershipTier};

/// converts spend into points, tier upgrades, and vip promotion.
///
/// returns a fresh member snapshot instead of mutating shared state.
pub struct LoyaltyEngine {
    config: LoyaltyConfig,
}

/// what one accrual did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccrualOutcome {
    pub points_awarded: u64,
    pub previous_tier: MembershipTier,
    pub new_tier: MembershipTier,
    pub vip_promoted: bool,
}

impl AccrualOutcome {
    pub fn tier_upgraded(&self) -> bool {
        self.new_tier > self.previous_tier
    }
}

impl LoyaltyEngine {
    pub fn new(config: LoyaltyConfig) -> Self {
        Self { config }
    }

    /// accrue points for a completed spend.
    ///
    /// tier is recomputed from cumulative points but never decreases;
    /// vip is granted once when both spend and point thresholds are met.
    pub fn accrue(
        &self,
        member: &Member,
        amount_spent: Money,
        now: DateTime<Utc>,
    ) -> (Member, AccrualOutcome) {
        let points_awarded = amount_spent.whole_units(self.config.currency_per_point);

        let mut updated = member.clone();
        updated.loyalty_points = member.loyalty_points + points_awarded;
        updated.lifetime_spend = member.lifetime_spend + amount_spent;

        let earned_tier = MembershipTier::for_points(updated.loyalty_points);
        updated.tier = member.tier.max(earned_tier);

        let mut vip_promoted = false;
        if !updated.vip
            && updated.lifetime_spend >= self.config.vip_spend_threshold
            && updated.loyalty_points >= self.config.vip_points_threshold
        {
            updated.vip = true;
            updated.vip_expires_at = Some(now + Duration::days(self.config.vip_duration_days));
            vip_promoted = true;
        }

        let outcome = AccrualOutcome {
            points_awarded,
            previous_tier: member.tier,
            new_tier: updated.tier,
            vip_promoted,
        };
        (updated, outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use uuid::Uuid;

    fn engine() -> LoyaltyEngine {
        LoyaltyEngine::new(LoyaltyConfig::standard())
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 2, 1, 12, 0, 0).unwrap()
    }

    fn member_with(points: u64, tier: MembershipTier) -> Member {
        let mut m = Member::new(Uuid::new_v4());
        m.loyalty_points = points;
        m.tier = tier;
        m
    }

    #[test]
    fn test_one_point_per_ten_spent() {
        let member = Member::new(Uuid::new_v4());
        let (updated, outcome) = engine().accrue(&member, Money::from_major(2450), now());

        assert_eq!(outcome.points_awarded, 245);
        assert_eq!(updated.loyalty_points, 245);
        assert_eq!(updated.lifetime_spend, Money::from_major(2450));
    }

    #[test]
    fn test_fractional_spend_floors() {
        let member = Member::new(Uuid::new_v4());
        let spend = Money::from_str_exact("99.99").unwrap();
        let (_, outcome) = engine().accrue(&member, spend, now());
        assert_eq!(outcome.points_awarded, 9);
    }

    #[test]
    fn test_silver_upgrade_at_threshold() {
        let member = member_with(1800, MembershipTier::Bronze);
        let (updated, outcome) = engine().accrue(&member, Money::from_major(2450), now());

        assert_eq!(updated.loyalty_points, 2045);
        assert_eq!(updated.tier, MembershipTier::Silver);
        assert!(outcome.tier_upgraded());
    }

    #[test]
    fn test_tier_never_decreases() {
        // member holds a tier above what their points alone would earn
        let member = member_with(100, MembershipTier::Gold);
        let (updated, outcome) = engine().accrue(&member, Money::from_major(50), now());

        assert_eq!(updated.tier, MembershipTier::Gold);
        assert!(!outcome.tier_upgraded());
    }

    #[test]
    fn test_vip_promotion_needs_both_thresholds() {
        // spend threshold met, points not
        let mut member = member_with(4000, MembershipTier::Silver);
        member.lifetime_spend = Money::from_major(9_500);
        let (updated, outcome) = engine().accrue(&member, Money::from_major(600), now());
        assert!(!updated.vip);
        assert!(!outcome.vip_promoted);

        // now both cross
        let (updated, outcome) = engine().accrue(&updated, Money::from_major(9_500), now());
        assert!(updated.vip);
        assert!(outcome.vip_promoted);
        assert_eq!(updated.vip_expires_at, Some(now() + Duration::days(365)));
    }

    #[test]
    fn test_vip_granted_once() {
        let mut member = member_with(6000, MembershipTier::Gold);
        member.lifetime_spend = Money::from_major(20_000);
        member.vip = true;
        member.vip_expires_at = Some(now() - Duration::days(10));

        // already vip: no re-promotion, expiry untouched (external sweep owns expiry)
        let (updated, outcome) = engine().accrue(&member, Money::from_major(1000), now());
        assert!(!outcome.vip_promoted);
        assert_eq!(updated.vip_expires_at, member.vip_expires_at);
    }

    #[test]
    fn test_original_member_untouched() {
        let member = member_with(1800, MembershipTier::Bronze);
        let before = member.clone();
        let _ = engine().accrue(&member, Money::from_major(2450), now());
        assert_eq!(member, before);
    }
}
