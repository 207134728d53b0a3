use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::availability::Window;
use crate::decimal::{Money, Rate};
use crate::pricing::DurationPolicy;
use crate::types::{InsuranceType, MembershipTier, Vehicle};

/// deterministic price derivation for one reservation window.
///
/// every intermediate amount is rounded to 2 decimal places half-up before
/// summation, so identical inputs always produce identical breakdowns.
#[derive(Debug, Clone, Copy)]
pub struct PricingCalculator {
    tax_rate: Rate,
    policy: DurationPolicy,
}

impl PricingCalculator {
    pub fn new(tax_rate: Rate, policy: DurationPolicy) -> Self {
        Self { tax_rate, policy }
    }

    /// derive the full breakdown:
    /// - discount applies to base only, before tax and insurance
    /// - insurance surcharge is computed on the discounted base
    /// - tax applies to discounted base plus insurance
    /// - the security deposit is copied verbatim, never taxed or discounted
    pub fn calculate(
        &self,
        vehicle: &Vehicle,
        window: &Window,
        insurance: InsuranceType,
        tier: MembershipTier,
    ) -> PriceBreakdown {
        let billed = self.policy.bill(window);

        let base = vehicle.daily_rate * Decimal::from(billed.days)
            + vehicle.hourly_rate * Decimal::from(billed.remainder_hours);

        let discount = base.at_rate(tier.discount_rate());
        let discounted_base = base - discount;
        let insurance_cost = discounted_base.at_rate(insurance.surcharge_rate());
        let tax = (discounted_base + insurance_cost).at_rate(self.tax_rate);
        let total = discounted_base + insurance_cost + tax;

        PriceBreakdown {
            base,
            discount,
            insurance: insurance_cost,
            tax,
            total,
            security_deposit: vehicle.security_deposit,
            billable_hours: billed.hours,
            billable_days: billed.days,
        }
    }
}

/// itemized price for a reservation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceBreakdown {
    pub base: Money,
    pub discount: Money,
    pub insurance: Money,
    pub tax: Money,
    pub total: Money,
    pub security_deposit: Money,
    pub billable_hours: u32,
    pub billable_days: u32,
}

impl PriceBreakdown {
    /// empty breakdown carrying only a deposit snapshot
    pub fn zero(security_deposit: Money) -> Self {
        Self {
            base: Money::ZERO,
            discount: Money::ZERO,
            insurance: Money::ZERO,
            tax: Money::ZERO,
            total: Money::ZERO,
            security_deposit,
            billable_hours: 0,
            billable_days: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{FuelType, Transmission, VehicleCategory};
    use chrono::{Duration, TimeZone, Utc};
    use uuid::Uuid;

    fn vehicle(daily: i64, hourly: i64) -> Vehicle {
        Vehicle {
            id: Uuid::new_v4(),
            daily_rate: Money::from_major(daily),
            hourly_rate: Money::from_major(hourly),
            security_deposit: Money::from_major(1000),
            available: true,
            location: "Downtown".to_string(),
            category: VehicleCategory::Sedan,
            fuel_type: FuelType::Petrol,
            transmission: Transmission::Automatic,
            seats: 5,
        }
    }

    fn days(n: i64) -> Window {
        let start = Utc.with_ymd_and_hms(2024, 2, 1, 9, 0, 0).unwrap();
        Window::new(start, start + Duration::days(n)).unwrap()
    }

    fn calculator() -> PricingCalculator {
        PricingCalculator::new(Rate::from_percentage(18), DurationPolicy::DayHourSplit)
    }

    #[test]
    fn test_bronze_basic_three_days() {
        let price = calculator().calculate(
            &vehicle(500, 30),
            &days(3),
            InsuranceType::Basic,
            MembershipTier::Bronze,
        );

        assert_eq!(price.base, Money::from_major(1500));
        assert_eq!(price.discount, Money::ZERO);
        assert_eq!(price.insurance, Money::from_major(75));
        assert_eq!(price.tax, Money::from_str_exact("283.50").unwrap());
        assert_eq!(price.total, Money::from_str_exact("1858.50").unwrap());
        assert_eq!(price.security_deposit, Money::from_major(1000));
    }

    #[test]
    fn test_gold_discount_before_insurance_and_tax() {
        let price = calculator().calculate(
            &vehicle(500, 30),
            &days(3),
            InsuranceType::Basic,
            MembershipTier::Gold,
        );

        // insurance is computed on the discounted base
        assert_eq!(price.discount, Money::from_major(150));
        assert_eq!(price.insurance, Money::from_major(135));
        assert_eq!(price.tax, Money::from_str_exact("267.30").unwrap());
        assert_eq!(price.total, Money::from_str_exact("1752.30").unwrap());
    }

    #[test]
    fn test_day_hour_split_regression() {
        // 2 days 5 hours: 2*500 + 5*30 = 1150 base
        let start = Utc.with_ymd_and_hms(2024, 2, 1, 9, 0, 0).unwrap();
        let window = Window::new(start, start + Duration::hours(53)).unwrap();

        let price = calculator().calculate(
            &vehicle(500, 30),
            &window,
            InsuranceType::Premium,
            MembershipTier::Silver,
        );

        assert_eq!(price.base, Money::from_major(1150));
        assert_eq!(price.discount, Money::from_str_exact("57.50").unwrap());
        // 1092.50 discounted, 10% insurance = 109.25
        assert_eq!(price.insurance, Money::from_str_exact("109.25").unwrap());
        // 18% of 1201.75 = 216.315 -> 216.32 half-up
        assert_eq!(price.tax, Money::from_str_exact("216.32").unwrap());
        assert_eq!(price.total, Money::from_str_exact("1418.07").unwrap());
    }

    #[test]
    fn test_day_ceiling_policy() {
        let start = Utc.with_ymd_and_hms(2024, 2, 1, 9, 0, 0).unwrap();
        let window = Window::new(start, start + Duration::hours(53)).unwrap();

        let ceiling =
            PricingCalculator::new(Rate::from_percentage(18), DurationPolicy::DayCeiling);
        let price = ceiling.calculate(
            &vehicle(500, 30),
            &window,
            InsuranceType::None,
            MembershipTier::Bronze,
        );

        // 53 hours rounds up to 3 days
        assert_eq!(price.base, Money::from_major(1500));
        assert_eq!(price.insurance, Money::ZERO);
    }

    #[test]
    fn test_total_identity() {
        let price = calculator().calculate(
            &vehicle(347, 23),
            &days(5),
            InsuranceType::Comprehensive,
            MembershipTier::Platinum,
        );

        let discounted = price.base - price.discount;
        assert_eq!(price.total, discounted + price.insurance + price.tax);
    }

    #[test]
    fn test_deterministic() {
        let v = vehicle(500, 30);
        let w = days(3);

        let a = calculator().calculate(&v, &w, InsuranceType::Basic, MembershipTier::Gold);
        let b = calculator().calculate(&v, &w, InsuranceType::Basic, MembershipTier::Gold);
        assert_eq!(a, b);

        // byte-identical through serde as well
        let ja = serde_json::to_string(&a).unwrap();
        let jb = serde_json::to_string(&b).unwrap();
        assert_eq!(ja, jb);
    }
}
