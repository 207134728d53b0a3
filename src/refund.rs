use chrono::{DateTime, Duration, Utc};

use crate::decimal::{Money, Rate};
use crate::errors::{EngineError, Result};
use crate::reservation::Reservation;

/// time-tiered refund policy.
///
/// the fraction depends only on how far in the future the rental starts
/// at the moment the refund is requested.
pub struct RefundEvaluator;

/// refund derivation for one cancellation request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefundCalculation {
    pub fraction: Rate,
    pub amount: Money,
    pub hours_until_start: i64,
}

impl RefundEvaluator {
    /// fraction of the total returned, by time remaining until start
    pub fn fraction_for(until_start: Duration) -> Rate {
        if until_start >= Duration::hours(72) {
            Rate::from_percentage(100)
        } else if until_start >= Duration::hours(24) {
            Rate::from_percentage(75)
        } else if until_start >= Duration::hours(6) {
            Rate::from_percentage(50)
        } else {
            Rate::from_percentage(25)
        }
    }

    /// compute the refund owed if this reservation were cancelled now
    pub fn evaluate(
        reservation: &Reservation,
        requested_at: DateTime<Utc>,
    ) -> Result<RefundCalculation> {
        if reservation.status.is_terminal() {
            return Err(EngineError::RefundIneligible {
                reason: format!(
                    "reservation {} already {:?}",
                    reservation.reference_code, reservation.status
                ),
            });
        }

        let until_start = reservation.window.start() - requested_at;
        if until_start <= Duration::zero() {
            return Err(EngineError::RefundIneligible {
                reason: format!(
                    "reservation {} already under way",
                    reservation.reference_code
                ),
            });
        }

        let fraction = Self::fraction_for(until_start);
        Ok(RefundCalculation {
            fraction,
            amount: reservation.total_amount().at_rate(fraction),
            hours_until_start: until_start.num_hours(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::availability::Window;
    use crate::pricing::PriceBreakdown;
    use crate::types::{InsuranceType, ReservationStatus};
    use chrono::TimeZone;
    use uuid::Uuid;

    fn reservation_starting_in(hours: i64, total: i64) -> (Reservation, DateTime<Utc>) {
        let now = Utc.with_ymd_and_hms(2024, 2, 1, 12, 0, 0).unwrap();
        let start = now + Duration::hours(hours);
        let window = Window::new(start, start + Duration::days(2)).unwrap();

        let mut pricing = PriceBreakdown::zero(Money::ZERO);
        pricing.total = Money::from_major(total);

        let mut r = Reservation::new(
            Uuid::new_v4(),
            Uuid::new_v4(),
            window,
            InsuranceType::None,
            pricing,
            None,
            now,
        );
        r.status = ReservationStatus::Confirmed;
        (r, now)
    }

    #[test]
    fn test_tier_boundaries() {
        assert_eq!(
            RefundEvaluator::fraction_for(Duration::hours(72)),
            Rate::from_percentage(100)
        );
        assert_eq!(
            RefundEvaluator::fraction_for(Duration::hours(72) - Duration::minutes(1)),
            Rate::from_percentage(75)
        );
        assert_eq!(
            RefundEvaluator::fraction_for(Duration::hours(24)),
            Rate::from_percentage(75)
        );
        assert_eq!(
            RefundEvaluator::fraction_for(Duration::hours(24) - Duration::minutes(1)),
            Rate::from_percentage(50)
        );
        assert_eq!(
            RefundEvaluator::fraction_for(Duration::hours(6)),
            Rate::from_percentage(50)
        );
        assert_eq!(
            RefundEvaluator::fraction_for(Duration::hours(5)),
            Rate::from_percentage(25)
        );
    }

    #[test]
    fn test_thirty_hours_refunds_three_quarters() {
        let (r, now) = reservation_starting_in(30, 1000);
        let calc = RefundEvaluator::evaluate(&r, now).unwrap();

        assert_eq!(calc.fraction, Rate::from_percentage(75));
        assert_eq!(calc.amount, Money::from_major(750));
        assert_eq!(calc.hours_until_start, 30);
    }

    #[test]
    fn test_terminal_statuses_ineligible() {
        for status in [
            ReservationStatus::Completed,
            ReservationStatus::Cancelled,
            ReservationStatus::Refunded,
        ] {
            let (mut r, now) = reservation_starting_in(100, 1000);
            r.status = status;

            let err = RefundEvaluator::evaluate(&r, now).unwrap_err();
            assert!(matches!(err, EngineError::RefundIneligible { .. }), "{status:?}");
        }
    }

    #[test]
    fn test_under_way_ineligible() {
        let (mut r, now) = reservation_starting_in(48, 1000);
        r.status = ReservationStatus::Active;

        // ask two days later, after the start instant
        let later = now + Duration::hours(49);
        let err = RefundEvaluator::evaluate(&r, later).unwrap_err();
        match err {
            EngineError::RefundIneligible { reason } => {
                assert!(reason.contains("under way"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_refund_rounds_half_up() {
        let (mut r, now) = reservation_starting_in(30, 0);
        r.pricing.total = Money::from_str_exact("1000.01").unwrap();

        let calc = RefundEvaluator::evaluate(&r, now).unwrap();
        // 75% of 1000.01 = 750.0075 -> 750.01
        assert_eq!(calc.amount, Money::from_str_exact("750.01").unwrap());
    }
}
