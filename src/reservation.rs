use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::availability::Window;
use crate::decimal::Money;
use crate::pricing::PriceBreakdown;
use crate::types::{
    InsuranceType, MemberId, PaymentStatus, ReservationId, ReservationStatus, VehicleId,
};

/// a single reservation record.
///
/// holds non-owning references to its vehicle and member. the security
/// deposit inside `pricing` is a snapshot taken at creation; later vehicle
/// rate changes never alter an existing reservation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reservation {
    pub id: ReservationId,
    /// human-readable, globally unique booking code
    pub reference_code: String,
    pub member_id: MemberId,
    pub vehicle_id: VehicleId,
    pub window: Window,
    pub insurance_type: InsuranceType,
    pub pricing: PriceBreakdown,
    /// post-hoc charges, applied only while active
    pub additional_charges: Money,
    pub late_fee: Money,
    pub status: ReservationStatus,
    pub payment_status: PaymentStatus,
    pub transaction_id: Option<String>,
    pub special_requests: Option<String>,
    pub cancellation_reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub cancelled_at: Option<DateTime<Utc>>,
}

impl Reservation {
    pub fn new(
        member_id: MemberId,
        vehicle_id: VehicleId,
        window: Window,
        insurance_type: InsuranceType,
        pricing: PriceBreakdown,
        special_requests: Option<String>,
        now: DateTime<Utc>,
    ) -> Self {
        let id = Uuid::new_v4();
        Self {
            id,
            reference_code: reference_code(id),
            member_id,
            vehicle_id,
            window,
            insurance_type,
            pricing,
            additional_charges: Money::ZERO,
            late_fee: Money::ZERO,
            status: ReservationStatus::Pending,
            payment_status: PaymentStatus::Pending,
            transaction_id: None,
            special_requests,
            cancellation_reason: None,
            created_at: now,
            updated_at: now,
            cancelled_at: None,
        }
    }

    /// amount actually owed: quoted total plus any post-hoc charges
    pub fn total_amount(&self) -> Money {
        self.pricing.total + self.additional_charges + self.late_fee
    }

    /// cancellation is open only before the rental begins
    pub fn can_be_cancelled(&self) -> bool {
        matches!(
            self.status,
            ReservationStatus::Pending | ReservationStatus::Confirmed
        )
    }

    /// window and insurance changes are open only before pickup
    pub fn can_be_updated(&self) -> bool {
        matches!(
            self.status,
            ReservationStatus::Pending | ReservationStatus::Confirmed
        )
    }

    /// read-only predicate, never a transition: an active rental whose
    /// window has already ended
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        self.status == ReservationStatus::Active && self.window.end() < now
    }

    pub fn update_status(&mut self, status: ReservationStatus, now: DateTime<Utc>) {
        self.status = status;
        self.updated_at = now;
    }

    /// replace window, insurance, and pricing in one step (update/extend)
    pub fn reprice(
        &mut self,
        window: Window,
        insurance_type: InsuranceType,
        pricing: PriceBreakdown,
        now: DateTime<Utc>,
    ) {
        self.window = window;
        self.insurance_type = insurance_type;
        self.pricing = pricing;
        self.updated_at = now;
    }

    pub fn mark_cancelled(
        &mut self,
        status: ReservationStatus,
        reason: Option<String>,
        now: DateTime<Utc>,
    ) {
        self.status = status;
        self.cancellation_reason = reason;
        self.cancelled_at = Some(now);
        self.updated_at = now;
    }
}

/// short booking code derived from the reservation id
fn reference_code(id: ReservationId) -> String {
    let hex = id.simple().to_string().to_uppercase();
    format!("RES-{}", &hex[..8])
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 2, day, hour, 0, 0).unwrap()
    }

    fn sample() -> Reservation {
        let window = Window::new(at(10, 9), at(13, 9)).unwrap();
        let pricing = PriceBreakdown::zero(Money::from_major(1000));
        Reservation::new(
            Uuid::new_v4(),
            Uuid::new_v4(),
            window,
            InsuranceType::Basic,
            pricing,
            Some("child seat".to_string()),
            at(1, 12),
        )
    }

    #[test]
    fn test_starts_pending_unpaid() {
        let r = sample();
        assert_eq!(r.status, ReservationStatus::Pending);
        assert_eq!(r.payment_status, PaymentStatus::Pending);
        assert!(r.transaction_id.is_none());
        assert!(r.cancelled_at.is_none());
    }

    #[test]
    fn test_reference_code_shape() {
        let r = sample();
        assert!(r.reference_code.starts_with("RES-"));
        assert_eq!(r.reference_code.len(), 12);

        let other = sample();
        assert_ne!(r.reference_code, other.reference_code);
    }

    #[test]
    fn test_cancellable_only_before_pickup() {
        let mut r = sample();
        assert!(r.can_be_cancelled());

        r.status = ReservationStatus::Confirmed;
        assert!(r.can_be_cancelled());

        for status in [
            ReservationStatus::Active,
            ReservationStatus::Completed,
            ReservationStatus::Cancelled,
            ReservationStatus::Refunded,
        ] {
            r.status = status;
            assert!(!r.can_be_cancelled(), "{status:?}");
        }
    }

    #[test]
    fn test_overdue_predicate() {
        let mut r = sample();

        r.status = ReservationStatus::Active;
        assert!(!r.is_overdue(at(12, 0)));
        assert!(r.is_overdue(at(14, 0)));

        // only active rentals can be overdue
        r.status = ReservationStatus::Completed;
        assert!(!r.is_overdue(at(14, 0)));
    }

    #[test]
    fn test_total_includes_post_hoc_charges() {
        let mut r = sample();
        r.pricing.total = Money::from_major(1000);
        r.additional_charges = Money::from_major(80);
        r.late_fee = Money::from_major(50);

        assert_eq!(r.total_amount(), Money::from_major(1130));
    }

    #[test]
    fn test_serde_round_trip() {
        let r = sample();
        let json = serde_json::to_string(&r).unwrap();
        let back: Reservation = serde_json::from_str(&json).unwrap();
        assert_eq!(r, back);
    }
}
