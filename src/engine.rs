use chrono::{DateTime, Utc};
use hourglass_rs::SafeTimeProvider;
use tracing::{debug, info};

use crate::availability::{is_window_claimable, is_window_free, SearchCriteria, Window};
use crate::collaborators::{
    Notification, NotificationKind, Notifier, PaymentGateway, ReservationStore,
};
use crate::config::EngineConfig;
use crate::decimal::Money;
use crate::errors::{EngineError, Result};
use crate::events::{Event, EventStore};
use crate::loyalty::LoyaltyEngine;
use crate::pricing::{PriceBreakdown, PricingCalculator};
use crate::refund::{RefundCalculation, RefundEvaluator};
use crate::reservation::Reservation;
use crate::types::{
    Actor, InsuranceType, MemberId, MembershipTier, PaymentStatus, ReservationId,
    ReservationStatus, Vehicle, VehicleId,
};

/// a member-initiated booking request
#[derive(Debug, Clone)]
pub struct ReservationRequest {
    pub member_id: MemberId,
    pub vehicle_id: VehicleId,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub insurance_type: InsuranceType,
    pub special_requests: Option<String>,
}

/// result of a cancellation: the final reservation plus any money returned
#[derive(Debug, Clone)]
pub struct RefundOutcome {
    pub reservation: Reservation,
    pub refund: Option<RefundCalculation>,
    pub refund_transaction_id: Option<String>,
}

/// the reservation engine.
///
/// stateless request/response orchestration over the store, payment gateway,
/// and notifier collaborators. every validation runs before any mutation, so
/// a failed operation leaves no partial state behind.
///
/// `create_reservation` and `extend_reservation` must be invoked inside a
/// serializing transaction scope per vehicle (row lock, unique constraint, or
/// an application mutex keyed by vehicle id) supplied by the caller; the
/// engine states this isolation requirement as a precondition but implements
/// no locking itself.
pub struct ReservationEngine<S, P, N> {
    store: S,
    gateway: P,
    notifier: N,
    config: EngineConfig,
    events: EventStore,
}

impl<S, P, N> ReservationEngine<S, P, N>
where
    S: ReservationStore,
    P: PaymentGateway,
    N: Notifier,
{
    pub fn new(store: S, gateway: P, notifier: N, config: EngineConfig) -> Self {
        Self {
            store,
            gateway,
            notifier,
            config,
            events: EventStore::new(),
        }
    }

    /// whether the vehicle has no blocking reservation in the window
    pub fn check_availability(
        &self,
        vehicle_id: VehicleId,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        time_provider: &SafeTimeProvider,
    ) -> Result<bool> {
        let window = Window::new(start, end)?;
        window.validate_not_past(time_provider.now())?;

        let vehicle = self.store.vehicle(vehicle_id)?;
        if !vehicle.available {
            return Ok(false);
        }

        let existing = self.store.reservations_for_vehicle(vehicle_id)?;
        Ok(is_window_free(&existing, &window))
    }

    /// fleet search: availability flag, criteria filters, and a free window
    pub fn search_available(
        &self,
        criteria: &SearchCriteria,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        time_provider: &SafeTimeProvider,
    ) -> Result<Vec<Vehicle>> {
        let window = Window::new(start, end)?;
        window.validate_not_past(time_provider.now())?;

        let mut found = Vec::new();
        for vehicle in self.store.vehicles()? {
            if !vehicle.available || !criteria.matches(&vehicle) {
                continue;
            }
            let existing = self.store.reservations_for_vehicle(vehicle.id)?;
            if is_window_free(&existing, &window) {
                found.push(vehicle);
            }
        }
        debug!(count = found.len(), "fleet search completed");
        Ok(found)
    }

    /// quote a booking without creating anything. pure in its inputs:
    /// identical arguments always produce an identical breakdown
    pub fn estimate_cost(
        &self,
        vehicle_id: VehicleId,
        member_id: Option<MemberId>,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        insurance_type: InsuranceType,
    ) -> Result<PriceBreakdown> {
        let window = Window::new(start, end)?;
        let vehicle = self.store.vehicle(vehicle_id)?;

        let tier = match member_id {
            Some(id) => self.store.member(id)?.tier,
            None => MembershipTier::Bronze,
        };
        Ok(self.price(&vehicle, &window, insurance_type, tier))
    }

    /// create a pending reservation. requires the caller's serializing
    /// transaction scope for the vehicle (see type docs)
    pub fn create_reservation(
        &mut self,
        request: ReservationRequest,
        time_provider: &SafeTimeProvider,
    ) -> Result<Reservation> {
        let now = time_provider.now();
        let window = Window::new(request.start, request.end)?;
        window.validate_not_past(now)?;

        let member = self.store.member(request.member_id)?;
        let vehicle = self.store.vehicle(request.vehicle_id)?;
        if !vehicle.available {
            return Err(EngineError::VehicleUnavailable {
                vehicle_id: vehicle.id,
            });
        }

        let existing = self.store.reservations_for_vehicle(vehicle.id)?;
        if !is_window_claimable(&existing, &window, None) {
            return Err(EngineError::VehicleUnavailable {
                vehicle_id: vehicle.id,
            });
        }

        let pricing = self.price(&vehicle, &window, request.insurance_type, member.tier);
        let reservation = Reservation::new(
            member.id,
            vehicle.id,
            window,
            request.insurance_type,
            pricing,
            request.special_requests,
            now,
        );

        self.store.insert_reservation(reservation.clone())?;

        info!(
            reservation = %reservation.reference_code,
            vehicle = %vehicle.id,
            total = %pricing.total,
            "reservation created"
        );
        self.events.emit(Event::ReservationCreated {
            reservation_id: reservation.id,
            reference_code: reservation.reference_code.clone(),
            vehicle_id: vehicle.id,
            member_id: member.id,
            total: pricing.total,
            timestamp: now,
        });
        self.notifier.notify(Notification {
            reservation_id: reservation.id,
            member_id: member.id,
            reference_code: reservation.reference_code.clone(),
            kind: NotificationKind::BookingCreated {
                total: pricing.total,
            },
        });

        Ok(reservation)
    }

    /// payment collaborator callback: funds captured for a pending booking
    pub fn confirm_payment(
        &mut self,
        id: ReservationId,
        transaction_id: &str,
        time_provider: &SafeTimeProvider,
    ) -> Result<Reservation> {
        let now = time_provider.now();
        let mut reservation = self.store.reservation(id)?;

        if reservation.status != ReservationStatus::Pending {
            return Err(EngineError::InvalidState {
                current: reservation.status,
                operation: "confirm_payment",
            });
        }

        reservation.payment_status = PaymentStatus::Paid;
        reservation.transaction_id = Some(transaction_id.to_string());
        self.transition(&mut reservation, ReservationStatus::Confirmed, now);
        self.store.update_reservation(reservation.clone())?;

        info!(reservation = %reservation.reference_code, %transaction_id, "payment confirmed");
        self.events.emit(Event::PaymentConfirmed {
            reservation_id: reservation.id,
            transaction_id: transaction_id.to_string(),
            amount: reservation.total_amount(),
            timestamp: now,
        });
        self.notifier.notify(Notification {
            reservation_id: reservation.id,
            member_id: reservation.member_id,
            reference_code: reservation.reference_code.clone(),
            kind: NotificationKind::BookingConfirmed,
        });

        Ok(reservation)
    }

    /// change window and insurance before pickup; reprices from scratch
    pub fn update_reservation(
        &mut self,
        id: ReservationId,
        new_start: DateTime<Utc>,
        new_end: DateTime<Utc>,
        new_insurance: InsuranceType,
        actor: Actor,
        time_provider: &SafeTimeProvider,
    ) -> Result<Reservation> {
        let now = time_provider.now();
        let mut reservation = self.store.reservation(id)?;
        authorize(actor, &reservation)?;

        if !reservation.can_be_updated() {
            return Err(EngineError::InvalidState {
                current: reservation.status,
                operation: "update",
            });
        }

        let window = Window::new(new_start, new_end)?;
        window.validate_not_past(now)?;

        let existing = self.store.reservations_for_vehicle(reservation.vehicle_id)?;
        if !is_window_claimable(&existing, &window, Some(reservation.id)) {
            return Err(EngineError::VehicleUnavailable {
                vehicle_id: reservation.vehicle_id,
            });
        }

        let vehicle = self.store.vehicle(reservation.vehicle_id)?;
        let member = self.store.member(reservation.member_id)?;
        let pricing = self.price(&vehicle, &window, new_insurance, member.tier);

        reservation.reprice(window, new_insurance, pricing, now);
        self.store.update_reservation(reservation.clone())?;

        info!(reservation = %reservation.reference_code, total = %pricing.total, "reservation updated");
        self.events.emit(Event::ReservationUpdated {
            reservation_id: reservation.id,
            new_total: pricing.total,
            timestamp: now,
        });

        Ok(reservation)
    }

    /// lengthen the end instant. availability is re-checked for the added
    /// interval `[old_end, new_end)` only; pricing covers the full duration.
    /// requires the caller's serializing transaction scope for the vehicle
    pub fn extend_reservation(
        &mut self,
        id: ReservationId,
        new_end: DateTime<Utc>,
        actor: Actor,
        time_provider: &SafeTimeProvider,
    ) -> Result<Reservation> {
        let now = time_provider.now();
        let mut reservation = self.store.reservation(id)?;
        authorize(actor, &reservation)?;

        if reservation.status.is_terminal() {
            return Err(EngineError::InvalidState {
                current: reservation.status,
                operation: "extend",
            });
        }

        let old_end = reservation.window.end();
        let (full, delta) = reservation.window.extended_to(new_end)?;

        let existing = self.store.reservations_for_vehicle(reservation.vehicle_id)?;
        if !is_window_claimable(&existing, &delta, Some(reservation.id)) {
            return Err(EngineError::VehicleUnavailable {
                vehicle_id: reservation.vehicle_id,
            });
        }

        let vehicle = self.store.vehicle(reservation.vehicle_id)?;
        let member = self.store.member(reservation.member_id)?;
        let pricing = self.price(&vehicle, &full, reservation.insurance_type, member.tier);

        reservation.reprice(full, reservation.insurance_type, pricing, now);
        self.store.update_reservation(reservation.clone())?;

        info!(reservation = %reservation.reference_code, %new_end, "reservation extended");
        self.events.emit(Event::ReservationExtended {
            reservation_id: reservation.id,
            old_end,
            new_end,
            new_total: pricing.total,
            timestamp: now,
        });

        Ok(reservation)
    }

    /// vehicle pickup: the rental starts
    pub fn activate_reservation(
        &mut self,
        id: ReservationId,
        actor: Actor,
        time_provider: &SafeTimeProvider,
    ) -> Result<Reservation> {
        let now = time_provider.now();
        let mut reservation = self.store.reservation(id)?;
        authorize(actor, &reservation)?;

        if reservation.status != ReservationStatus::Confirmed
            || reservation.payment_status != PaymentStatus::Paid
        {
            return Err(EngineError::InvalidState {
                current: reservation.status,
                operation: "activate",
            });
        }

        self.transition(&mut reservation, ReservationStatus::Active, now);
        self.store.update_reservation(reservation.clone())?;

        self.events.emit(Event::ReservationActivated {
            reservation_id: reservation.id,
            timestamp: now,
        });

        Ok(reservation)
    }

    /// rental returned: settle post-hoc charges and accrue loyalty
    pub fn complete_reservation(
        &mut self,
        id: ReservationId,
        additional_charges: Option<Money>,
        late_fee: Option<Money>,
        time_provider: &SafeTimeProvider,
    ) -> Result<Reservation> {
        let now = time_provider.now();
        let mut reservation = self.store.reservation(id)?;

        if reservation.status != ReservationStatus::Active {
            return Err(EngineError::InvalidState {
                current: reservation.status,
                operation: "complete",
            });
        }

        let member = self.store.member(reservation.member_id)?;

        reservation.additional_charges += additional_charges.unwrap_or(Money::ZERO);
        reservation.late_fee += late_fee.unwrap_or(Money::ZERO);
        self.transition(&mut reservation, ReservationStatus::Completed, now);

        let final_total = reservation.total_amount();
        let (updated_member, accrual) =
            LoyaltyEngine::new(self.config.loyalty.clone()).accrue(&member, final_total, now);

        self.store.update_reservation(reservation.clone())?;
        self.store.update_member(updated_member.clone())?;

        info!(
            reservation = %reservation.reference_code,
            total = %final_total,
            points = accrual.points_awarded,
            "reservation completed"
        );
        self.events.emit(Event::ReservationCompleted {
            reservation_id: reservation.id,
            final_total,
            additional_charges: reservation.additional_charges,
            late_fee: reservation.late_fee,
            timestamp: now,
        });
        self.events.emit(Event::LoyaltyAccrued {
            member_id: member.id,
            points_awarded: accrual.points_awarded,
            total_points: updated_member.loyalty_points,
            timestamp: now,
        });
        if accrual.tier_upgraded() {
            self.events.emit(Event::TierUpgraded {
                member_id: member.id,
                old_tier: accrual.previous_tier,
                new_tier: accrual.new_tier,
                timestamp: now,
            });
        }
        if accrual.vip_promoted {
            if let Some(expires_at) = updated_member.vip_expires_at {
                self.events.emit(Event::VipGranted {
                    member_id: member.id,
                    expires_at,
                    timestamp: now,
                });
            }
        }
        self.notifier.notify(Notification {
            reservation_id: reservation.id,
            member_id: member.id,
            reference_code: reservation.reference_code.clone(),
            kind: NotificationKind::RentalCompleted { final_total },
        });

        Ok(reservation)
    }

    /// cancel before pickup. paid bookings go through the refund policy and
    /// the gateway; an unpaid booking is simply cancelled
    pub fn cancel_reservation(
        &mut self,
        id: ReservationId,
        actor: Actor,
        reason: Option<String>,
        time_provider: &SafeTimeProvider,
    ) -> Result<RefundOutcome> {
        let now = time_provider.now();
        let mut reservation = self.store.reservation(id)?;
        authorize(actor, &reservation)?;

        if !reservation.can_be_cancelled() {
            return Err(EngineError::NotCancellable {
                status: reservation.status,
            });
        }

        let mut refund = None;
        let mut refund_transaction_id = None;
        let final_status = if reservation.payment_status == PaymentStatus::Paid {
            let calculation = RefundEvaluator::evaluate(&reservation, now)?;
            let original = reservation.transaction_id.as_deref().unwrap_or_default();
            let transaction_id =
                self.gateway
                    .refund(reservation.id, original, calculation.amount)?;

            reservation.payment_status = PaymentStatus::Refunded;
            self.events.emit(Event::RefundIssued {
                reservation_id: reservation.id,
                amount: calculation.amount,
                fraction: calculation.fraction,
                transaction_id: transaction_id.clone(),
                timestamp: now,
            });

            refund = Some(calculation);
            refund_transaction_id = Some(transaction_id);
            ReservationStatus::Refunded
        } else {
            ReservationStatus::Cancelled
        };

        let old_status = reservation.status;
        reservation.mark_cancelled(final_status, reason.clone(), now);
        self.store.update_reservation(reservation.clone())?;

        info!(
            reservation = %reservation.reference_code,
            refunded = refund.is_some(),
            "reservation cancelled"
        );
        self.events.emit(Event::StatusChanged {
            reservation_id: reservation.id,
            old_status,
            new_status: final_status,
            timestamp: now,
        });
        self.events.emit(Event::ReservationCancelled {
            reservation_id: reservation.id,
            reason,
            timestamp: now,
        });
        self.notifier.notify(Notification {
            reservation_id: reservation.id,
            member_id: reservation.member_id,
            reference_code: reservation.reference_code.clone(),
            kind: NotificationKind::BookingCancelled {
                refund: refund.map(|r| r.amount),
            },
        });

        Ok(RefundOutcome {
            reservation,
            refund,
            refund_transaction_id,
        })
    }

    /// derived read-only predicate for reporting; never a transition
    pub fn is_overdue(
        &self,
        id: ReservationId,
        time_provider: &SafeTimeProvider,
    ) -> Result<bool> {
        let reservation = self.store.reservation(id)?;
        Ok(reservation.is_overdue(time_provider.now()))
    }

    /// drain events emitted since the last call
    pub fn take_events(&mut self) -> Vec<Event> {
        self.events.take_events()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn gateway(&self) -> &P {
        &self.gateway
    }

    pub fn gateway_mut(&mut self) -> &mut P {
        &mut self.gateway
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    fn price(
        &self,
        vehicle: &Vehicle,
        window: &Window,
        insurance: InsuranceType,
        tier: MembershipTier,
    ) -> PriceBreakdown {
        PricingCalculator::new(self.config.tax_rate, self.config.duration_policy)
            .calculate(vehicle, window, insurance, tier)
    }

    fn transition(
        &mut self,
        reservation: &mut Reservation,
        new_status: ReservationStatus,
        now: DateTime<Utc>,
    ) {
        let old_status = reservation.status;
        reservation.update_status(new_status, now);
        self.events.emit(Event::StatusChanged {
            reservation_id: reservation.id,
            old_status,
            new_status,
            timestamp: now,
        });
    }
}

fn authorize(actor: Actor, reservation: &Reservation) -> Result<()> {
    if !actor.may_modify(reservation.member_id) {
        return Err(EngineError::Unauthorized);
    }
    Ok(())
}
