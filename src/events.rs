use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::decimal::{Money, Rate};
use crate::types::{MemberId, MembershipTier, ReservationId, ReservationStatus, VehicleId};

/// all events that can be emitted by the engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    // lifecycle events
    ReservationCreated {
        reservation_id: ReservationId,
        reference_code: String,
        vehicle_id: VehicleId,
        member_id: MemberId,
        total: Money,
        timestamp: DateTime<Utc>,
    },
    PaymentConfirmed {
        reservation_id: ReservationId,
        transaction_id: String,
        amount: Money,
        timestamp: DateTime<Utc>,
    },
    ReservationUpdated {
        reservation_id: ReservationId,
        new_total: Money,
        timestamp: DateTime<Utc>,
    },
    ReservationExtended {
        reservation_id: ReservationId,
        old_end: DateTime<Utc>,
        new_end: DateTime<Utc>,
        new_total: Money,
        timestamp: DateTime<Utc>,
    },
    ReservationActivated {
        reservation_id: ReservationId,
        timestamp: DateTime<Utc>,
    },
    ReservationCompleted {
        reservation_id: ReservationId,
        final_total: Money,
        additional_charges: Money,
        late_fee: Money,
        timestamp: DateTime<Utc>,
    },
    ReservationCancelled {
        reservation_id: ReservationId,
        reason: Option<String>,
        timestamp: DateTime<Utc>,
    },
    RefundIssued {
        reservation_id: ReservationId,
        amount: Money,
        fraction: Rate,
        transaction_id: String,
        timestamp: DateTime<Utc>,
    },

    // loyalty events
    LoyaltyAccrued {
        member_id: MemberId,
        points_awarded: u64,
        total_points: u64,
        timestamp: DateTime<Utc>,
    },
    TierUpgraded {
        member_id: MemberId,
        old_tier: MembershipTier,
        new_tier: MembershipTier,
        timestamp: DateTime<Utc>,
    },
    VipGranted {
        member_id: MemberId,
        expires_at: DateTime<Utc>,
        timestamp: DateTime<Utc>,
    },

    // status change events
    StatusChanged {
        reservation_id: ReservationId,
        old_status: ReservationStatus,
        new_status: ReservationStatus,
        timestamp: DateTime<Utc>,
    },
}

/// event store for collecting events during operations
#[derive(Debug, Default)]
pub struct EventStore {
    events: Vec<Event>,
}

impl EventStore {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn emit(&mut self, event: Event) {
        self.events.push(event);
    }

    pub fn take_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}
