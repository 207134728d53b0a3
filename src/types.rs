use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::decimal::{Money, Rate};

/// unique identifier for a reservation
pub type ReservationId = Uuid;

/// unique identifier for a vehicle
pub type VehicleId = Uuid;

/// unique identifier for a member
pub type MemberId = Uuid;

/// reservation lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReservationStatus {
    /// created, awaiting payment
    Pending,
    /// payment captured, vehicle held
    Confirmed,
    /// vehicle picked up, rental under way
    Active,
    /// rental finished, charges settled
    Completed,
    /// cancelled before payment, or without money returned
    Cancelled,
    /// cancelled with money returned
    Refunded,
}

impl ReservationStatus {
    /// terminal statuses accept no further transitions
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ReservationStatus::Completed | ReservationStatus::Cancelled | ReservationStatus::Refunded
        )
    }

    /// only a paid hold or a running rental keeps the vehicle busy;
    /// pending, cancelled, completed, and refunded reservations never block
    pub fn blocks_availability(&self) -> bool {
        matches!(self, ReservationStatus::Confirmed | ReservationStatus::Active)
    }

    /// statuses that claim the slot against new bookings. an unpaid hold
    /// counts here: payment confirmation does not re-check availability, so
    /// two pending holds on one window could both confirm otherwise
    pub fn holds_slot(&self) -> bool {
        matches!(
            self,
            ReservationStatus::Pending | ReservationStatus::Confirmed | ReservationStatus::Active
        )
    }
}

/// payment axis, independent from reservation status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentStatus {
    Pending,
    Paid,
    Refunded,
}

/// ordered membership tier, derived from loyalty points
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MembershipTier {
    Bronze,
    Silver,
    Gold,
    Platinum,
}

impl MembershipTier {
    /// discount applied to the base amount, before tax and insurance
    pub fn discount_rate(&self) -> Rate {
        match self {
            MembershipTier::Bronze => Rate::ZERO,
            MembershipTier::Silver => Rate::from_percentage(5),
            MembershipTier::Gold => Rate::from_percentage(10),
            MembershipTier::Platinum => Rate::from_percentage(15),
        }
    }

    /// highest tier whose point threshold is met
    pub fn for_points(points: u64) -> Self {
        match points {
            0..=1999 => MembershipTier::Bronze,
            2000..=4999 => MembershipTier::Silver,
            5000..=9999 => MembershipTier::Gold,
            _ => MembershipTier::Platinum,
        }
    }
}

/// insurance cover selected per reservation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InsuranceType {
    None,
    Basic,
    Premium,
    Comprehensive,
}

impl InsuranceType {
    /// surcharge as a fraction of the discounted base
    pub fn surcharge_rate(&self) -> Rate {
        match self {
            InsuranceType::None => Rate::ZERO,
            InsuranceType::Basic => Rate::from_percentage(5),
            InsuranceType::Premium => Rate::from_percentage(10),
            InsuranceType::Comprehensive => Rate::from_percentage(15),
        }
    }
}

/// vehicle category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VehicleCategory {
    Economy,
    Compact,
    Sedan,
    Suv,
    Van,
    Luxury,
}

/// fuel type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FuelType {
    Petrol,
    Diesel,
    Hybrid,
    Electric,
}

/// transmission
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Transmission {
    Manual,
    Automatic,
}

/// vehicle snapshot; owned by fleet management, the engine only reads it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vehicle {
    pub id: VehicleId,
    pub daily_rate: Money,
    pub hourly_rate: Money,
    pub security_deposit: Money,
    pub available: bool,
    pub location: String,
    pub category: VehicleCategory,
    pub fuel_type: FuelType,
    pub transmission: Transmission,
    pub seats: u8,
}

/// member record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Member {
    pub id: MemberId,
    pub tier: MembershipTier,
    pub loyalty_points: u64,
    pub lifetime_spend: Money,
    pub vip: bool,
    pub vip_expires_at: Option<DateTime<Utc>>,
}

impl Member {
    pub fn new(id: MemberId) -> Self {
        Self {
            id,
            tier: MembershipTier::Bronze,
            loyalty_points: 0,
            lifetime_spend: Money::ZERO,
            vip: false,
            vip_expires_at: None,
        }
    }
}

/// caller identity for state-changing operations; authorization itself
/// lives at the api layer, the engine only checks owner-or-admin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Actor {
    Member(MemberId),
    Admin,
}

impl Actor {
    pub fn may_modify(&self, owner: MemberId) -> bool {
        match self {
            Actor::Member(id) => *id == owner,
            Actor::Admin => true,
        }
    }
}
