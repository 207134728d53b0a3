pub mod availability;
pub mod collaborators;
pub mod config;
pub mod decimal;
pub mod engine;
pub mod errors;
pub mod events;
pub mod loyalty;
pub mod pricing;
pub mod refund;
pub mod reservation;
pub mod types;

// re-export key types
pub use availability::{SearchCriteria, Window};
pub use collaborators::{
    MemoryStore, Notification, NotificationKind, Notifier, NullNotifier, PaymentGateway,
    ReservationStore,
};
pub use config::{EngineConfig, LoyaltyConfig};
pub use decimal::{Money, Rate};
pub use engine::{RefundOutcome, ReservationEngine, ReservationRequest};
pub use errors::{EngineError, Result};
pub use events::{Event, EventStore};
pub use loyalty::{AccrualOutcome, LoyaltyEngine};
pub use pricing::{DurationPolicy, PriceBreakdown, PricingCalculator};
pub use refund::{RefundCalculation, RefundEvaluator};
pub use reservation::Reservation;
pub use types::{
    Actor, FuelType, InsuranceType, Member, MemberId, MembershipTier, PaymentStatus,
    ReservationId, ReservationStatus, Transmission, Vehicle, VehicleCategory, VehicleId,
};

// re-export external dependencies that users will need
pub use chrono;
pub use hourglass_rs::{SafeTimeProvider, TimeSource};
pub use rust_decimal::Decimal;
pub use uuid::Uuid;
