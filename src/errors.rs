use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

use crate::types::ReservationStatus;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    #[error("invalid range: start {start} is not before end {end}")]
    InvalidRange {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },

    #[error("start date {start} is in the past")]
    PastStartDate {
        start: DateTime<Utc>,
    },

    #[error("vehicle {vehicle_id} is not available for the requested window")]
    VehicleUnavailable {
        vehicle_id: Uuid,
    },

    #[error("{entity} not found: {id}")]
    NotFound {
        entity: &'static str,
        id: Uuid,
    },

    #[error("actor is not the owning member or an administrator")]
    Unauthorized,

    #[error("operation {operation} not allowed in status {current:?}")]
    InvalidState {
        current: ReservationStatus,
        operation: &'static str,
    },

    #[error("reservation cannot be cancelled in status {status:?}")]
    NotCancellable {
        status: ReservationStatus,
    },

    #[error("refund ineligible: {reason}")]
    RefundIneligible {
        reason: String,
    },

    #[error("payment failed: {message}")]
    PaymentFailed {
        message: String,
    },

    #[error("store unavailable: {message}")]
    StoreUnavailable {
        message: String,
    },
}

impl EngineError {
    /// only transient collaborator failures are worth retrying;
    /// every other kind is permanent for the same input
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            EngineError::StoreUnavailable { .. } | EngineError::PaymentFailed { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;
