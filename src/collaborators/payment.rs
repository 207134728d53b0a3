use crate::decimal::Money;
use crate::errors::{EngineError, Result};
use crate::types::ReservationId;

/// payment collaborator boundary.
///
/// authorization and capture happen outside the engine; the engine only
/// asks the gateway to move money back on cancellation. gateway failures
/// surface as `PaymentFailed` unchanged.
pub trait PaymentGateway {
    /// refund against an earlier capture; returns the refund transaction id
    fn refund(
        &mut self,
        reservation_id: ReservationId,
        original_transaction: &str,
        amount: Money,
    ) -> Result<String>;
}

/// one refund the test gateway has processed
#[derive(Debug, Clone, PartialEq)]
pub struct RefundRecord {
    pub reservation_id: ReservationId,
    pub original_transaction: String,
    pub amount: Money,
    pub transaction_id: String,
}

/// deterministic gateway for tests. failure is forced through an explicit
/// switch, never randomness, so every test run behaves identically.
#[derive(Debug, Default)]
pub struct TestGateway {
    refunds: Vec<RefundRecord>,
    fail_with: Option<String>,
    sequence: u64,
}

impl TestGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// force every subsequent call to fail with the given message
    pub fn fail_with(&mut self, message: &str) {
        self.fail_with = Some(message.to_string());
    }

    pub fn succeed(&mut self) {
        self.fail_with = None;
    }

    pub fn refunds(&self) -> &[RefundRecord] {
        &self.refunds
    }
}

impl PaymentGateway for TestGateway {
    fn refund(
        &mut self,
        reservation_id: ReservationId,
        original_transaction: &str,
        amount: Money,
    ) -> Result<String> {
        if let Some(message) = &self.fail_with {
            return Err(EngineError::PaymentFailed {
                message: message.clone(),
            });
        }

        self.sequence += 1;
        let transaction_id = format!("refund-{:06}", self.sequence);
        self.refunds.push(RefundRecord {
            reservation_id,
            original_transaction: original_transaction.to_string(),
            amount,
            transaction_id: transaction_id.clone(),
        });
        Ok(transaction_id)
    }
}
