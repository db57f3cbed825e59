use apg_common::Paise;
use thiserror::Error;

use crate::{
    db_types::{NewOrder, Order, OrderStatusType},
    traits::GatewayError,
};

/// Persistence boundary for order records.
///
/// One row per purchase attempt. The store never deletes rows; retention is an external concern. The only mutation
/// paths are [`attach_gateway_order_id`](OrderStore::attach_gateway_order_id) (one-shot) and
/// [`finalize_order`](OrderStore::finalize_order) (guarded compare-and-set).
#[allow(async_fn_in_trait)]
pub trait OrderStore: Clone {
    /// Inserts a new order row. The status is forced to `Pending` regardless of input.
    async fn insert_order(&self, order: NewOrder) -> Result<Order, PaymentEngineError>;

    async fn fetch_order_by_id(&self, id: i64) -> Result<Option<Order>, PaymentEngineError>;

    /// Fetches the order associated with a processor-assigned order id. Used during reconciliation, where the
    /// gateway order id in the callback is the authoritative lookup key.
    async fn fetch_order_by_gateway_order_id(&self, gateway_order_id: &str)
        -> Result<Option<Order>, PaymentEngineError>;

    /// Fetches the order a payment id was reconciled against, if any. Supports duplicate-processing checks.
    async fn fetch_order_by_payment_id(&self, payment_id: &str) -> Result<Option<Order>, PaymentEngineError>;

    /// Records the processor's order id on the local row. The id is assigned exactly once: a second call for the
    /// same row fails with [`PaymentEngineError::GatewayOrderIdAlreadySet`] rather than reassigning.
    async fn attach_gateway_order_id(&self, id: i64, gateway_order_id: &str) -> Result<Order, PaymentEngineError>;

    /// Applies a terminal status transition, guarded by `status = Pending`.
    ///
    /// This must behave as an atomic compare-and-set: when two concurrent verification attempts race on the same
    /// order, exactly one observes `Some(order)`; the loser observes `None` and must not trigger any further side
    /// effects. The payment id, when supplied, is recorded with the transition and is immutable afterwards.
    async fn finalize_order(
        &self,
        id: i64,
        new_status: OrderStatusType,
        payment_id: Option<&str>,
    ) -> Result<Option<Order>, PaymentEngineError>;

    /// Closes the backing connection, if any.
    async fn close(&mut self) -> Result<(), PaymentEngineError> {
        Ok(())
    }
}

#[derive(Debug, Clone, Error)]
pub enum PaymentEngineError {
    #[error("Internal database error: {0}")]
    DatabaseError(String),
    #[error("Invalid order request: {0}")]
    InvalidRequest(String),
    #[error("No order exists for gateway order id {0}")]
    OrderNotFound(String),
    #[error("The requested order (internal id {0}) does not exist")]
    OrderIdNotFound(i64),
    #[error("Gateway order id is already set for order {0} and cannot be reassigned")]
    GatewayOrderIdAlreadySet(i64),
    #[error("Could not create an order with the payment processor: {0}")]
    OrderCreationFailed(String),
    #[error("Callback signature for gateway order {0} does not match")]
    SignatureInvalid(String),
    #[error("Processor-reported amount {reported} does not match the recorded amount {expected} for order {order_id}")]
    AmountMismatch { order_id: i64, expected: Paise, reported: Paise },
    #[error("Payment {0} has not been captured by the processor")]
    PaymentNotCaptured(String),
    #[error("The processor has no record of payment {0}")]
    PaymentNotFound(String),
    #[error("Verification of order {0} has already failed; the order is terminal")]
    OrderAlreadyFailed(i64),
    #[error("The payment processor could not be reached: {0}")]
    GatewayUnavailable(String),
}

impl PaymentEngineError {
    /// Transient errors are safe to retry end to end; everything else is terminal for the request that raised it.
    pub fn is_transient(&self) -> bool {
        matches!(self, PaymentEngineError::GatewayUnavailable(_) | PaymentEngineError::DatabaseError(_))
    }
}

impl From<sqlx::Error> for PaymentEngineError {
    fn from(e: sqlx::Error) -> Self {
        PaymentEngineError::DatabaseError(e.to_string())
    }
}

impl From<GatewayError> for PaymentEngineError {
    fn from(e: GatewayError) -> Self {
        match e {
            GatewayError::Unavailable(m) => PaymentEngineError::GatewayUnavailable(m),
            GatewayError::PaymentNotFound(id) => PaymentEngineError::PaymentNotFound(id),
            GatewayError::InvalidRequest(m) => PaymentEngineError::InvalidRequest(m),
            GatewayError::Remote { status, message } => {
                PaymentEngineError::OrderCreationFailed(format!("processor returned {status}: {message}"))
            },
        }
    }
}
