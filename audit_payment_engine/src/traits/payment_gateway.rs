use std::collections::HashMap;

use apg_common::Paise;
use thiserror::Error;

use crate::traits::{RemoteOrderSummary, RemotePaymentSummary};

/// Network boundary to the external payment processor.
///
/// The client holds no mutable state; its secrets are read-only configuration and never cross this interface. The
/// signature check lives here so that the signing secret stays inside the gateway client.
#[allow(async_fn_in_trait)]
pub trait PaymentGateway: Clone {
    /// The public (non-secret) key identifier callers need to open the client-side checkout flow.
    fn key_id(&self) -> &str;

    /// Recomputes the expected callback signature for the pair and compares it to the supplied one in constant
    /// time. Pure; no network I/O.
    fn verify_callback_signature(&self, gateway_order_id: &str, payment_id: &str, supplied: &str) -> bool;

    /// Creates an order on the processor. The receipt is the merchant-side idempotency/reference token.
    async fn create_remote_order(
        &self,
        amount: Paise,
        currency: &str,
        receipt: &str,
        notes: HashMap<String, String>,
    ) -> Result<RemoteOrderSummary, GatewayError>;

    /// Fetches the processor's record of a payment, to corroborate callback data against. The gateway order id from
    /// the callback travels along so implementations can cross-check which order the payment settles.
    async fn fetch_remote_payment(
        &self,
        gateway_order_id: &str,
        payment_id: &str,
    ) -> Result<RemotePaymentSummary, GatewayError>;
}

#[derive(Debug, Clone, Error)]
pub enum GatewayError {
    #[error("The payment processor could not be reached: {0}")]
    Unavailable(String),
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
    #[error("The processor has no record of payment {0}")]
    PaymentNotFound(String),
    #[error("Processor request failed. Error {status}. {message}")]
    Remote { status: u16, message: String },
}
