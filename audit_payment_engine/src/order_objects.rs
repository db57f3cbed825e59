use std::collections::HashMap;

use apg_common::Paise;
use serde::{Deserialize, Serialize};

use crate::db_types::{Customer, Order, OrderStatusType};

/// A purchase intent, as handed to [`crate::OrderFlowApi::create_order`]. Amounts are already in minor units; the
/// rupee conversion happens at the HTTP boundary.
#[derive(Debug, Clone)]
pub struct NewOrderRequest {
    pub amount: Paise,
    /// Defaults to INR when absent.
    pub currency: Option<String>,
    /// Defaults to a time-plus-nonce token when absent.
    pub receipt: Option<String>,
    pub notes: HashMap<String, String>,
    pub customer: Customer,
}

impl NewOrderRequest {
    pub fn new(amount: Paise) -> Self {
        Self { amount, currency: None, receipt: None, notes: HashMap::new(), customer: Customer::default() }
    }
}

/// Everything the caller needs to open the client-side checkout flow.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderCreationResult {
    pub order_id: i64,
    pub gateway_order_id: String,
    pub amount: Paise,
    pub currency: String,
    /// Public key identifier for client-side gateway initialisation. Not a secret.
    pub key_id: String,
}

/// The callback payload delivered by the processor after a checkout attempt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentCallback {
    pub gateway_order_id: String,
    pub gateway_payment_id: String,
    pub signature: String,
}

/// The outcome of a verification call that reached a `Completed` order.
#[derive(Debug, Clone)]
pub struct VerificationOutcome {
    pub order: Order,
    /// True only for the call that actually applied the `Pending → Completed` transition. Replays and race losers
    /// see `false` and must not re-trigger fulfillment.
    pub newly_completed: bool,
}

impl VerificationOutcome {
    pub fn status(&self) -> OrderStatusType {
        self.order.status
    }
}
