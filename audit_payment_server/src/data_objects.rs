use std::collections::HashMap;

use apg_common::Paise;
use audit_payment_engine::db_types::Customer;
use serde::{Deserialize, Serialize};

/// Body of `POST /api/create-order`. The amount is in major currency units (rupees); conversion to minor units
/// happens exactly once, in the handler.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateOrderRequest {
    pub amount: Option<f64>,
    pub currency: Option<String>,
    pub receipt: Option<String>,
    #[serde(default)]
    pub notes: HashMap<String, String>,
    #[serde(default)]
    pub customer: Customer,
}

/// Body of a successful `POST /api/create-order` response. `order_id` is the processor-assigned id the client hands
/// to the checkout widget; `key_id` is the public (non-secret) key for client-side initialisation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateOrderResponse {
    pub success: bool,
    #[serde(rename = "orderId")]
    pub order_id: String,
    /// Minor units (paise)
    pub amount: Paise,
    pub currency: String,
    #[serde(rename = "keyId")]
    pub key_id: String,
}

/// Body of `POST /api/verify-payment`, matching the field names the processor's checkout emits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyPaymentRequest {
    pub razorpay_order_id: String,
    pub razorpay_payment_id: String,
    pub razorpay_signature: String,
    /// Advisory only. The gateway order id above is the authoritative lookup key.
    #[serde(rename = "orderId", default, skip_serializing_if = "Option::is_none")]
    pub order_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyPaymentResponse {
    pub success: bool,
    pub message: String,
    pub order_id: i64,
    pub payment_id: String,
}
