use std::{collections::HashMap, fmt::Display};

use apg_common::Paise;
use serde::{Deserialize, Serialize};

/// The request body for `POST /orders`.
#[derive(Debug, Clone, Serialize)]
pub struct NewRemoteOrder {
    pub amount: i64,
    pub currency: String,
    pub receipt: String,
    /// Auto-capture the payment when it is authorised. Always 1 for this integration.
    pub payment_capture: u8,
    pub notes: HashMap<String, String>,
}

impl NewRemoteOrder {
    pub fn new(amount: Paise, currency: String, receipt: String, notes: HashMap<String, String>) -> Self {
        Self { amount: amount.value(), currency, receipt, payment_capture: 1, notes }
    }
}

/// An order record as reported by the processor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteOrder {
    pub id: String,
    pub amount: Paise,
    pub currency: String,
    #[serde(default)]
    pub receipt: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

/// A payment record as reported by the processor, used to corroborate callback data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemotePayment {
    pub id: String,
    #[serde(default)]
    pub order_id: Option<String>,
    pub amount: Paise,
    pub currency: String,
    pub status: RemotePaymentStatus,
}

impl RemotePayment {
    pub fn is_captured(&self) -> bool {
        self.status == RemotePaymentStatus::Captured
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RemotePaymentStatus {
    Created,
    Authorized,
    Captured,
    Refunded,
    Failed,
}

impl Display for RemotePaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RemotePaymentStatus::Created => write!(f, "created"),
            RemotePaymentStatus::Authorized => write!(f, "authorized"),
            RemotePaymentStatus::Captured => write!(f, "captured"),
            RemotePaymentStatus::Refunded => write!(f, "refunded"),
            RemotePaymentStatus::Failed => write!(f, "failed"),
        }
    }
}
