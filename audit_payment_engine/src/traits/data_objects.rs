use apg_common::Paise;
use serde::{Deserialize, Serialize};

/// The fields of a processor-side order that the engine cares about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteOrderSummary {
    pub gateway_order_id: String,
    pub amount: Paise,
    pub currency: String,
}

/// The processor's own record of a payment, used to corroborate callback data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemotePaymentSummary {
    pub payment_id: String,
    pub amount: Paise,
    pub currency: String,
    /// True when the processor reports the payment as captured. Anything else fails corroboration.
    pub captured: bool,
}
