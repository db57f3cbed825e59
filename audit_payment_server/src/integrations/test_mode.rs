use std::collections::HashMap;

use apg_common::{Paise, Secret};
use audit_payment_engine::{
    traits::{GatewayError, PaymentGateway, RemoteOrderSummary, RemotePaymentSummary},
    OrderStore,
};
use log::*;
use razorpay_tools::{verify_signature, RazorpayConfig};

/// A [`PaymentGateway`] for test mode: no network calls are made. Remote orders get a locally generated id, and
/// payment corroboration reports every payment as captured with the local order's own amount.
///
/// The signature check is NOT stubbed: callbacks must still carry a valid HMAC under the configured secret, and the
/// engine's idempotent state transition runs identically to production.
#[derive(Clone)]
pub struct TestModeGateway<B> {
    key_id: String,
    key_secret: Secret<String>,
    store: B,
}

impl<B> TestModeGateway<B> {
    pub fn new(config: &RazorpayConfig, store: B) -> Self {
        Self { key_id: config.key_id.clone(), key_secret: config.key_secret.clone(), store }
    }
}

impl<B: OrderStore> PaymentGateway for TestModeGateway<B> {
    fn key_id(&self) -> &str {
        &self.key_id
    }

    fn verify_callback_signature(&self, gateway_order_id: &str, payment_id: &str, supplied: &str) -> bool {
        verify_signature(gateway_order_id, payment_id, self.key_secret.reveal().as_bytes(), supplied)
    }

    async fn create_remote_order(
        &self,
        amount: Paise,
        currency: &str,
        _receipt: &str,
        _notes: HashMap<String, String>,
    ) -> Result<RemoteOrderSummary, GatewayError> {
        let gateway_order_id = format!("order_test{:08x}", rand::random::<u32>());
        info!("🧪️ Test mode: issuing local gateway order id {gateway_order_id} for {amount}");
        Ok(RemoteOrderSummary { gateway_order_id, amount, currency: currency.to_string() })
    }

    async fn fetch_remote_payment(
        &self,
        gateway_order_id: &str,
        payment_id: &str,
    ) -> Result<RemotePaymentSummary, GatewayError> {
        let order = self
            .store
            .fetch_order_by_gateway_order_id(gateway_order_id)
            .await
            .map_err(|e| GatewayError::Unavailable(e.to_string()))?
            .ok_or_else(|| GatewayError::PaymentNotFound(payment_id.to_string()))?;
        info!("🧪️ Test mode: reporting payment {payment_id} as captured for {} {}", order.amount, order.currency);
        Ok(RemotePaymentSummary {
            payment_id: payment_id.to_string(),
            amount: order.amount,
            currency: order.currency,
            captured: true,
        })
    }
}
