use std::collections::HashMap;

use apg_common::{Paise, Secret};
use audit_payment_engine::traits::{GatewayError, PaymentGateway, RemoteOrderSummary, RemotePaymentSummary};
use log::*;
use razorpay_tools::{verify_signature, RazorpayApi, RazorpayApiError, RazorpayConfig};

use crate::errors::ServerError;

/// The production payment gateway: order creation and payment corroboration go over the wire via [`RazorpayApi`],
/// and callback signatures are checked against the configured API secret.
#[derive(Clone)]
pub struct RazorpayGateway {
    api: RazorpayApi,
    key_secret: Secret<String>,
}

impl RazorpayGateway {
    pub fn try_new(config: RazorpayConfig) -> Result<Self, ServerError> {
        let key_secret = config.key_secret.clone();
        let api = RazorpayApi::new(config).map_err(|e| ServerError::InitializeError(e.to_string()))?;
        Ok(Self { api, key_secret })
    }
}

impl PaymentGateway for RazorpayGateway {
    fn key_id(&self) -> &str {
        self.api.key_id()
    }

    fn verify_callback_signature(&self, gateway_order_id: &str, payment_id: &str, supplied: &str) -> bool {
        verify_signature(gateway_order_id, payment_id, self.key_secret.reveal().as_bytes(), supplied)
    }

    async fn create_remote_order(
        &self,
        amount: Paise,
        currency: &str,
        receipt: &str,
        notes: HashMap<String, String>,
    ) -> Result<RemoteOrderSummary, GatewayError> {
        let order = self.api.create_order(amount, currency, receipt, notes).await.map_err(to_gateway_error)?;
        Ok(RemoteOrderSummary { gateway_order_id: order.id, amount: order.amount, currency: order.currency })
    }

    async fn fetch_remote_payment(
        &self,
        gateway_order_id: &str,
        payment_id: &str,
    ) -> Result<RemotePaymentSummary, GatewayError> {
        let payment = self.api.fetch_payment(payment_id).await.map_err(to_gateway_error)?;
        let mut captured = payment.is_captured();
        if let Some(settled_order) = &payment.order_id {
            if settled_order != gateway_order_id {
                error!(
                    "🚨️ Payment {payment_id} settles order {settled_order}, not {gateway_order_id} as the callback \
                     claims. Treating the payment as not captured for this order."
                );
                captured = false;
            }
        }
        Ok(RemotePaymentSummary {
            payment_id: payment.id,
            amount: payment.amount,
            currency: payment.currency,
            captured,
        })
    }
}

fn to_gateway_error(e: RazorpayApiError) -> GatewayError {
    match e {
        RazorpayApiError::Initialization(m) => GatewayError::Unavailable(m),
        RazorpayApiError::GatewayUnavailable(m) => GatewayError::Unavailable(m),
        // A response we could not parse is indistinguishable from an outage; both are retryable
        RazorpayApiError::JsonError(m) => GatewayError::Unavailable(m),
        RazorpayApiError::InvalidRequest(m) => GatewayError::InvalidRequest(m),
        RazorpayApiError::QueryError { status, message } => GatewayError::Remote { status, message },
        RazorpayApiError::PaymentNotFound(id) => GatewayError::PaymentNotFound(id),
    }
}
