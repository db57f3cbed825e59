use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use apg_common::Paise;

use crate::traits::{GatewayError, PaymentGateway, RemoteOrderSummary, RemotePaymentSummary};

/// A [`PaymentGateway`] double with canned responses.
///
/// Signatures use a deliberately trivial scheme (`stub:{order}:{payment}:{secret}`) produced by [`StubGateway::sign`];
/// the verification path is still exercised for real, so a wrong or tampered signature is rejected exactly as it
/// would be in production.
#[derive(Clone)]
pub struct StubGateway {
    key_id: String,
    secret: String,
    inner: Arc<Mutex<StubState>>,
}

#[derive(Default)]
struct StubState {
    next_order: u64,
    payments: HashMap<String, RemotePaymentSummary>,
    fail_create: bool,
    fail_fetch: bool,
}

impl Default for StubGateway {
    fn default() -> Self {
        Self::new("rzp_test_stubkey", "stub_secret")
    }
}

impl StubGateway {
    pub fn new(key_id: &str, secret: &str) -> Self {
        Self { key_id: key_id.to_string(), secret: secret.to_string(), inner: Arc::new(Mutex::new(StubState::default())) }
    }

    /// Produces the signature [`PaymentGateway::verify_callback_signature`] will accept for this pair.
    pub fn sign(&self, gateway_order_id: &str, payment_id: &str) -> String {
        format!("stub:{gateway_order_id}:{payment_id}:{}", self.secret)
    }

    /// Registers a processor-side payment record for `fetch_remote_payment` to report.
    pub fn register_payment(&self, payment_id: &str, amount: Paise, currency: &str, captured: bool) {
        let payment = RemotePaymentSummary {
            payment_id: payment_id.to_string(),
            amount,
            currency: currency.to_string(),
            captured,
        };
        self.inner.lock().unwrap().payments.insert(payment_id.to_string(), payment);
    }

    pub fn set_fail_create(&self, fail: bool) {
        self.inner.lock().unwrap().fail_create = fail;
    }

    pub fn set_fail_fetch(&self, fail: bool) {
        self.inner.lock().unwrap().fail_fetch = fail;
    }
}

impl PaymentGateway for StubGateway {
    fn key_id(&self) -> &str {
        &self.key_id
    }

    fn verify_callback_signature(&self, gateway_order_id: &str, payment_id: &str, supplied: &str) -> bool {
        supplied == self.sign(gateway_order_id, payment_id)
    }

    async fn create_remote_order(
        &self,
        amount: Paise,
        currency: &str,
        _receipt: &str,
        _notes: HashMap<String, String>,
    ) -> Result<RemoteOrderSummary, GatewayError> {
        let mut inner = self.inner.lock().unwrap();
        if inner.fail_create {
            return Err(GatewayError::Unavailable("stub gateway is configured to be down".to_string()));
        }
        inner.next_order += 1;
        Ok(RemoteOrderSummary {
            gateway_order_id: format!("order_stub{:06}", inner.next_order),
            amount,
            currency: currency.to_string(),
        })
    }

    async fn fetch_remote_payment(
        &self,
        _gateway_order_id: &str,
        payment_id: &str,
    ) -> Result<RemotePaymentSummary, GatewayError> {
        let inner = self.inner.lock().unwrap();
        if inner.fail_fetch {
            return Err(GatewayError::Unavailable("stub gateway is configured to be down".to_string()));
        }
        inner.payments.get(payment_id).cloned().ok_or_else(|| GatewayError::PaymentNotFound(payment_id.to_string()))
    }
}
