use std::{collections::HashMap, sync::Arc, time::Duration};

use apg_common::{helpers::normalize_currency_code, Paise};
use log::*;
use reqwest::{Client, Method, StatusCode};
use serde::{de::DeserializeOwned, Serialize};

use crate::{
    config::RazorpayConfig,
    data_objects::{NewRemoteOrder, RemoteOrder, RemotePayment},
    RazorpayApiError,
};

#[derive(Clone)]
pub struct RazorpayApi {
    config: RazorpayConfig,
    client: Arc<Client>,
}

impl RazorpayApi {
    pub fn new(config: RazorpayConfig) -> Result<Self, RazorpayApiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| RazorpayApiError::Initialization(e.to_string()))?;
        Ok(Self { config, client: Arc::new(client) })
    }

    pub fn key_id(&self) -> &str {
        &self.config.key_id
    }

    pub async fn rest_query<T: DeserializeOwned, B: Serialize>(
        &self,
        method: Method,
        path: &str,
        body: Option<B>,
    ) -> Result<T, RazorpayApiError> {
        let url = self.url(path);
        trace!("Sending REST query: {url}");
        let mut req = self
            .client
            .request(method, url)
            .basic_auth(&self.config.key_id, Some(self.config.key_secret.reveal()));
        if let Some(body) = body {
            req = req.json(&body);
        }
        let response = req.send().await.map_err(|e| RazorpayApiError::GatewayUnavailable(e.to_string()))?;
        if response.status().is_success() {
            trace!("REST query successful. {}", response.status());
            response.json::<T>().await.map_err(|e| RazorpayApiError::JsonError(e.to_string()))
        } else {
            let status = response.status().as_u16();
            let message = response.text().await.map_err(|e| RazorpayApiError::GatewayUnavailable(e.to_string()))?;
            Err(RazorpayApiError::QueryError { status, message })
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.config.api_url)
    }

    /// Creates an order on the processor. The receipt string is the merchant-side reference token.
    pub async fn create_order(
        &self,
        amount: Paise,
        currency: &str,
        receipt: &str,
        notes: HashMap<String, String>,
    ) -> Result<RemoteOrder, RazorpayApiError> {
        if !amount.is_positive() {
            return Err(RazorpayApiError::InvalidRequest(format!("amount must be positive, got {}", amount.value())));
        }
        let currency = normalize_currency_code(currency)
            .ok_or_else(|| RazorpayApiError::InvalidRequest(format!("{currency} is not a 3-letter currency code")))?;
        let body = NewRemoteOrder::new(amount, currency, receipt.to_string(), notes);
        debug!("Creating remote order for {amount} (receipt {receipt})");
        let order = self.rest_query::<RemoteOrder, NewRemoteOrder>(Method::POST, "/orders", Some(body)).await?;
        info!("Remote order {} created for {amount}", order.id);
        Ok(order)
    }

    /// Fetches the processor's own record of a payment. Used to corroborate callback data rather than trusting
    /// client-supplied fields.
    pub async fn fetch_payment(&self, payment_id: &str) -> Result<RemotePayment, RazorpayApiError> {
        let path = format!("/payments/{payment_id}");
        debug!("Fetching payment {payment_id}");
        match self.rest_query::<RemotePayment, ()>(Method::GET, &path, None).await {
            Ok(payment) => Ok(payment),
            Err(RazorpayApiError::QueryError { status, .. }) if status == StatusCode::NOT_FOUND.as_u16() => {
                Err(RazorpayApiError::PaymentNotFound(payment_id.to_string()))
            },
            Err(e) => Err(e),
        }
    }
}
