use std::fmt::Debug;

use apg_common::{helpers::normalize_currency_code, INR_CURRENCY_CODE};
use log::*;

use crate::{
    db_types::{NewOrder, Order, OrderStatusType},
    events::{EventProducers, OrderCompletedEvent},
    helpers::new_receipt,
    order_objects::{NewOrderRequest, OrderCreationResult, PaymentCallback, VerificationOutcome},
    traits::{OrderStore, PaymentEngineError, PaymentGateway},
};

/// `OrderFlowApi` is the primary API for the purchase flow: creating a pending order against the payment processor,
/// and reconciling the processor's payment callback with the local record exactly once.
pub struct OrderFlowApi<B, G> {
    store: B,
    gateway: G,
    producers: EventProducers,
}

impl<B, G> Debug for OrderFlowApi<B, G> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "OrderFlowApi")
    }
}

impl<B, G> OrderFlowApi<B, G> {
    pub fn new(store: B, gateway: G, producers: EventProducers) -> Self {
        Self { store, gateway, producers }
    }
}

impl<B, G> OrderFlowApi<B, G>
where
    B: OrderStore,
    G: PaymentGateway,
{
    /// Creates a local pending order and registers it with the payment processor.
    ///
    /// The pending row is inserted first, then the remote order is requested using the receipt as the reference
    /// token, and finally the processor's order id is written back onto the row. If the remote call fails, the
    /// local order is left `Pending` with no gateway order id attached: the caller may retry creation from scratch
    /// and the abandoned row simply never completes. This call performs no internal retries.
    pub async fn create_order(&self, request: NewOrderRequest) -> Result<OrderCreationResult, PaymentEngineError> {
        if !request.amount.is_positive() {
            return Err(PaymentEngineError::InvalidRequest(format!(
                "amount must be a positive number of minor units, got {}",
                request.amount.value()
            )));
        }
        let currency = match &request.currency {
            Some(code) => normalize_currency_code(code)
                .ok_or_else(|| PaymentEngineError::InvalidRequest(format!("{code} is not a 3-letter currency code")))?,
            None => INR_CURRENCY_CODE.to_string(),
        };
        let receipt = request.receipt.clone().unwrap_or_else(new_receipt);
        let new_order = NewOrder::new(request.amount, receipt)
            .with_currency(currency)
            .with_customer(request.customer.clone())
            .with_notes(request.notes.clone());
        let order = self.store.insert_order(new_order).await?;
        debug!("🧾️ Order #{} inserted as Pending for {}", order.id, order.amount);
        let remote = self
            .gateway
            .create_remote_order(order.amount, &order.currency, &order.receipt, request.notes)
            .await
            .map_err(|e| {
                warn!("🧾️ Remote order creation failed for order #{}. The local order stays Pending. {e}", order.id);
                PaymentEngineError::OrderCreationFailed(e.to_string())
            })?;
        let order = self.store.attach_gateway_order_id(order.id, &remote.gateway_order_id).await?;
        info!("🧾️ Order #{} registered with the processor as {}", order.id, remote.gateway_order_id);
        Ok(OrderCreationResult {
            order_id: order.id,
            gateway_order_id: remote.gateway_order_id,
            amount: order.amount,
            currency: order.currency,
            key_id: self.gateway.key_id().to_string(),
        })
    }

    /// Verifies a payment callback and reconciles the order record, exactly once.
    ///
    /// Per-order state machine: `Pending → Completed` on a valid signature with corroborated amount/currency;
    /// `Pending → Failed` on signature or corroboration mismatch; terminal states absorb any further callback as a
    /// no-op. Callbacks may be delivered more than once by the gateway, or replayed by a malicious actor; replays
    /// return the recorded outcome without recomputing anything.
    pub async fn verify_payment(&self, callback: PaymentCallback) -> Result<VerificationOutcome, PaymentEngineError> {
        let order = self
            .store
            .fetch_order_by_gateway_order_id(&callback.gateway_order_id)
            .await?
            .ok_or_else(|| PaymentEngineError::OrderNotFound(callback.gateway_order_id.clone()))?;

        if order.status.is_terminal() {
            debug!("🔁️ Order #{} is already {}. Callback treated as a replay.", order.id, order.status);
            return match order.status {
                OrderStatusType::Completed => Ok(VerificationOutcome { order, newly_completed: false }),
                _ => Err(PaymentEngineError::OrderAlreadyFailed(order.id)),
            };
        }

        let signature_ok = self.gateway.verify_callback_signature(
            &callback.gateway_order_id,
            &callback.gateway_payment_id,
            &callback.signature,
        );
        if !signature_ok {
            // Security-relevant rejection. Mark the order Failed through the same guarded transition so a
            // concurrent successful verification cannot be clobbered.
            error!(
                "🚨️ Invalid callback signature for order #{} (gateway order {}). Possible tampering.",
                order.id, callback.gateway_order_id
            );
            self.fail_order(&order, &callback).await?;
            return Err(PaymentEngineError::SignatureInvalid(callback.gateway_order_id));
        }

        // Corroborate against the processor's own record instead of trusting client-supplied fields. A transient
        // gateway failure here leaves the row Pending so that the whole verification call can be retried.
        let payment = self
            .gateway
            .fetch_remote_payment(&callback.gateway_order_id, &callback.gateway_payment_id)
            .await
            .map_err(|e| {
                warn!("🔁️ Could not corroborate payment {} with the processor. {e}", callback.gateway_payment_id);
                PaymentEngineError::from(e)
            })?;
        if !payment.captured {
            error!("🚨️ Payment {} for order #{} is not captured. Rejecting.", payment.payment_id, order.id);
            self.fail_order(&order, &callback).await?;
            return Err(PaymentEngineError::PaymentNotCaptured(payment.payment_id));
        }
        if payment.amount != order.amount || payment.currency != order.currency {
            error!(
                "🚨️ Amount/currency mismatch for order #{}: recorded {} {}, processor reports {} {}. Possible \
                 tampering.",
                order.id, order.amount, order.currency, payment.amount, payment.currency
            );
            self.fail_order(&order, &callback).await?;
            return Err(PaymentEngineError::AmountMismatch {
                order_id: order.id,
                expected: order.amount,
                reported: payment.amount,
            });
        }

        match self
            .store
            .finalize_order(order.id, OrderStatusType::Completed, Some(&callback.gateway_payment_id))
            .await?
        {
            Some(completed) => {
                info!("✅️ Order #{} completed with payment {}", completed.id, callback.gateway_payment_id);
                self.call_order_completed_hook(&completed).await;
                Ok(VerificationOutcome { order: completed, newly_completed: true })
            },
            None => {
                // Lost the race: another verification call applied a terminal transition first. Re-read and report
                // its outcome without any further side effects.
                let current = self
                    .store
                    .fetch_order_by_id(order.id)
                    .await?
                    .ok_or(PaymentEngineError::OrderIdNotFound(order.id))?;
                debug!("🔁️ Order #{} was finalized concurrently as {}.", current.id, current.status);
                match current.status {
                    OrderStatusType::Completed => Ok(VerificationOutcome { order: current, newly_completed: false }),
                    _ => Err(PaymentEngineError::OrderAlreadyFailed(current.id)),
                }
            },
        }
    }

    /// Applies the `Pending → Failed` transition for a rejected callback. A no-op result means another call
    /// finalized the order first; the rejection error still stands for this caller.
    async fn fail_order(&self, order: &Order, callback: &PaymentCallback) -> Result<(), PaymentEngineError> {
        let updated = self
            .store
            .finalize_order(order.id, OrderStatusType::Failed, Some(&callback.gateway_payment_id))
            .await?;
        if updated.is_none() {
            debug!("🔁️ Order #{} was already terminal while recording a failed verification.", order.id);
        }
        Ok(())
    }

    async fn call_order_completed_hook(&self, order: &Order) {
        for emitter in &self.producers.order_completed_producer {
            debug!("🔁️📦️ Notifying order completed hook subscribers for order #{}", order.id);
            let event = OrderCompletedEvent::new(order.clone());
            emitter.publish_event(event).await;
        }
    }

    pub fn store(&self) -> &B {
        &self.store
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }
}
