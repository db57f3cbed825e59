//! Request handler definitions
//!
//! Handlers are generic over the order store and payment gateway so that endpoint tests can run them against
//! in-memory doubles. Registration happens in [`crate::server`], where the concrete types are known.

use actix_web::{get, web, HttpResponse, Responder};
use apg_common::Paise;
use audit_payment_engine::{
    order_objects::{NewOrderRequest, PaymentCallback},
    OrderFlowApi,
    OrderStore,
    PaymentEngineError,
    PaymentGateway,
};
use log::*;

use crate::{
    data_objects::{CreateOrderRequest, CreateOrderResponse, VerifyPaymentRequest, VerifyPaymentResponse},
    errors::ServerError,
};

// ----------------------------------------------   Health  ----------------------------------------------------
#[get("/health")]
pub async fn health() -> impl Responder {
    trace!("💻️ Received health check request");
    HttpResponse::Ok().body("👍️\n")
}

// -------------------------------------------   Create order  -------------------------------------------------
/// Route handler for `POST /api/create-order`.
///
/// The request amount is in rupees; this is the single place it is converted to paise. A missing or non-positive
/// amount is rejected before anything else happens.
pub async fn create_order<B, G>(
    api: web::Data<OrderFlowApi<B, G>>,
    body: web::Json<CreateOrderRequest>,
) -> Result<HttpResponse, ServerError>
where
    B: OrderStore,
    G: PaymentGateway,
{
    let body = body.into_inner();
    let rupees = match body.amount {
        Some(a) if a > 0.0 => a,
        _ => {
            debug!("💻️ create-order request rejected: missing or non-positive amount");
            return Err(ServerError::AmountRequired);
        },
    };
    let amount = Paise::from_rupees(rupees).map_err(|e| ServerError::InvalidRequestBody(e.to_string()))?;
    trace!("💻️ Received create-order request for {amount}");
    let request = NewOrderRequest {
        amount,
        currency: body.currency,
        receipt: body.receipt,
        notes: body.notes,
        customer: body.customer,
    };
    let result = api.create_order(request).await.map_err(|e| match e {
        PaymentEngineError::InvalidRequest(m) => ServerError::InvalidRequestBody(m),
        PaymentEngineError::OrderCreationFailed(m) | PaymentEngineError::GatewayUnavailable(m) => {
            warn!("💻️ Order creation failed at the processor. {m}");
            ServerError::PaymentGatewayDown(m)
        },
        e => ServerError::BackendError(e.to_string()),
    })?;
    info!("💻️ Order #{} created ({} as {})", result.order_id, result.amount, result.gateway_order_id);
    Ok(HttpResponse::Ok().json(CreateOrderResponse {
        success: true,
        order_id: result.gateway_order_id,
        amount: result.amount,
        currency: result.currency,
        key_id: result.key_id,
    }))
}

// ------------------------------------------   Verify payment  ------------------------------------------------
/// Route handler for `POST /api/verify-payment`.
///
/// The gateway order id in the callback is the authoritative lookup key; the optional `orderId` field is advisory
/// and ignored. Rejections surface as 400 with a terse public message, with the specifics logged by the engine.
pub async fn verify_payment<B, G>(
    api: web::Data<OrderFlowApi<B, G>>,
    body: web::Json<VerifyPaymentRequest>,
) -> Result<HttpResponse, ServerError>
where
    B: OrderStore,
    G: PaymentGateway,
{
    let body = body.into_inner();
    trace!("💻️ Received verify-payment callback for gateway order {}", body.razorpay_order_id);
    if let Some(advisory) = &body.order_id {
        trace!("💻️ Ignoring advisory orderId field ({advisory}); the gateway order id is authoritative");
    }
    let callback = PaymentCallback {
        gateway_order_id: body.razorpay_order_id,
        gateway_payment_id: body.razorpay_payment_id,
        signature: body.razorpay_signature,
    };
    let outcome = api.verify_payment(callback).await.map_err(|e| match e {
        PaymentEngineError::SignatureInvalid(_) |
        PaymentEngineError::AmountMismatch { .. } |
        PaymentEngineError::PaymentNotCaptured(_) |
        PaymentEngineError::PaymentNotFound(_) |
        PaymentEngineError::OrderAlreadyFailed(_) => ServerError::PaymentRejected("Invalid signature".to_string()),
        PaymentEngineError::OrderNotFound(_) => ServerError::PaymentRejected("Order not found".to_string()),
        PaymentEngineError::GatewayUnavailable(m) => ServerError::PaymentGatewayDown(m),
        e => ServerError::BackendError(e.to_string()),
    })?;
    let payment_id = outcome.order.gateway_payment_id.clone().unwrap_or_default();
    info!(
        "💻️ Payment {payment_id} verified for order #{} (newly completed: {})",
        outcome.order.id, outcome.newly_completed
    );
    Ok(HttpResponse::Ok().json(VerifyPaymentResponse {
        success: true,
        message: "Payment verified successfully".to_string(),
        order_id: outcome.order.id,
        payment_id,
    }))
}
