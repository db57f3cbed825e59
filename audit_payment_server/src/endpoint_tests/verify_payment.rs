use actix_web::http::StatusCode;
use apg_common::Paise;
use audit_payment_engine::{
    db_types::OrderStatusType,
    order_objects::NewOrderRequest,
    test_utils::{MemoryOrderStore, StubGateway},
    OrderStore,
};
use serde_json::json;

use super::helpers::{post_request, test_api};

/// Creates an order through the engine and registers a matching captured payment on the stub, returning the
/// callback body a legitimate checkout would post.
async fn checkout(store: &MemoryOrderStore, gateway: &StubGateway, payment_id: &str) -> serde_json::Value {
    let api = test_api(store.clone(), gateway.clone());
    let created = api.create_order(NewOrderRequest::new(Paise::from(87_000))).await.expect("order creation failed");
    gateway.register_payment(payment_id, Paise::from(87_000), "INR", true);
    json!({
        "razorpay_order_id": created.gateway_order_id,
        "razorpay_payment_id": payment_id,
        "razorpay_signature": gateway.sign(&created.gateway_order_id, payment_id),
    })
}

#[actix_web::test]
async fn verify_payment_happy_path() {
    let _ = env_logger::try_init().ok();
    let store = MemoryOrderStore::new();
    let gateway = StubGateway::default();
    let callback = checkout(&store, &gateway, "pay_100").await;

    let api = test_api(store.clone(), gateway);
    let (status, body) = post_request(api, "/api/verify-payment", callback).await.expect("Request failed");
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        r#"{"success":true,"message":"Payment verified successfully","order_id":1,"payment_id":"pay_100"}"#
    );
    let order = store.fetch_order_by_id(1).await.unwrap().unwrap();
    assert_eq!(order.status, OrderStatusType::Completed);
}

#[actix_web::test]
async fn replayed_callback_returns_the_recorded_outcome() {
    let _ = env_logger::try_init().ok();
    let store = MemoryOrderStore::new();
    let gateway = StubGateway::default();
    let callback = checkout(&store, &gateway, "pay_101").await;

    let api = test_api(store.clone(), gateway.clone());
    let (status, first) = post_request(api, "/api/verify-payment", callback.clone()).await.unwrap();
    assert_eq!(status, StatusCode::OK);

    let api = test_api(store.clone(), gateway);
    let (status, second) = post_request(api, "/api/verify-payment", callback).await.unwrap();
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first, second);
}

#[actix_web::test]
async fn advisory_order_id_field_is_ignored() {
    let _ = env_logger::try_init().ok();
    let store = MemoryOrderStore::new();
    let gateway = StubGateway::default();
    let mut callback = checkout(&store, &gateway, "pay_102").await;
    callback["orderId"] = json!("some-legacy-local-id");

    let api = test_api(store.clone(), gateway);
    let (status, _) = post_request(api, "/api/verify-payment", callback).await.unwrap();
    assert_eq!(status, StatusCode::OK);
}

#[actix_web::test]
async fn forged_signature_is_rejected() {
    let _ = env_logger::try_init().ok();
    let store = MemoryOrderStore::new();
    let gateway = StubGateway::default();
    let mut callback = checkout(&store, &gateway, "pay_103").await;
    callback["razorpay_signature"] = json!("a-forged-signature");

    let api = test_api(store.clone(), gateway);
    let (status, body) = post_request(api, "/api/verify-payment", callback).await.unwrap();
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, r#"{"message":"Invalid signature","success":false}"#);
    let order = store.fetch_order_by_id(1).await.unwrap().unwrap();
    assert_eq!(order.status, OrderStatusType::Failed);
}

#[actix_web::test]
async fn amount_tamper_is_reported_as_an_invalid_signature() {
    let _ = env_logger::try_init().ok();
    let store = MemoryOrderStore::new();
    let gateway = StubGateway::default();
    let callback = checkout(&store, &gateway, "pay_104").await;
    // The processor's record disagrees with the order
    gateway.register_payment("pay_104", Paise::from(100), "INR", true);

    let api = test_api(store.clone(), gateway);
    let (status, body) = post_request(api, "/api/verify-payment", callback).await.unwrap();
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, r#"{"message":"Invalid signature","success":false}"#);
}

#[actix_web::test]
async fn unknown_gateway_order_is_rejected() {
    let _ = env_logger::try_init().ok();
    let gateway = StubGateway::default();
    let callback = json!({
        "razorpay_order_id": "order_never_created",
        "razorpay_payment_id": "pay_105",
        "razorpay_signature": gateway.sign("order_never_created", "pay_105"),
    });
    let api = test_api(MemoryOrderStore::new(), gateway);
    let (status, body) = post_request(api, "/api/verify-payment", callback).await.unwrap();
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, r#"{"message":"Order not found","success":false}"#);
}

#[actix_web::test]
async fn corroboration_outage_is_a_500_and_leaves_the_order_pending() {
    let _ = env_logger::try_init().ok();
    let store = MemoryOrderStore::new();
    let gateway = StubGateway::default();
    let callback = checkout(&store, &gateway, "pay_106").await;
    gateway.set_fail_fetch(true);

    let api = test_api(store.clone(), gateway);
    let (status, body) = post_request(api, "/api/verify-payment", callback).await.unwrap();
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body.contains(r#""success":false"#), "body was {body}");
    let order = store.fetch_order_by_id(1).await.unwrap().unwrap();
    assert_eq!(order.status, OrderStatusType::Pending);
}
