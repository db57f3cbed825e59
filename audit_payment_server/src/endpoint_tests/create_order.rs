use actix_web::http::StatusCode;
use audit_payment_engine::{
    db_types::OrderStatusType,
    test_utils::{MemoryOrderStore, StubGateway},
    OrderStore,
};
use serde_json::json;

use super::helpers::{post_request, test_api};

#[actix_web::test]
async fn create_order_happy_path() {
    let _ = env_logger::try_init().ok();
    let store = MemoryOrderStore::new();
    let gateway = StubGateway::default();
    let api = test_api(store.clone(), gateway);

    let body = json!({
        "amount": 870,
        "customer": { "name": "Asha Rao", "email": "asha@example.com", "website": "https://example.com" },
        "notes": { "package": "seo-audit" }
    });
    let (status, body) = post_request(api, "/api/create-order", body).await.expect("Request failed");
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        r#"{"success":true,"orderId":"order_stub000001","amount":87000,"currency":"INR","keyId":"rzp_test_stubkey"}"#
    );

    let order = store.fetch_order_by_id(1).await.unwrap().expect("order should be stored");
    assert_eq!(order.status, OrderStatusType::Pending);
    assert_eq!(order.amount.value(), 87_000);
    assert_eq!(order.customer_name, "Asha Rao");
}

#[actix_web::test]
async fn fractional_rupee_amounts_convert_exactly() {
    let _ = env_logger::try_init().ok();
    let store = MemoryOrderStore::new();
    let api = test_api(store.clone(), StubGateway::default());

    let (status, body) = post_request(api, "/api/create-order", json!({ "amount": 10.5 })).await.unwrap();
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains(r#""amount":1050"#), "body was {body}");
}

#[actix_web::test]
async fn missing_amount_is_rejected() {
    let _ = env_logger::try_init().ok();
    let api = test_api(MemoryOrderStore::new(), StubGateway::default());
    let (status, body) = post_request(api, "/api/create-order", json!({ "currency": "INR" })).await.unwrap();
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, r#"{"error":"Amount is required","success":false}"#);
}

#[actix_web::test]
async fn non_positive_amount_is_rejected_without_side_effects() {
    let _ = env_logger::try_init().ok();
    let store = MemoryOrderStore::new();
    for amount in [json!(0), json!(-870)] {
        let api = test_api(store.clone(), StubGateway::default());
        let (status, body) = post_request(api, "/api/create-order", json!({ "amount": amount })).await.unwrap();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, r#"{"error":"Amount is required","success":false}"#);
    }
    assert_eq!(store.order_count(), 0);
}

#[actix_web::test]
async fn invalid_currency_is_rejected() {
    let _ = env_logger::try_init().ok();
    let api = test_api(MemoryOrderStore::new(), StubGateway::default());
    let (status, body) =
        post_request(api, "/api/create-order", json!({ "amount": 870, "currency": "RUPEES" })).await.unwrap();
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("RUPEES"), "body was {body}");
}

#[actix_web::test]
async fn processor_outage_is_a_500() {
    let _ = env_logger::try_init().ok();
    let store = MemoryOrderStore::new();
    let gateway = StubGateway::default();
    gateway.set_fail_create(true);
    let api = test_api(store.clone(), gateway);

    let (status, body) = post_request(api, "/api/create-order", json!({ "amount": 870 })).await.unwrap();
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body.contains(r#""success":false"#), "body was {body}");
    // The pending row stays behind with no gateway order id; it simply never completes
    let order = store.fetch_order_by_id(1).await.unwrap().unwrap();
    assert_eq!(order.status, OrderStatusType::Pending);
    assert!(order.gateway_order_id.is_none());
}
